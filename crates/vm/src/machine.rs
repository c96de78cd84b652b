//! Interpreter state: frames, the three stacks, the label table, and the
//! diagnostic snapshot.

use std::collections::HashMap;
use std::io::Write;

use tacode_common::{Opcode, Program, Value};

use crate::error::RuntimeError;
use crate::frame::{Frame, FrameKind};
use crate::input::Input;

/// One execution context. Owns every piece of run state; independent
/// contexts can coexist in the same process.
pub struct Interpreter<'a> {
    pub(crate) program: &'a Program,
    /// Label name → order. Immutable after the pre-pass.
    pub(crate) labels: HashMap<String, u32>,
    pub(crate) global: Frame,
    pub(crate) temporary: Option<Frame>,
    pub(crate) frame_stack: Vec<Frame>,
    pub(crate) data_stack: Vec<Value>,
    pub(crate) call_stack: Vec<u32>,
    /// Program counter over order numbers.
    pub(crate) pc: u32,
    pub(crate) executed: u64,
    pub(crate) input: Input,
    pub(crate) out: &'a mut dyn Write,
    pub(crate) diag: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    /// Create a fresh context for one run of `program`.
    pub fn new(
        program: &'a Program,
        input: Input,
        out: &'a mut dyn Write,
        diag: &'a mut dyn Write,
    ) -> Self {
        Self {
            program,
            labels: HashMap::new(),
            global: Frame::new(),
            temporary: None,
            frame_stack: Vec::new(),
            data_stack: Vec::new(),
            call_stack: Vec::new(),
            pc: 1,
            executed: 0,
            input,
            out,
            diag,
        }
    }

    /// Label pre-pass: one sequential scan in ascending order, registering
    /// every LABEL declaration. Leaves all other instructions untouched,
    /// so forward and backward targets resolve identically.
    pub(crate) fn resolve_labels(&mut self) -> Result<(), RuntimeError> {
        for ins in self.program.iter() {
            if ins.opcode != Opcode::Label {
                continue;
            }
            let arg = match (ins.args.count(), ins.args.get(0)) {
                (1, Some(arg)) => arg,
                (got, _) => {
                    return Err(RuntimeError::BadArity {
                        opcode: ins.opcode.mnemonic(),
                        order: ins.order,
                        expected: 1,
                        got,
                    })
                }
            };
            let name = crate::operand::resolve_label(arg, ins.order)?;
            if self.labels.contains_key(name) {
                return Err(RuntimeError::RedefinedLabel {
                    name: name.to_string(),
                    order: ins.order,
                });
            }
            self.labels.insert(name.to_string(), ins.order);
        }
        Ok(())
    }

    /// The order a label resolves to, or the undefined-label error.
    pub(crate) fn label_target(&self, name: &str, order: u32) -> Result<u32, RuntimeError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                name: name.to_string(),
                order,
            })
    }

    /// The live frame for a designator, or the not-live error.
    pub(crate) fn frame(&self, kind: FrameKind, order: u32) -> Result<&Frame, RuntimeError> {
        match kind {
            FrameKind::Global => Ok(&self.global),
            FrameKind::Local => self.frame_stack.last().ok_or(RuntimeError::FrameNotLive {
                frame: kind.designator(),
                order,
            }),
            FrameKind::Temporary => self.temporary.as_ref().ok_or(RuntimeError::FrameNotLive {
                frame: kind.designator(),
                order,
            }),
        }
    }

    pub(crate) fn frame_mut(
        &mut self,
        kind: FrameKind,
        order: u32,
    ) -> Result<&mut Frame, RuntimeError> {
        match kind {
            FrameKind::Global => Ok(&mut self.global),
            FrameKind::Local => self
                .frame_stack
                .last_mut()
                .ok_or(RuntimeError::FrameNotLive {
                    frame: kind.designator(),
                    order,
                }),
            FrameKind::Temporary => self.temporary.as_mut().ok_or(RuntimeError::FrameNotLive {
                frame: kind.designator(),
                order,
            }),
        }
    }

    /// Human-readable state dump for BREAK. Diagnostic channel only.
    pub(crate) fn snapshot(&self) -> String {
        let mut out = String::new();
        out.push_str("Interpreter state:\n");
        out.push_str(&format!("\tCurrent order: {}\n", self.pc));
        out.push_str(&format!("\tExecuted instructions: {}\n", self.executed));

        out.push_str("\tGlobal frame:\n");
        push_frame_lines(&mut out, &self.global);
        match &self.temporary {
            Some(frame) => {
                out.push_str("\tTemporary frame:\n");
                push_frame_lines(&mut out, frame);
            }
            None => out.push_str("\tTemporary frame: <not live>\n"),
        }
        out.push_str(&format!(
            "\tFrame stack depth: {}\n",
            self.frame_stack.len()
        ));
        for (i, frame) in self.frame_stack.iter().enumerate().rev() {
            out.push_str(&format!("\tFrame stack [{i}]:\n"));
            push_frame_lines(&mut out, frame);
        }

        let mut labels: Vec<(&String, &u32)> = self.labels.iter().collect();
        labels.sort();
        out.push_str("\tLabels:\n");
        for (name, order) in labels {
            out.push_str(&format!("\t\t{name} -> {order}\n"));
        }

        out.push_str(&format!("\tCall stack: {:?}\n", self.call_stack));
        let data: Vec<String> = self
            .data_stack
            .iter()
            .map(|v| format!("{}@{}", v.type_name(), v.raw_text()))
            .collect();
        out.push_str(&format!("\tData stack: {data:?}\n"));
        out
    }
}

fn push_frame_lines(out: &mut String, frame: &Frame) {
    if frame.is_empty() {
        out.push_str("\t\t<empty>\n");
        return;
    }
    for (name, rendered) in frame.snapshot_entries() {
        out.push_str(&format!("\t\t{name} = {rendered}\n"));
    }
}
