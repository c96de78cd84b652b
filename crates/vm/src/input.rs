//! Input-value source for the READ instruction.
//!
//! Either the interactive standard input or a pre-loaded line queue.
//! One blocking read per request; exhaustion is reported as `None` and
//! never retried.

use std::collections::VecDeque;
use std::io::BufRead;

/// Where READ takes its values from.
#[derive(Debug)]
pub enum Input {
    /// Read lines from the process's standard input.
    Stdin,
    /// Serve lines from a queue loaded up front.
    Lines(VecDeque<String>),
}

impl Input {
    /// Interactive standard input.
    pub fn stdin() -> Self {
        Input::Stdin
    }

    /// Pre-load a queue from text, one entry per line, trailing newline
    /// stripped.
    pub fn from_text(text: &str) -> Self {
        Input::Lines(text.lines().map(|l| l.to_string()).collect())
    }

    /// The next input line, or None on exhaustion/failure.
    pub fn next_line(&mut self) -> Option<String> {
        match self {
            Input::Stdin => {
                let mut line = String::new();
                let n = std::io::stdin().lock().read_line(&mut line).ok()?;
                if n == 0 {
                    return None;
                }
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Input::Lines(queue) => queue.pop_front(),
        }
    }
}
