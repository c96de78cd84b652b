//! TACode CLI — parse and execute a TACode program.
//!
//! Exit statuses:
//! - 0–49: the program's own status (0 if it ran off the end)
//! - 10: bad command-line usage
//! - 11: an input file could not be read
//! - 31: source stream structure error (header, encoding)
//! - 32: lexical or structural error in the source
//! - 52–58: runtime error

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use tacode_vm::Input;

fn main() {
    process::exit(run());
}

struct Options {
    source: Option<String>,
    input: Option<String>,
}

fn run() -> i32 {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return 0;
        }
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            print_usage();
            return 10;
        }
    };

    let text = match read_source(options.source.as_deref()) {
        Ok(text) => text,
        Err(status) => return status,
    };
    let input = match options.input.as_deref() {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => Input::from_text(&content),
            Err(e) => {
                eprintln!("error: cannot read '{path}': {e}");
                return 11;
            }
        },
        None => Input::stdin(),
    };

    let program = match tacode_parser::parse(&text) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("error: {e}");
            return e.status();
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut diag = stderr.lock();
    match tacode_vm::run(&program, input, &mut out, &mut diag) {
        Ok(status) => {
            let _ = out.flush();
            status
        }
        Err(e) => {
            let _ = out.flush();
            drop(diag);
            eprintln!("error: {e}");
            e.status()
        }
    }
}

/// Parse command-line arguments. `Ok(None)` means help was requested.
fn parse_args(args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut source = None;
    let mut input = None;
    let mut args = args;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--source" => source = Some(take_value(&mut args, "--source")?),
            "--input" => input = Some(take_value(&mut args, "--input")?),
            other => match other.strip_prefix("--source=") {
                Some(value) => source = Some(value.to_string()),
                None => match other.strip_prefix("--input=") {
                    Some(value) => input = Some(value.to_string()),
                    None => return Err(format!("unknown argument '{other}'")),
                },
            },
        }
    }

    if source.is_none() && input.is_none() {
        return Err("at least one of --source and --input is required".to_string());
    }
    Ok(Some(Options { source, input }))
}

fn take_value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a file"))
}

/// The source text, from a file or standard input. Reads bytes first so
/// a bad encoding is a stream error, not a file error.
fn read_source(path: Option<&str>) -> Result<String, i32> {
    let bytes = match path {
        Some(path) => fs::read(path).map_err(|e| {
            eprintln!("error: cannot read '{path}': {e}");
            11
        })?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().lock().read_to_end(&mut buffer).map_err(|e| {
                eprintln!("error: cannot read standard input: {e}");
                11
            })?;
            buffer
        }
    };
    String::from_utf8(bytes).map_err(|_| {
        eprintln!("error: source is not valid UTF-8");
        31
    })
}

fn print_usage() {
    eprintln!("Usage: tacode [--source FILE] [--input FILE]");
    eprintln!();
    eprintln!("Parses a TACode program and executes it.");
    eprintln!();
    eprintln!("  --source FILE   Program source (default: standard input)");
    eprintln!("  --input FILE    Lines served to READ (default: standard input)");
    eprintln!();
    eprintln!("At least one of --source and --input must be given.");
}
