//! `json-format`: validate and re-emit a JSON document.
//!
//! Usage:
//!   json-format [--compact]
//!
//! The document is read from stdin and written pretty-printed unless
//! `--compact` is given.

use std::io::{self, Read, Write};

use jsonkit::json_cli::format_json;

fn main() {
    let mut pretty = true;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--compact" => pretty = false,
            "--pretty" => pretty = true,
            other => {
                eprintln!("Unknown option: {other}");
                std::process::exit(1);
            }
        }
    }

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match format_json(&buf, pretty) {
        Ok(result) => {
            if let Err(e) = writeln!(io::stdout(), "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
