//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch '<patch-array-json>'
//!
//! The document is read from stdin. The patch operations are the first argument.

use std::io::{self, Read, Write};

use jsonkit::json_cli::apply_json_patch;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let patch = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be a JSON patch array.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_json_patch(&buf, &patch) {
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
