//! `json-merge-patch`: apply a JSON Merge Patch (RFC 7396) to a document.
//!
//! Usage:
//!   json-merge-patch '<patch-json>'
//!
//! The document is read from stdin. The merge patch is the first argument.

use std::io::{self, Read, Write};

use jsonkit::json_cli::apply_merge_patch;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let patch = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be a JSON merge patch.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_merge_patch(&buf, &patch) {
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
