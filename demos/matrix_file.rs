//! Example: align two protein fragments with the bundled BLOSUM62 matrix.
//!
//! Run with:
//! `cargo run --example matrix_file -- [MATRIX]`
//!
//! Defaults to `data/BLOSUM62` in the crate root.

use std::io;
use std::path::PathBuf;

use coalign::{render::write_report, AlignerBuilder, SubstitutionMatrix};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/BLOSUM62"));
    let matrix = SubstitutionMatrix::from_file(&path)?;
    println!("Loaded {} symbols from {}", matrix.len(), path.display());

    let a = b"HEAGAWGHEE";
    let b = b"PAWHEAE";

    for (open, extend) in [(-10, -1), (-8, -8)] {
        let engine = AlignerBuilder::new(&matrix)
            .gap_open(open)
            .gap_extend(extend)
            .build();
        let set = engine.align(a, b)?;
        println!("\n== gap open {open}, extend {extend} ==");
        write_report(&mut io::stdout().lock(), a, b, &set)?;
    }
    Ok(())
}
