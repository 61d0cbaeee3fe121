//! Example: list every co-optimal alignment of two short DNA strings.
//!
//! Run with:
//! `cargo run --example align`
//!
//! Uses a uniform match/mismatch score, so no matrix file is needed.

use coalign::{render::RenderedAlignment, scoring::UniformScoring, AlignerBuilder};

fn main() {
    let s = b"GATTACA";
    let t = b"GCATGCA";

    // +1 match, -1 mismatch, linear gaps of -1.
    let engine = AlignerBuilder::new(UniformScoring::new(1, -1))
        .gap_open(-1)
        .gap_extend(-1)
        .build();

    let set = match engine.align(s, t) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("alignment failed: {err}");
            std::process::exit(1);
        }
    };

    println!("Best score: {}", set.best_score);
    println!("Co-optimal alignments: {}", set.len());
    println!(
        "Forward rounds: {}, peak frontier: {}",
        set.stats.rounds, set.stats.peak_frontier
    );

    for (idx, aln) in set.iter().enumerate() {
        let r = RenderedAlignment::new(s, t, aln);
        println!();
        println!("#{}  identity {:.1}%", idx + 1, r.identity());
        println!("{}", r.top);
        println!("{}", r.marker);
        println!("{}", r.bottom);
    }
}
