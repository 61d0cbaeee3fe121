use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coalign::render::write_report;
use coalign::{AlignerBuilder, Dedup, SubstitutionMatrix};

/// Print every co-optimal global alignment of two sequences.
#[derive(Parser, Debug)]
#[command(name = "coalign", version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// First sequence to align
    sequence_1: String,
    /// Second sequence to align
    sequence_2: String,
    /// Path of the substitution matrix
    scoring_matrix: PathBuf,
    /// Penalty added when a gap is opened (usually negative)
    gap_open_penalty: i32,
    /// Penalty added when a gap is extended (usually negative)
    gap_extend_penalty: i32,
    /// Drop alignments visiting exactly the same positions as an earlier one
    #[arg(long, default_value_t = false)]
    dedup: bool,
    /// Abort when more than N partial alignments are in flight
    #[arg(long, value_name = "N")]
    max_frontier: Option<usize>,
    /// Print the final score table to stderr
    #[arg(long, default_value_t = false)]
    show_table: bool,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let matrix = SubstitutionMatrix::from_file(&cli.scoring_matrix)
        .with_context(|| format!("loading {}", cli.scoring_matrix.display()))?;

    let mut builder = AlignerBuilder::new(matrix)
        .gap_open(cli.gap_open_penalty)
        .gap_extend(cli.gap_extend_penalty);
    if cli.dedup {
        builder = builder.dedup(Dedup::ByPositions);
    }
    if let Some(limit) = cli.max_frontier {
        builder = builder.max_frontier(limit);
    }
    let engine = builder.build();

    let seq_a = cli.sequence_1.as_bytes();
    let seq_b = cli.sequence_2.as_bytes();
    let set = engine
        .align(seq_a, seq_b)
        .context("alignment failed")?;

    if cli.show_table {
        eprint!("{}", set.table.display_with(seq_a, seq_b));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out)?;
    write_report(&mut out, seq_a, seq_b, &set)?;
    out.flush()?;
    Ok(())
}
