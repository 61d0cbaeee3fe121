//! Human-readable rendering of finished alignments.
//!
//! ```text
//! AB-
//!  |
//! -BA
//!
//! Alignment score: 0.0
//! Identity value: 33.3%
//! ```
//!
//! The marker line carries `|` only where a `Match` pairs two literally
//! equal symbols; substitutions and gap columns get a space.

use std::fmt;
use std::io::{self, Write};

use crate::engine::AlignmentSet;
use crate::path::{Alignment, Move};

/// Divider printed between consecutive alignments of a report.
pub const DIVIDER: &str = "--------------------";

/// Three-line text form of one alignment plus its summary numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedAlignment {
    pub top: String,
    pub marker: String,
    pub bottom: String,
    pub score: i64,
    /// Columns pairing two equal symbols.
    pub matches: usize,
    /// Number of alignment columns.
    pub len: usize,
}

impl RenderedAlignment {
    /// Lay out `aln` as an alignment of `seq_a` (top) against `seq_b`
    /// (bottom).
    pub fn new(seq_a: &[u8], seq_b: &[u8], aln: &Alignment) -> Self {
        let cols = aln.moves.len();
        let mut top = String::with_capacity(cols);
        let mut marker = String::with_capacity(cols);
        let mut bottom = String::with_capacity(cols);
        let mut matches = 0usize;

        for (&mv, from) in aln.moves.iter().zip(&aln.positions) {
            match mv {
                Move::Match => {
                    let (x, y) = (seq_a[from.a], seq_b[from.b]);
                    top.push(x as char);
                    bottom.push(y as char);
                    if x == y {
                        marker.push('|');
                        matches += 1;
                    } else {
                        marker.push(' ');
                    }
                }
                Move::GapInA => {
                    top.push('-');
                    marker.push(' ');
                    bottom.push(seq_b[from.b] as char);
                }
                Move::GapInB => {
                    top.push(seq_a[from.a] as char);
                    marker.push(' ');
                    bottom.push('-');
                }
            }
        }

        Self {
            top,
            marker,
            bottom,
            score: aln.score,
            matches,
            len: cols,
        }
    }

    /// Percentage of columns pairing equal symbols; 0 for an empty alignment.
    pub fn identity(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            self.matches as f64 / self.len as f64 * 100.0
        }
    }
}

impl fmt::Display for RenderedAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.top)?;
        writeln!(f, "{}", self.marker)?;
        writeln!(f, "{}", self.bottom)?;
        writeln!(f)?;
        writeln!(f, "Alignment score: {:.1}", self.score as f64)?;
        writeln!(f, "Identity value: {:.1}%", self.identity())
    }
}

/// Write the alignment count followed by every alignment of `set`, with a
/// divider line between entries.
pub fn write_report<W: Write>(
    out: &mut W,
    seq_a: &[u8],
    seq_b: &[u8],
    set: &AlignmentSet,
) -> io::Result<()> {
    writeln!(out, "Found {} possible alignments:", set.len())?;
    for (idx, aln) in set.iter().enumerate() {
        if idx > 0 {
            writeln!(out, "{DIVIDER}")?;
        }
        writeln!(out)?;
        write!(out, "{}", RenderedAlignment::new(seq_a, seq_b, aln))?;
    }
    Ok(())
}
