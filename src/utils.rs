//! Assorted utilities and helpers.
//!
//! [`replay`] re-scores a finished move list from scratch. The engine uses it
//! in debug builds to cross-check the scores it carried along each path, and
//! the tests use it as the independent scoring rule for brute-force checks.

use crate::path::{GapState, Move, Position};
use crate::scoring::{GapPenalties, ScoringProvider};

/// Why a move list could not be replayed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("move {step} ({mv:?}) leaves the grid at {from:?}")]
    OutOfBounds { step: usize, mv: Move, from: Position },
    #[error("moves end at {end:?} instead of {terminal:?}")]
    NotTerminal { end: Position, terminal: Position },
    #[error("no substitution score for pair ({a}, {b})")]
    MissingScore { a: char, b: char },
}

/// Score `moves` as an alignment of `seq_a` against `seq_b`.
///
/// Enforces the grid bounds at every step and requires the walk to end on
/// the terminal position `(|A|, |B|)`.
pub fn replay<P: ScoringProvider + ?Sized>(
    seq_a: &[u8],
    seq_b: &[u8],
    moves: &[Move],
    gaps: GapPenalties,
    provider: &P,
) -> Result<i64, ReplayError> {
    let terminal = Position::new(seq_a.len(), seq_b.len());
    let mut pos = Position::origin();
    let mut gap = GapState::Closed;
    let mut score = 0i64;

    for (step, &mv) in moves.iter().enumerate() {
        let next = pos
            .checked_advance(mv, terminal)
            .ok_or(ReplayError::OutOfBounds { step, mv, from: pos })?;
        let delta = match mv {
            Move::Match => {
                let (a, b) = (seq_a[pos.a], seq_b[pos.b]);
                provider.score(a, b).ok_or(ReplayError::MissingScore {
                    a: a as char,
                    b: b as char,
                })?
            }
            _ => gaps.cost(gap, mv),
        };
        score += i64::from(delta);
        gap = GapState::after(mv);
        pos = next;
    }

    if pos != terminal {
        return Err(ReplayError::NotTerminal { end: pos, terminal });
    }
    Ok(score)
}

/// Every move sequence from the origin to `(len_a, len_b)`.
///
/// Grows like the Delannoy numbers; only meant for very short inputs.
pub fn enumerate_paths(len_a: usize, len_b: usize) -> Vec<Vec<Move>> {
    fn walk(
        pos: Position,
        terminal: Position,
        prefix: &mut Vec<Move>,
        out: &mut Vec<Vec<Move>>,
    ) {
        if pos == terminal {
            out.push(prefix.clone());
            return;
        }
        for mv in Move::ALL {
            if let Some(next) = pos.checked_advance(mv, terminal) {
                prefix.push(mv);
                walk(next, terminal, prefix, out);
                prefix.pop();
            }
        }
    }

    let mut out = Vec::new();
    walk(
        Position::origin(),
        Position::new(len_a, len_b),
        &mut Vec::new(),
        &mut out,
    );
    out
}
