//! The scoring seam consumed by the engine.
//!
//! The engine never interprets symbols itself. It asks a [`ScoringProvider`]
//! for the substitution score of a pair and applies the affine gap rule on
//! top. Providers must be symmetric: `score(x, y) == score(y, x)`.

use crate::error::{AlignError, Result};
use crate::path::{GapState, Move};

/// Symmetric pairwise substitution scores.
///
/// `None` means the pair is undefined, which the engine reports as
/// [`AlignError::MissingScore`]. There is no fallback value.
pub trait ScoringProvider {
    fn score(&self, a: u8, b: u8) -> Option<i32>;

    /// Like [`score`](Self::score) but with the missing-pair error attached.
    fn require(&self, a: u8, b: u8) -> Result<i32> {
        self.score(a, b).ok_or(AlignError::MissingScore {
            a: a as char,
            b: b as char,
        })
    }
}

impl<P: ScoringProvider + ?Sized> ScoringProvider for &P {
    fn score(&self, a: u8, b: u8) -> Option<i32> {
        (**self).score(a, b)
    }
}

/// Identity scoring: `matched` for equal symbols, `mismatched` otherwise.
///
/// Defined for every byte pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformScoring {
    pub matched: i32,
    pub mismatched: i32,
}

impl UniformScoring {
    pub const fn new(matched: i32, mismatched: i32) -> Self {
        Self {
            matched,
            mismatched,
        }
    }
}

impl Default for UniformScoring {
    fn default() -> Self {
        Self::new(1, -1)
    }
}

impl ScoringProvider for UniformScoring {
    #[inline]
    fn score(&self, a: u8, b: u8) -> Option<i32> {
        Some(if a == b { self.matched } else { self.mismatched })
    }
}

/// Two-parameter affine gap model.
///
/// Both values are added to the score, so penalties are usually negative or
/// zero. A gap move pays `extend` when the previous move was a gap of the same
/// kind and `open` otherwise; a `GapInA` directly after a `GapInB` opens a
/// new gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GapPenalties {
    pub open: i32,
    pub extend: i32,
}

impl GapPenalties {
    pub const fn new(open: i32, extend: i32) -> Self {
        Self { open, extend }
    }

    /// Penalty of taking gap move `mv` from gap state `gap`. Zero for `Match`.
    #[inline]
    pub fn cost(self, gap: GapState, mv: Move) -> i32 {
        if !mv.is_gap() {
            0
        } else if gap.extends(mv) {
            self.extend
        } else {
            self.open
        }
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self::new(-10, -1)
    }
}

/// Check that `provider` scores every unordered pair over the union of the
/// symbols in `seq_a` and `seq_b`, each symbol with itself included.
pub fn validate_alphabet<P: ScoringProvider + ?Sized>(
    provider: &P,
    seq_a: &[u8],
    seq_b: &[u8],
) -> Result<()> {
    let mut seen = [false; 256];
    for &c in seq_a.iter().chain(seq_b) {
        seen[c as usize] = true;
    }
    let alphabet: Vec<u8> = (0..=u8::MAX).filter(|&c| seen[c as usize]).collect();

    for (i, &x) in alphabet.iter().enumerate() {
        for &y in &alphabet[i..] {
            provider.require(x, y)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlySelf;

    impl ScoringProvider for OnlySelf {
        fn score(&self, a: u8, b: u8) -> Option<i32> {
            (a == b).then_some(1)
        }
    }

    #[test]
    fn uniform_is_symmetric() {
        let s = UniformScoring::new(2, -3);
        for &(x, y) in &[(b'A', b'C'), (b'G', b'G'), (b'*', b'W')] {
            assert_eq!(s.score(x, y), s.score(y, x));
        }
        assert_eq!(s.score(b'A', b'A'), Some(2));
        assert_eq!(s.score(b'A', b'T'), Some(-3));
    }

    #[test]
    fn validation_covers_cross_pairs() {
        assert!(validate_alphabet(&OnlySelf, b"AAA", b"A").is_ok());
        let err = validate_alphabet(&OnlySelf, b"A", b"C").unwrap_err();
        assert!(matches!(err, AlignError::MissingScore { a: 'A', b: 'C' }));
    }

    #[test]
    fn validation_includes_symbols_within_one_sequence() {
        // A and C never meet in a Match here, but both occur in the input.
        let err = validate_alphabet(&OnlySelf, b"AC", b"").unwrap_err();
        assert!(matches!(err, AlignError::MissingScore { .. }));
    }

    #[test]
    fn gap_cost_follows_previous_move() {
        let g = GapPenalties::new(-5, -1);
        assert_eq!(g.cost(GapState::Closed, Move::GapInA), -5);
        assert_eq!(g.cost(GapState::InA, Move::GapInA), -1);
        assert_eq!(g.cost(GapState::InA, Move::GapInB), -5);
        assert_eq!(g.cost(GapState::InB, Move::GapInB), -1);
        assert_eq!(g.cost(GapState::InB, Move::Match), 0);
    }

    #[test]
    fn empty_inputs_need_nothing() {
        assert!(validate_alphabet(&OnlySelf, b"", b"").is_ok());
    }
}
