#![cfg(feature = "parallel")]

use std::collections::HashSet;

use coalign::{
    scoring::{GapPenalties, UniformScoring},
    utils::{enumerate_paths, replay},
    AlignmentEngine, Move,
};
use proptest::prelude::*;

fn optimal_set(
    s: &[u8],
    t: &[u8],
    scoring: UniformScoring,
    open: i32,
    extend: i32,
) -> (i64, HashSet<Vec<Move>>) {
    let gaps = GapPenalties::new(open, extend);
    let scored: Vec<(i64, Vec<Move>)> = enumerate_paths(s.len(), t.len())
        .into_iter()
        .map(|moves| (replay(s, t, &moves, gaps, &scoring).unwrap(), moves))
        .collect();
    let best = scored.iter().map(|(score, _)| *score).max().unwrap();
    let set = scored
        .into_iter()
        .filter(|(score, _)| *score == best)
        .map(|(_, moves)| moves)
        .collect();
    (best, set)
}

proptest! {
    #[test]
    fn parallel_sweep_keeps_the_optimal_set(
        a in "[ACGT]{0,4}",
        b in "[ACGT]{0,4}",
        open in -3i32..1,
        extend in -2i32..1,
    ) {
        let scoring = UniformScoring::new(1, -1);
        let set = AlignmentEngine::with_gaps(scoring, open, extend)
            .align(a.as_bytes(), b.as_bytes())
            .unwrap();
        let (best, expected) = optimal_set(a.as_bytes(), b.as_bytes(), scoring, open, extend);
        prop_assert_eq!(set.best_score, best);
        let found: HashSet<Vec<Move>> = set.iter().map(|aln| aln.moves.clone()).collect();
        prop_assert_eq!(found, expected);
    }
}

#[test]
fn repeated_runs_return_identical_order() {
    let engine = AlignmentEngine::with_gaps(UniformScoring::new(0, 0), 0, 0);
    let first = engine.align(b"ACGTA", b"TTGCA").unwrap();
    for _ in 0..4 {
        let again = engine.align(b"ACGTA", b"TTGCA").unwrap();
        assert_eq!(again.alignments, first.alignments);
        assert_eq!(again.stats, first.stats);
    }
}
