//! Co-optimal global alignment search.
//!
//! This module implements the two-phase algorithm:
//! 1. A forward pass in rounds. Each round drops frontier paths that fell
//!    behind the score table at their own `(cell, gap state)` node, then
//!    extends every remaining path by each legal move whose target node
//!    accepts the new score (ties accepted). Rounds stop once every path sits
//!    on the terminal cell.
//! 2. A backward pass from the terminal cell that walks predecessor cells
//!    with a worklist. At each cell the surviving paths are grouped by the
//!    gap state they arrive in and only the best prefix score of each group
//!    stays. At the terminal all gap states form one group, which drops
//!    survivors whose final layer is worse than the best.
//!
//! The cost of a move depends only on the current gap state, so keeping the
//! best prefix per `(cell, gap state)` is exact for affine gaps as well.
//!
//! Score table writes happen in frontier order and later paths of a round
//! see the writes of earlier ones. That order decides which ties survive and
//! is kept even with the `parallel` feature, which only parallelizes the
//! read-only staleness sweep.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AlignError, Result};
use crate::path::{Alignment, GapState, Move, PathArena, PathState, Position};
use crate::scoring::{validate_alphabet, GapPenalties, ScoringProvider};
use crate::table::ScoreTable;

/// How to treat finished alignments with identical position histories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dedup {
    /// Return every surviving path as is.
    #[default]
    None,
    /// Keep only the first of each group of paths that visit exactly the
    /// same positions.
    ByPositions,
}

/// Engine settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignConfig {
    pub gaps: GapPenalties,
    pub dedup: Dedup,
    /// Abort with [`AlignError::FrontierLimit`] once the frontier grows past
    /// this many paths.
    pub max_frontier: Option<usize>,
}

/// Counters collected during one [`AlignmentEngine::align`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Forward rounds that expanded at least one path.
    pub rounds: usize,
    /// Largest frontier seen at the end of a round.
    pub peak_frontier: usize,
    /// Path states created by extension.
    pub states_created: usize,
    /// Terminal paths left after the forward pass.
    pub forward_survivors: usize,
    /// Paths removed by the backward pass.
    pub backward_pruned: usize,
    /// Paths removed by [`Dedup::ByPositions`].
    pub duplicates_removed: usize,
}

/// The result of one alignment run.
#[derive(Clone, Debug)]
pub struct AlignmentSet {
    /// Score at the terminal cell; every alignment in the set has it.
    pub best_score: i64,
    pub alignments: Vec<Alignment>,
    /// Final score table, mostly useful for inspection.
    pub table: ScoreTable,
    pub stats: RunStats,
}

impl AlignmentSet {
    pub fn len(&self) -> usize {
        self.alignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Alignment> {
        self.alignments.iter()
    }
}

impl<'s> IntoIterator for &'s AlignmentSet {
    type Item = &'s Alignment;
    type IntoIter = std::slice::Iter<'s, Alignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.alignments.iter()
    }
}

/// Enumerates all maximum-scoring global alignments of two byte sequences.
///
/// ```
/// use coalign::{AlignmentEngine, AlignConfig, scoring::{GapPenalties, UniformScoring}};
///
/// let config = AlignConfig { gaps: GapPenalties::new(-2, -1), ..Default::default() };
/// let engine = AlignmentEngine::new(UniformScoring::new(1, -1), config);
/// let set = engine.align(b"AC", b"AC").unwrap();
/// assert_eq!(set.best_score, 2);
/// assert_eq!(set.len(), 1);
/// ```
pub struct AlignmentEngine<P: ScoringProvider> {
    provider: P,
    config: AlignConfig,
}

impl<P: ScoringProvider> AlignmentEngine<P> {
    pub fn new(provider: P, config: AlignConfig) -> Self {
        Self { provider, config }
    }

    /// Engine with the given gap penalties and default everything else.
    pub fn with_gaps(provider: P, gap_open: i32, gap_extend: i32) -> Self {
        Self::new(
            provider,
            AlignConfig {
                gaps: GapPenalties::new(gap_open, gap_extend),
                ..AlignConfig::default()
            },
        )
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Run the full search for `seq_a` against `seq_b`.
    ///
    /// Fails before searching if the provider cannot score some pair of
    /// symbols occurring in the inputs. Any error discards the partial
    /// search state.
    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> Result<AlignmentSet> {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("align", len_a = seq_a.len(), len_b = seq_b.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        validate_alphabet(&self.provider, seq_a, seq_b)?;

        let mut search = Search::new(self, seq_a, seq_b);
        search.forward()?;
        let survivors = search.finished();
        let mut alignments = search.backward(survivors);

        if self.config.dedup == Dedup::ByPositions {
            let before = alignments.len();
            let mut seen = FxHashSet::default();
            alignments.retain(|aln| seen.insert(aln.positions.clone()));
            search.stats.duplicates_removed = before - alignments.len();
        }

        #[cfg(debug_assertions)]
        search.check_results(&alignments);

        let best_score = search.best_score();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            best_score,
            alignments = alignments.len(),
            rounds = search.stats.rounds,
            peak_frontier = search.stats.peak_frontier,
            "alignment finished"
        );

        Ok(AlignmentSet {
            best_score,
            alignments,
            table: search.table,
            stats: search.stats,
        })
    }
}

/// Mutable state of one run; dropped as a whole on error.
struct Search<'e, P: ScoringProvider> {
    provider: &'e P,
    config: AlignConfig,
    seq_a: &'e [u8],
    seq_b: &'e [u8],
    table: ScoreTable,
    arena: PathArena,
    frontier: Vec<PathState>,
    stats: RunStats,
}

impl<'e, P: ScoringProvider> Search<'e, P> {
    fn new(engine: &'e AlignmentEngine<P>, seq_a: &'e [u8], seq_b: &'e [u8]) -> Self {
        let table = ScoreTable::new(seq_a.len(), seq_b.len());
        let arena = PathArena::with_capacity(seq_a.len() + seq_b.len() + 1);
        let frontier = vec![PathState::origin(&arena)];
        Self {
            provider: &engine.provider,
            config: engine.config,
            seq_a,
            seq_b,
            table,
            arena,
            frontier,
            stats: RunStats::default(),
        }
    }

    #[inline]
    fn terminal(&self) -> Position {
        self.table.terminal()
    }

    /// Every run reaches the terminal cell: gap moves alone always get there.
    fn best_score(&self) -> i64 {
        match self.table.best_score() {
            Some(score) => score,
            None => unreachable!("terminal cell never reached"),
        }
    }

    /// Score change of taking `mv` from `from` with gap state `gap`.
    #[inline]
    fn step_delta(&self, from: Position, gap: GapState, mv: Move) -> Result<i64> {
        let delta = match mv {
            Move::Match => self
                .provider
                .require(self.seq_a[from.a], self.seq_b[from.b])?,
            _ => self.config.gaps.cost(gap, mv),
        };
        Ok(i64::from(delta))
    }

    /// Forward expansion rounds, followed by a last staleness sweep so that
    /// only paths tied with their gap layer of the terminal cell remain.
    fn forward(&mut self) -> Result<()> {
        let terminal = self.terminal();
        loop {
            self.sweep_stale();
            if self.frontier.iter().all(|s| s.position() == terminal) {
                break;
            }
            self.stats.rounds += 1;

            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!(
                "forward_round",
                round = self.stats.rounds,
                frontier = self.frontier.len()
            );
            #[cfg(feature = "tracing")]
            let _enter = span.enter();

            let current = std::mem::take(&mut self.frontier);
            let mut kept = Vec::new();
            let mut children = Vec::with_capacity(current.len() * 2);

            for state in current {
                let from = state.position();
                if from == terminal {
                    kept.push(state);
                    continue;
                }
                for mv in Move::ALL {
                    let Some(target) = from.checked_advance(mv, terminal) else {
                        continue;
                    };
                    let candidate = state.score() + self.step_delta(from, state.gap(), mv)?;
                    if self
                        .table
                        .propose_improve(target, GapState::after(mv), candidate)
                    {
                        children.push(state.extend(&mut self.arena, mv, candidate));
                    }
                }
            }

            kept.append(&mut children);
            self.stats.states_created = self.arena.len() - 1;
            self.stats.peak_frontier = self.stats.peak_frontier.max(kept.len());
            if let Some(limit) = self.config.max_frontier {
                if kept.len() > limit {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(size = kept.len(), limit, "frontier limit exceeded");
                    return Err(AlignError::FrontierLimit {
                        size: kept.len(),
                        limit,
                    });
                }
            }
            self.frontier = kept;
        }

        self.stats.forward_survivors = self.frontier.len();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rounds = self.stats.rounds,
            survivors = self.frontier.len(),
            states = self.stats.states_created,
            "forward pass done"
        );
        Ok(())
    }

    /// Drop every frontier path whose score is below the table value at its
    /// own `(cell, gap state)`; some other branch reaches that node with a
    /// better score.
    fn sweep_stale(&mut self) {
        let table = &self.table;
        let current = |s: &PathState| {
            table
                .get_state(s.position(), s.gap())
                .map_or(true, |best| s.score() >= best)
        };

        #[cfg(feature = "parallel")]
        {
            let keep: Vec<bool> = self.frontier.par_iter().map(current).collect();
            let mut keep = keep.into_iter();
            self.frontier.retain(|_| keep.next().unwrap_or(true));
        }

        #[cfg(not(feature = "parallel"))]
        self.frontier.retain(current);
    }

    /// Detach the terminal frontier from the arena.
    fn finished(&mut self) -> Vec<Alignment> {
        let arena = &self.arena;
        std::mem::take(&mut self.frontier)
            .iter()
            .map(|s| s.materialize(arena))
            .collect()
    }

    /// Backward exactness pass.
    ///
    /// Starting at the terminal cell, each cell `p` on the worklist is checked
    /// against every surviving path through it, using the path's own prefix
    /// score at `p`. Paths are compared only with paths that arrive at `p` in
    /// the same gap state, except at the terminal where every gap state
    /// competes. The best of each group stays (ties stay) and the
    /// predecessors of `p` on the kept paths are queued once each. The origin
    /// needs no check.
    fn backward(&mut self, paths: Vec<Alignment>) -> Vec<Alignment> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("backward_pass", paths = paths.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let terminal = self.terminal();
        let mut alive = vec![true; paths.len()];
        let mut worklist = VecDeque::from([terminal]);
        let mut queued = FxHashSet::default();
        queued.insert(terminal);
        let mut candidates: Vec<(usize, Position, usize, i64)> = Vec::new();

        while let Some(pos) = worklist.pop_front() {
            if pos.is_origin() {
                continue;
            }

            candidates.clear();
            let mut best = [None::<i64>; 3];
            for (idx, path) in paths.iter().enumerate() {
                if !alive[idx] {
                    continue;
                }
                let Some(at) = path.index_of(pos) else {
                    continue;
                };
                assert!(at > 0, "non-origin position {pos:?} at start of history");
                let group = if pos == terminal {
                    0
                } else {
                    path.gap_at(at).index()
                };
                let value = path.prefix_scores[at];
                best[group] = Some(best[group].map_or(value, |b| b.max(value)));
                candidates.push((idx, path.positions[at - 1], group, value));
            }

            for &(idx, pred, group, value) in &candidates {
                if Some(value) == best[group] {
                    if queued.insert(pred) {
                        worklist.push_back(pred);
                    }
                } else {
                    alive[idx] = false;
                    self.stats.backward_pruned += 1;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            checked = queued.len(),
            pruned = self.stats.backward_pruned,
            "backward pass done"
        );

        paths
            .into_iter()
            .zip(alive)
            .filter_map(|(path, keep)| keep.then_some(path))
            .collect()
    }

    /// Debug-build cross-check of every returned path against an independent
    /// replay of its moves.
    #[cfg(debug_assertions)]
    fn check_results(&self, alignments: &[Alignment]) {
        let best = self.best_score();
        for aln in alignments {
            let replayed = crate::utils::replay(
                self.seq_a,
                self.seq_b,
                &aln.moves,
                self.config.gaps,
                self.provider,
            );
            debug_assert_eq!(replayed, Ok(aln.score), "carried score disagrees with replay");
            debug_assert_eq!(aln.score, best, "returned path is not tied with terminal cell");
        }
    }
}
