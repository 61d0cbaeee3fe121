use crate::engine::{AlignConfig, AlignmentEngine, Dedup};
use crate::scoring::{GapPenalties, ScoringProvider};

pub struct AlignerBuilder<P: ScoringProvider> {
    provider: P,
    gap_open: Option<i32>,
    gap_extend: Option<i32>,
    dedup: Dedup,
    max_frontier: Option<usize>,
}

impl<P: ScoringProvider> AlignerBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            gap_open: None,
            gap_extend: None,
            dedup: Dedup::None,
            max_frontier: None,
        }
    }
    pub fn gap_open(mut self, penalty: i32) -> Self {
        self.gap_open = Some(penalty);
        self
    }
    pub fn gap_extend(mut self, penalty: i32) -> Self {
        self.gap_extend = Some(penalty);
        self
    }
    pub fn dedup(mut self, dedup: Dedup) -> Self {
        self.dedup = dedup;
        self
    }
    /// Abort a run once the frontier holds more than `limit` paths.
    pub fn max_frontier(mut self, limit: usize) -> Self {
        self.max_frontier = Some(limit);
        self
    }
    pub fn build(self) -> AlignmentEngine<P> {
        let defaults = GapPenalties::default();
        let config = AlignConfig {
            gaps: GapPenalties::new(
                self.gap_open.unwrap_or(defaults.open),
                self.gap_extend.unwrap_or(defaults.extend),
            ),
            dedup: self.dedup,
            max_frontier: self.max_frontier,
        };
        AlignmentEngine::new(self.provider, config)
    }
}
