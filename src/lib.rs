//! Co-optimal global alignment (coalign)
//!
//! This crate enumerates **every** maximum-scoring global alignment of two
//! byte sequences under a symmetric substitution score and a two-parameter
//! affine gap model, instead of tracing back a single optimum.
//!
//! ## Core idea
//! 1. Describe pair scores with a [`ScoringProvider`] (a parsed
//!    [`SubstitutionMatrix`] or [`UniformScoring`]).
//! 2. Configure gap penalties through [`AlignerBuilder`].
//! 3. Let [`AlignmentEngine`] run the search: a round-based forward pass that
//!    branches on ties and prunes against a dense [`ScoreTable`], then a
//!    backward pass that verifies each surviving path cell by cell.
//!
//! Partial alignments share their history prefixes in a [`PathArena`], so
//! heavy tie branching costs one node per extension rather than a copy of the
//! whole path.
//!
//! ## Quick start
//! ```
//! use coalign::{AlignerBuilder, scoring::UniformScoring};
//!
//! let engine = AlignerBuilder::new(UniformScoring::new(2, -1))
//!     .gap_open(-1)
//!     .gap_extend(-1)
//!     .build();
//! let set = engine.align(b"AB", b"BA").unwrap();
//! assert_eq!(set.best_score, 0);
//! assert_eq!(set.len(), 2);
//! ```
//!
//! ## Features
//! - `tracing` (default): spans and debug events for runs, rounds and the
//!   backward pass.
//! - `parallel`: computes the per-round staleness sweep with rayon. Score
//!   table updates stay sequential, so results are identical.

pub mod builder;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod path;
pub mod render;
pub mod scoring;
pub mod table;
pub mod utils;

pub use crate::builder::AlignerBuilder;
pub use crate::engine::{AlignConfig, AlignmentEngine, AlignmentSet, Dedup, RunStats};
pub use crate::error::{AlignError, Result};
pub use crate::matrix::SubstitutionMatrix;
pub use crate::path::{Alignment, GapState, Move, PathArena, PathState, Position};
pub use crate::render::RenderedAlignment;
pub use crate::scoring::{GapPenalties, ScoringProvider, UniformScoring};
pub use crate::table::ScoreTable;
