//! Dense score grid used for every pruning decision.
//!
//! Cell `(a, b)` holds, for each [`GapState`], the best cumulative score known
//! so far for a path that consumed `a` symbols of A and `b` symbols of B and
//! arrived in that gap state. The cost of the next move depends only on the
//! gap state, so pruning per `(cell, gap state)` never discards the prefix of
//! an optimal alignment. Values only ever increase during one run; a slot
//! nobody has reached is `None`.

use std::fmt;

use crate::path::{GapState, Position};

type Slots = [Option<i64>; 3];

/// `(|A|+1) × (|B|+1)` grid of best-known scores, stored row-major by `a`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreTable {
    rows: usize,
    cols: usize,
    cells: Vec<Slots>,
}

impl ScoreTable {
    /// A table for sequences of length `len_a` and `len_b`: only the origin is
    /// reached, with score 0 and no gap open.
    pub fn new(len_a: usize, len_b: usize) -> Self {
        let rows = len_a + 1;
        let cols = len_b + 1;
        let mut cells = vec![[None; 3]; rows * cols];
        cells[0][GapState::Closed.index()] = Some(0);
        Self { rows, cols, cells }
    }

    /// `(rows, cols)` = `(|A|+1, |B|+1)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The accepting end cell `(|A|, |B|)`.
    #[inline]
    pub fn terminal(&self) -> Position {
        Position::new(self.rows - 1, self.cols - 1)
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.a < self.rows && pos.b < self.cols
    }

    #[inline]
    fn offset(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {pos:?} outside {}x{} score table",
            self.rows,
            self.cols
        );
        pos.a * self.cols + pos.b
    }

    /// Best known score at `pos` over all gap states, or `None` while the
    /// cell is unreached.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<i64> {
        self.cells[self.offset(pos)].iter().flatten().copied().max()
    }

    /// Best known score of paths that arrive at `pos` in gap state `gap`.
    #[inline]
    pub fn get_state(&self, pos: Position, gap: GapState) -> Option<i64> {
        self.cells[self.offset(pos)][gap.index()]
    }

    /// Record `candidate` for `(pos, gap)` if it is at least as good as the
    /// current value. Ties are accepted so co-optimal branches stay alive.
    #[inline]
    pub fn propose_improve(&mut self, pos: Position, gap: GapState, candidate: i64) -> bool {
        let idx = self.offset(pos);
        let slot = &mut self.cells[idx][gap.index()];
        match *slot {
            Some(current) if candidate < current => false,
            _ => {
                *slot = Some(candidate);
                true
            }
        }
    }

    /// Best score at the terminal cell, over all gap states.
    #[inline]
    pub fn best_score(&self) -> Option<i64> {
        self.get(self.terminal())
    }

    /// Pretty-print the per-cell best with sequence symbols along the axes:
    /// A down the rows, B across the columns, `-` heading the empty prefix.
    pub fn display_with<'t>(&'t self, seq_a: &'t [u8], seq_b: &'t [u8]) -> TableDisplay<'t> {
        TableDisplay {
            table: self,
            seq_a,
            seq_b,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`ScoreTable::display_with`].
pub struct TableDisplay<'t> {
    table: &'t ScoreTable,
    seq_a: &'t [u8],
    seq_b: &'t [u8],
}

impl fmt::Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 5;
        let label = |seq: &[u8], i: usize| -> char {
            match i.checked_sub(1) {
                Some(k) => seq.get(k).map(|&c| c as char).unwrap_or('?'),
                None => '-',
            }
        };

        write!(f, "   ")?;
        for b in 0..self.table.cols {
            write!(f, " {:>WIDTH$}", label(self.seq_b, b))?;
        }
        writeln!(f)?;

        for a in 0..self.table.rows {
            write!(f, "[{}]", label(self.seq_a, a))?;
            for b in 0..self.table.cols {
                match self.table.get(Position::new(a, b)) {
                    Some(v) => write!(f, " {v:>WIDTH$}")?,
                    None => write!(f, " {:>WIDTH$}", "-inf")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
