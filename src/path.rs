//! Partial alignments and the arena that stores their histories.
//!
//! A [`PathState`] is one in-flight alignment: its position in the grid, its
//! accumulated score and which gap (if any) its last move left open. The
//! move/position history is not owned by the state itself. Every extension
//! appends a single node to a shared [`PathArena`] pointing back at its
//! parent, so co-optimal branches share their common prefix and cloning a
//! state is O(1). Nodes also record the score reached at their position, so a
//! finished path knows its own prefix score at every cell it visited.
//!
//! Scores are `i64`: per-step penalties are `i32`, and a sum over a long path
//! of extreme penalties must not wrap.

/// Consumption offsets into both sequences; a cell of the score grid.
///
/// `a` symbols of sequence A and `b` symbols of sequence B have been
/// consumed. The origin is `(0, 0)`; the terminal cell is `(|A|, |B|)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub a: usize,
    pub b: usize,
}

impl Position {
    #[inline]
    pub const fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    #[inline]
    pub const fn origin() -> Self {
        Self { a: 0, b: 0 }
    }

    #[inline]
    pub fn is_origin(&self) -> bool {
        self.a == 0 && self.b == 0
    }

    /// Position reached by applying `mv`, without bounds checking.
    #[inline]
    pub fn advance(self, mv: Move) -> Self {
        let (da, db) = mv.delta();
        Self {
            a: self.a + da,
            b: self.b + db,
        }
    }

    /// Position reached by applying `mv`, or `None` when it would leave the
    /// grid whose last cell is `terminal`.
    #[inline]
    pub fn checked_advance(self, mv: Move, terminal: Position) -> Option<Self> {
        let next = self.advance(mv);
        (next.a <= terminal.a && next.b <= terminal.b).then_some(next)
    }

    /// The move that leads from `self` to `next`, if they are one step apart.
    pub fn step_to(self, next: Position) -> Option<Move> {
        match (
            next.a.checked_sub(self.a)?,
            next.b.checked_sub(self.b)?,
        ) {
            (1, 1) => Some(Move::Match),
            (0, 1) => Some(Move::GapInA),
            (1, 0) => Some(Move::GapInB),
            _ => None,
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((a, b): (usize, usize)) -> Self {
        Self { a, b }
    }
}

/// One step of an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Consume one symbol of each sequence, scored by the substitution score
    /// whether or not the symbols are equal.
    Match,
    /// Consume one symbol of B only; a gap is placed in A.
    GapInA,
    /// Consume one symbol of A only; a gap is placed in B.
    GapInB,
}

impl Move {
    /// Expansion order used by the engine.
    pub const ALL: [Move; 3] = [Move::Match, Move::GapInA, Move::GapInB];

    /// `(da, db)` advance along the A and B axes.
    #[inline]
    pub const fn delta(self) -> (usize, usize) {
        match self {
            Move::Match => (1, 1),
            Move::GapInA => (0, 1),
            Move::GapInB => (1, 0),
        }
    }

    #[inline]
    pub const fn is_gap(self) -> bool {
        !matches!(self, Move::Match)
    }
}

/// Gap state after a move: which gap kind, if any, is currently open.
///
/// The two flags of a path are mutually exclusive, so they are folded into a
/// single enum; [`PathState::gap_in_a_open`] and
/// [`PathState::gap_in_b_open`] expose the flag view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GapState {
    #[default]
    Closed,
    InA,
    InB,
}

impl GapState {
    /// Every state, in [`GapState::index`] order.
    pub const ALL: [GapState; 3] = [GapState::Closed, GapState::InA, GapState::InB];

    /// Dense index, used to lay out per-state table slots.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            GapState::Closed => 0,
            GapState::InA => 1,
            GapState::InB => 2,
        }
    }

    /// Gap state left behind by `mv`.
    #[inline]
    pub const fn after(mv: Move) -> Self {
        match mv {
            Move::Match => GapState::Closed,
            Move::GapInA => GapState::InA,
            Move::GapInB => GapState::InB,
        }
    }

    /// True if taking `mv` next extends the currently open gap.
    #[inline]
    pub fn extends(self, mv: Move) -> bool {
        matches!(
            (self, mv),
            (GapState::InA, Move::GapInA) | (GapState::InB, Move::GapInB)
        )
    }
}

/// Index of a node in a [`PathArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
struct PathNode {
    parent: Option<NodeId>,
    step: Option<Move>,
    pos: Position,
    score: i64,
}

/// Append-only storage of path histories shared by all states of one run.
#[derive(Debug)]
pub struct PathArena {
    nodes: Vec<PathNode>,
}

impl PathArena {
    /// Create an arena holding only the origin node.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(PathNode {
            parent: None,
            step: None,
            pos: Position::origin(),
            score: 0,
        });
        Self { nodes }
    }

    /// The node every history starts from.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, parent: NodeId, step: Move, pos: Position, score: i64) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("path arena exceeded u32::MAX nodes");
        self.nodes.push(PathNode {
            parent: Some(parent),
            step: Some(step),
            pos,
            score,
        });
        NodeId(id)
    }

    /// Rebuild the full history ending at `tip`: moves, visited positions
    /// and the score reached at each of those positions.
    pub fn history(&self, tip: NodeId) -> (Vec<Move>, Vec<Position>, Vec<i64>) {
        let mut moves = Vec::new();
        let mut positions = Vec::new();
        let mut scores = Vec::new();
        let mut cursor = Some(tip);
        while let Some(id) = cursor {
            let node = self.nodes[id.index()];
            positions.push(node.pos);
            scores.push(node.score);
            if let Some(step) = node.step {
                moves.push(step);
            }
            cursor = node.parent;
        }
        moves.reverse();
        positions.reverse();
        scores.reverse();

        debug_assert_eq!(positions.len(), moves.len() + 1);
        debug_assert_eq!(positions.first(), Some(&Position::origin()));
        debug_assert!(positions
            .windows(2)
            .zip(&moves)
            .all(|(w, &mv)| w[0].advance(mv) == w[1]));
        (moves, positions, scores)
    }
}

impl Default for PathArena {
    fn default() -> Self {
        Self::new()
    }
}

/// One partial alignment in the engine frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathState {
    tip: NodeId,
    pos: Position,
    score: i64,
    gap: GapState,
    len: usize,
}

impl PathState {
    /// The empty alignment at the origin with score 0.
    pub fn origin(arena: &PathArena) -> Self {
        Self {
            tip: arena.root(),
            pos: Position::origin(),
            score: 0,
            gap: GapState::Closed,
            len: 0,
        }
    }

    /// Clone-with-extension: the state reached by taking `mv` with the
    /// resulting cumulative `score`. `self` is left untouched.
    pub fn extend(&self, arena: &mut PathArena, mv: Move, score: i64) -> Self {
        let pos = self.pos.advance(mv);
        let tip = arena.push(self.tip, mv, pos, score);
        Self {
            tip,
            pos,
            score,
            gap: GapState::after(mv),
            len: self.len + 1,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn gap(&self) -> GapState {
        self.gap
    }

    #[inline]
    pub fn gap_in_a_open(&self) -> bool {
        self.gap == GapState::InA
    }

    #[inline]
    pub fn gap_in_b_open(&self) -> bool {
        self.gap == GapState::InB
    }

    /// Number of moves taken so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn tip(&self) -> NodeId {
        self.tip
    }

    /// Detach this state from the arena into an owned [`Alignment`].
    pub fn materialize(&self, arena: &PathArena) -> Alignment {
        let (moves, positions, prefix_scores) = arena.history(self.tip);
        debug_assert_eq!(moves.len(), self.len);
        debug_assert_eq!(positions.last(), Some(&self.pos));
        debug_assert_eq!(prefix_scores.last(), Some(&self.score));
        Alignment {
            moves,
            positions,
            prefix_scores,
            score: self.score,
        }
    }
}

/// A finished alignment with its full history.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub moves: Vec<Move>,
    /// Visited positions, origin first; always one longer than `moves`.
    pub positions: Vec<Position>,
    /// Score reached at each visited position, parallel to `positions`.
    pub prefix_scores: Vec<i64>,
    pub score: i64,
}

impl Alignment {
    /// Index of `pos` in the visited history, if the path passes through it.
    ///
    /// Positions along a path are strictly increasing in `a + b`, so a binary
    /// search on that key finds the only candidate.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        let key = pos.a + pos.b;
        let idx = self
            .positions
            .binary_search_by_key(&key, |p| p.a + p.b)
            .ok()?;
        (self.positions[idx] == pos).then_some(idx)
    }

    /// Gap state the path is in on arrival at `positions[idx]`.
    pub fn gap_at(&self, idx: usize) -> GapState {
        idx.checked_sub(1)
            .map_or(GapState::Closed, |i| GapState::after(self.moves[i]))
    }

    /// The position visited right before `pos` on this path.
    pub fn predecessor_of(&self, pos: Position) -> Option<Position> {
        let idx = self.index_of(pos)?;
        idx.checked_sub(1).map(|i| self.positions[i])
    }

    pub fn end(&self) -> Position {
        *self
            .positions
            .last()
            .expect("alignment history always holds the origin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_flags_are_exclusive_and_transient() {
        let mut arena = PathArena::new();
        let s0 = PathState::origin(&arena);
        let s1 = s0.extend(&mut arena, Move::GapInA, -2);
        assert!(s1.gap_in_a_open() && !s1.gap_in_b_open());
        let s2 = s1.extend(&mut arena, Move::GapInB, -4);
        assert!(!s2.gap_in_a_open() && s2.gap_in_b_open());
        let s3 = s2.extend(&mut arena, Move::Match, -3);
        assert!(!s3.gap_in_a_open() && !s3.gap_in_b_open());
        assert_eq!(s3.position(), Position::new(2, 2));
    }

    #[test]
    fn extension_leaves_parent_untouched() {
        let mut arena = PathArena::new();
        let root = PathState::origin(&arena);
        let left = root.extend(&mut arena, Move::GapInA, -1);
        let right = root.extend(&mut arena, Move::GapInB, -1);
        assert_eq!(root.position(), Position::origin());
        assert!(root.is_empty());

        let left = left.materialize(&arena);
        let right = right.materialize(&arena);
        assert_eq!(left.moves, vec![Move::GapInA]);
        assert_eq!(right.moves, vec![Move::GapInB]);
        assert_eq!(
            left.positions,
            vec![Position::origin(), Position::new(0, 1)]
        );
    }

    #[test]
    fn shared_prefix_is_stored_once() {
        let mut arena = PathArena::new();
        let root = PathState::origin(&arena);
        let m = root.extend(&mut arena, Move::Match, 1);
        let _x = m.extend(&mut arena, Move::GapInA, -1);
        let _y = m.extend(&mut arena, Move::GapInB, -1);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    fn checked_advance_respects_bounds() {
        let end = Position::new(1, 0);
        let o = Position::origin();
        assert_eq!(o.checked_advance(Move::Match, end), None);
        assert_eq!(o.checked_advance(Move::GapInA, end), None);
        assert_eq!(o.checked_advance(Move::GapInB, end), Some(end));
    }

    #[test]
    fn step_to_inverts_advance() {
        let p = Position::new(3, 5);
        for mv in Move::ALL {
            assert_eq!(p.step_to(p.advance(mv)), Some(mv));
        }
        assert_eq!(p.step_to(Position::new(5, 5)), None);
        assert_eq!(p.step_to(Position::new(2, 5)), None);
    }

    #[test]
    fn predecessor_lookup() {
        let mut arena = PathArena::new();
        let s = PathState::origin(&arena)
            .extend(&mut arena, Move::GapInB, -2)
            .extend(&mut arena, Move::Match, -1)
            .extend(&mut arena, Move::GapInA, -3);
        let aln = s.materialize(&arena);
        assert_eq!(aln.end(), Position::new(2, 2));
        assert_eq!(
            aln.predecessor_of(Position::new(2, 2)),
            Some(Position::new(2, 1))
        );
        assert_eq!(
            aln.predecessor_of(Position::new(1, 0)),
            Some(Position::origin())
        );
        assert_eq!(aln.predecessor_of(Position::origin()), None);
        assert_eq!(aln.index_of(Position::new(1, 1)), None);
    }

    #[test]
    fn history_keeps_prefix_scores_and_gaps() {
        let mut arena = PathArena::new();
        let s = PathState::origin(&arena)
            .extend(&mut arena, Move::GapInA, -600_000_000)
            .extend(&mut arena, Move::GapInA, -1_800_000_000)
            .extend(&mut arena, Move::Match, -3_000_000_000);
        let aln = s.materialize(&arena);
        assert_eq!(
            aln.prefix_scores,
            vec![0, -600_000_000, -1_800_000_000, -3_000_000_000]
        );
        assert_eq!(aln.score, -3_000_000_000);
        assert_eq!(aln.gap_at(0), GapState::Closed);
        assert_eq!(aln.gap_at(2), GapState::InA);
        assert_eq!(aln.gap_at(3), GapState::Closed);
    }

    #[test]
    fn gap_state_indices_are_dense() {
        for (i, g) in GapState::ALL.iter().enumerate() {
            assert_eq!(g.index(), i);
        }
    }
}
