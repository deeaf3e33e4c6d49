use serde::{Deserialize, Serialize};

/// A 0-indexed row/byte-column position in a document.
///
/// Ordering is row-major, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// An end-inclusive region of a document.
///
/// Invariant: `start <= end` in row-major, then column order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Range {
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(start: Pos, end: Pos) -> Self {
        debug_assert!(start <= end, "range start must not exceed end");
        Self { start, end }
    }

    /// A single-position range.
    pub fn point(pos: Pos) -> Self {
        Self::new(pos, pos)
    }

    /// A range spanning `start_col..=end_col` on one row.
    pub fn on_row(row: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(Pos::new(row, start_col), Pos::new(row, end_col))
    }

    /// Row bounds first, then column bounds only on boundary rows.
    pub fn contains(&self, pos: Pos) -> bool {
        if pos.row < self.start.row || pos.row > self.end.row {
            return false;
        }
        if pos.row == self.start.row && pos.col < self.start.col {
            return false;
        }
        if pos.row == self.end.row && pos.col > self.end.col {
            return false;
        }
        true
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.start.row && row <= self.end.row
    }
}

/// A byte-column span `[start, end)` on a single row.
///
/// Half-open so empty spans (such as an empty metadata value) are
/// representable; used wherever a span addresses an in-place edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColSpan {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl ColSpan {
    pub fn new(row: usize, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { row, start, end }
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_ordering_is_row_major() {
        assert!(Pos::new(0, 10) < Pos::new(1, 0));
        assert!(Pos::new(2, 3) < Pos::new(2, 4));
        assert_eq!(Pos::new(1, 1), Pos::new(1, 1));
    }

    #[test]
    fn contains_checks_rows_before_columns() {
        let r = Range::new(Pos::new(1, 4), Pos::new(3, 2));

        // Middle rows ignore columns entirely
        assert!(r.contains(Pos::new(2, 0)));
        assert!(r.contains(Pos::new(2, 999)));

        // Boundary rows respect columns
        assert!(r.contains(Pos::new(1, 4)));
        assert!(!r.contains(Pos::new(1, 3)));
        assert!(r.contains(Pos::new(3, 2)));
        assert!(!r.contains(Pos::new(3, 3)));

        // Outside rows
        assert!(!r.contains(Pos::new(0, 100)));
        assert!(!r.contains(Pos::new(4, 0)));
    }

    #[test]
    fn single_row_range_bounds_both_columns() {
        let r = Range::on_row(5, 2, 7);
        assert!(!r.contains(Pos::new(5, 1)));
        assert!(r.contains(Pos::new(5, 2)));
        assert!(r.contains(Pos::new(5, 7)));
        assert!(!r.contains(Pos::new(5, 8)));
    }

    #[test]
    fn point_range_contains_only_itself() {
        let r = Range::point(Pos::new(2, 2));
        assert!(r.contains(Pos::new(2, 2)));
        assert!(!r.contains(Pos::new(2, 1)));
        assert!(!r.contains(Pos::new(2, 3)));
    }

    #[test]
    fn col_span_len_and_empty() {
        assert_eq!(ColSpan::new(0, 3, 7).len(), 4);
        assert!(ColSpan::new(0, 3, 3).is_empty());
    }
}
