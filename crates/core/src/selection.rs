use serde::{Deserialize, Serialize};

/// A cell position: (row index, column index) within the visible table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(a: GridPos, b: GridPos) -> Self {
        Self {
            start_row: a.row.min(b.row),
            start_col: a.col.min(b.col),
            end_row: a.row.max(b.row),
            end_col: a.col.max(b.col),
        }
    }

    /// Check if this range contains a position.
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row >= self.start_row
            && pos.row <= self.end_row
            && pos.col >= self.start_col
            && pos.col <= self.end_col
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        (self.end_row - self.start_row + 1) * (self.end_col - self.start_col + 1)
    }

    /// Iterate over all positions in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = GridPos> {
        let (start_row, end_row) = (self.start_row, self.end_row);
        let (start_col, end_col) = (self.start_col, self.end_col);

        (start_row..=end_row)
            .flat_map(move |r| (start_col..=end_col).map(move |c| GridPos::new(r, c)))
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// The selection model: at most one active cell, plus an optional open
/// rectangular range anchored where the range began.
///
/// The materialized range is recomputed from the two corners on every
/// change; nothing stale is ever stored.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: Option<GridPos>,
    anchor: Option<GridPos>,
    range: Option<Range>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active cell, if any.
    pub fn active(&self) -> Option<GridPos> {
        self.active
    }

    /// The open range, if a range selection is in progress.
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// Set the active cell, leaving any open range untouched.
    /// `None` clears the active cell.
    pub fn set_active(&mut self, pos: Option<GridPos>) {
        self.active = pos;
    }

    /// Extend (or open) the range toward `pos`. If no range is open, the
    /// anchor is the currently active cell; without an active cell this is
    /// a no-op. The active cell moves to `pos`.
    pub fn extend_to(&mut self, pos: GridPos) {
        let anchor = match self.anchor.or(self.active) {
            Some(anchor) => anchor,
            None => return,
        };
        self.anchor = Some(anchor);
        self.range = Some(Range::new(anchor, pos));
        self.active = Some(pos);
    }

    /// Close the range selection, keeping the active cell.
    pub fn clear_range(&mut self) {
        self.anchor = None;
        self.range = None;
    }

    /// All selected positions: the range if one is open, else the active
    /// cell alone.
    pub fn selected_cells(&self) -> Vec<GridPos> {
        match self.range {
            Some(range) => range.cells().collect(),
            None => self.active.into_iter().collect(),
        }
    }

    /// Check if a position is inside the current selection.
    pub fn contains(&self, pos: GridPos) -> bool {
        match self.range {
            Some(range) => range.contains(pos),
            None => self.active == Some(pos),
        }
    }
}
