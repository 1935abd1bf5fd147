//! Selection, keyboard navigation, and clipboard operations.
//!
//! One engine instance per grid (no global selection state). Positions
//! that fall outside the live grid degrade to no-ops; nothing here
//! panics on a missing row or cell.

use ledgergrid_core::{GridPos, Selection};

use crate::cell::Cell;
use crate::dirty;
use crate::error::GridError;
use crate::events::GridEvent;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One captured clipboard entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEntry {
    pub field_code: String,
    pub value: String,
}

/// Selection + navigation engine. Owns the selection model and the
/// transient clipboard (lifetime: until the next copy/cut).
#[derive(Default)]
pub struct SelectionEngine {
    selection: Selection,
    clipboard: Option<Vec<ClipEntry>>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&[ClipEntry]> {
        self.clipboard.as_deref()
    }

    /// Positions currently selected and still present in the grid.
    fn selected_positions(&self, grid: &Grid) -> Vec<GridPos> {
        self.selection
            .selected_cells()
            .into_iter()
            .filter(|&pos| grid.cell_at(pos).is_some())
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a single cell (or clear with `None`). Clears the previous
    /// active cell's visual state and asks the renderer to scroll the new
    /// one into view.
    pub fn select_cell(&mut self, grid: &mut Grid, pos: Option<GridPos>) {
        if let Some(prev) = self.selection.active() {
            if let Some(cell) = grid.cell_at_mut(prev) {
                cell.selected = false;
            }
        }

        let pos = pos.filter(|&p| grid.cell_at(p).is_some());
        self.selection.set_active(pos);

        if let Some(p) = pos {
            if let Some(cell) = grid.cell_at_mut(p) {
                cell.selected = true;
            }
            grid.emit(GridEvent::ScrollTo { pos: p });
        }
    }

    /// Extend (or open) the rectangular range toward `pos` and move the
    /// active cell there. Anchors at the active cell if no range is open.
    pub fn expand_selection_to(&mut self, grid: &mut Grid, pos: GridPos) {
        if grid.cell_at(pos).is_none() || self.selection.active().is_none() {
            return;
        }

        self.clear_range_flags(grid);
        if let Some(prev) = self.selection.active() {
            if let Some(cell) = grid.cell_at_mut(prev) {
                cell.selected = false;
            }
        }

        self.selection.extend_to(pos);

        if let Some(range) = self.selection.range() {
            for p in range.cells() {
                if let Some(cell) = grid.cell_at_mut(p) {
                    cell.range_selected = true;
                }
            }
        }
        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.selected = true;
        }
        grid.emit(GridEvent::ScrollTo { pos });
    }

    /// Close the range selection, removing its highlight.
    pub fn clear_range_selection(&mut self, grid: &mut Grid) {
        self.clear_range_flags(grid);
        self.selection.clear_range();
    }

    fn clear_range_flags(&self, grid: &mut Grid) {
        if let Some(range) = self.selection.range() {
            for p in range.cells() {
                if let Some(cell) = grid.cell_at_mut(p) {
                    cell.range_selected = false;
                }
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Arrow-key navigation. Boundary moves are no-ops; shift extends the
    /// range instead of moving, and a plain move closes any open range.
    pub fn navigate(&mut self, grid: &mut Grid, direction: Direction, shift: bool) {
        let Some(current) = self.selection.active() else {
            return;
        };
        let Some(target) = Self::adjacent(grid, current, direction) else {
            return;
        };

        if shift {
            self.expand_selection_to(grid, target);
        } else {
            self.select_cell(grid, Some(target));
            self.clear_range_selection(grid);
        }
    }

    /// Tab / Shift+Tab: right/left, wrapping to the next/previous row at a
    /// row boundary. No-op at the table's first/last cell.
    pub fn tab(&mut self, grid: &mut Grid, backwards: bool) {
        let Some(current) = self.selection.active() else {
            return;
        };
        let direction = if backwards { Direction::Left } else { Direction::Right };

        let target = Self::adjacent(grid, current, direction).or_else(|| {
            if backwards {
                // Last cell of the previous row.
                current
                    .row
                    .checked_sub(1)
                    .map(|row| GridPos::new(row, grid.col_count().saturating_sub(1)))
            } else if current.row + 1 < grid.row_count() {
                // First cell of the next row.
                Some(GridPos::new(current.row + 1, 0))
            } else {
                None
            }
        });

        if let Some(target) = target {
            self.select_cell(grid, Some(target));
            self.clear_range_selection(grid);
        }
    }

    fn adjacent(grid: &Grid, pos: GridPos, direction: Direction) -> Option<GridPos> {
        match direction {
            Direction::Up => pos.row.checked_sub(1).map(|r| GridPos::new(r, pos.col)),
            Direction::Down => {
                (pos.row + 1 < grid.row_count()).then(|| GridPos::new(pos.row + 1, pos.col))
            }
            Direction::Left => pos.col.checked_sub(1).map(|c| GridPos::new(pos.row, c)),
            Direction::Right => {
                (pos.col + 1 < grid.col_count()).then(|| GridPos::new(pos.row, pos.col + 1))
            }
        }
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Capture the selected cells into the clipboard. Returns the
    /// tab-joined plain text for the caller to hand to the system
    /// clipboard, or `None` when nothing is selected.
    pub fn copy(&mut self, grid: &Grid) -> Option<String> {
        let positions = self.selected_positions(grid);
        if positions.is_empty() {
            return None;
        }

        let mut entries = Vec::with_capacity(positions.len());
        let mut text = Vec::with_capacity(positions.len());
        for pos in positions {
            let field_code = grid
                .field_at(pos.col)
                .map(|f| f.field_code.clone())
                .unwrap_or_default();
            let value = grid.cell_at(pos).map(Cell::value).unwrap_or("").to_string();
            text.push(value.clone());
            entries.push(ClipEntry { field_code, value });
        }

        self.clipboard = Some(entries);
        Some(text.join("\t"))
    }

    /// Clear every selected editable cell. Non-editable cells are
    /// silently skipped.
    pub fn delete(&mut self, grid: &mut Grid) {
        let mut touched_rows: Vec<usize> = Vec::new();
        for pos in self.selected_positions(grid) {
            let Some(field) = grid.field_at(pos.col) else {
                continue;
            };
            if !field.editable() {
                continue;
            }
            let field_code = field.field_code.clone();
            let Some(row_id) = grid.row(pos.row).map(|r| r.row_id()) else {
                continue;
            };
            if let Some(cell) = grid.cell_at_mut(pos) {
                cell.clear_value();
            }
            grid.emit(GridEvent::CellChanged { row_id, field_code });
            if !touched_rows.contains(&pos.row) {
                touched_rows.push(pos.row);
            }
        }
        for row in touched_rows {
            dirty::refresh_row(grid, row);
        }
    }

    /// Copy, then delete.
    pub fn cut(&mut self, grid: &mut Grid) -> Option<String> {
        let text = self.copy(grid);
        self.delete(grid);
        text
    }

    /// Paste a single-cell payload into the active editable cell.
    /// Multi-cell payloads are an explicit unsupported operation (not a
    /// silent no-op), so callers and tests can tell the two apart.
    pub fn paste(&mut self, grid: &mut Grid) -> Result<(), GridError> {
        let Some(clip) = self.clipboard.as_deref() else {
            return Ok(());
        };
        if clip.is_empty() {
            return Ok(());
        }
        if clip.len() > 1 {
            return Err(GridError::UnsupportedPaste);
        }

        let Some(pos) = self.selection.active() else {
            return Ok(());
        };
        let Some(field) = grid.field_at(pos.col) else {
            return Ok(());
        };
        if !field.editable() {
            return Ok(());
        }

        let value = clip[0].value.clone();
        let field_code = field.field_code.clone();
        let Some(row_id) = grid.row(pos.row).map(|r| r.row_id()) else {
            return Ok(());
        };
        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.set_value(value);
        }
        grid.emit(GridEvent::CellChanged { row_id, field_code });
        dirty::refresh_row(grid, pos.row);
        Ok(())
    }

    /// Reserved. Select-all is not implemented in this version.
    pub fn select_all(&mut self) {}
}
