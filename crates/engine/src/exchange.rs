//! Drag-based primary-key exchange.
//!
//! Dragging one primary-key cell onto another of the same field swaps the
//! entire ledger slice (primary key, payload fields, and the persisted
//! record id) between the two rows, then rebuilds both integration keys
//! and prunes rows the swap emptied out.
//!
//! The drag lifecycle is an explicit state machine: start, over, leave,
//! drop, end. `drag_end` is idempotent cleanup and safe to call after an
//! aborted gesture.

use ledgergrid_core::GridPos;

use crate::dirty;
use crate::events::GridEvent;
use crate::grid::Grid;

/// Where a drag gesture started. Separation controls sit on top of
/// primary-key cells but must never initiate an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    Cell,
    SeparateControl,
}

/// What a completed drop did to the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    pub swapped: bool,
    /// Rows pruned because the swap left them empty.
    pub removed_row_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy)]
struct DragContext {
    source: GridPos,
    /// Last cell flagged as the drop target, if any.
    hover: Option<GridPos>,
}

/// Primary-key exchange engine. At most one drag is in flight.
#[derive(Default)]
pub struct ExchangeEngine {
    drag: Option<DragContext>,
}

impl ExchangeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Begin a drag from `pos`. Refused outside edit mode, on non-primary
    /// cells, and when the gesture started on a separation control.
    pub fn drag_start(&mut self, grid: &mut Grid, pos: GridPos, origin: DragOrigin) -> bool {
        if origin == DragOrigin::SeparateControl || !grid.is_edit_mode() {
            return false;
        }
        let is_pk = grid.field_at(pos.col).is_some_and(|f| f.is_primary_key);
        if !is_pk || grid.cell_at(pos).is_none() {
            return false;
        }

        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.dragging = true;
        }
        self.drag = Some(DragContext { source: pos, hover: None });
        true
    }

    /// Hover over `pos`. Only a primary-key cell of the same field as the
    /// drag source is a valid target; at most one cell carries the
    /// drop-target highlight at a time. The source cell itself may
    /// highlight as a target; self-drop is neutralized at drop time.
    pub fn drag_over(&mut self, grid: &mut Grid, pos: GridPos) -> bool {
        let Some(ctx) = self.drag else {
            return false;
        };
        if ctx.hover == Some(pos) {
            return true;
        }

        let valid = Self::same_primary_field(grid, ctx.source, pos);

        if let Some(prev) = ctx.hover {
            if let Some(cell) = grid.cell_at_mut(prev) {
                cell.drop_target = false;
            }
        }
        let hover = if valid {
            if let Some(cell) = grid.cell_at_mut(pos) {
                cell.drop_target = true;
            }
            Some(pos)
        } else {
            None
        };
        if let Some(ctx) = self.drag.as_mut() {
            ctx.hover = hover;
        }
        valid
    }

    /// The pointer left `pos`. Clears the highlight only when `pos` is the
    /// current target, so a stale leave after the hover moved on is inert.
    pub fn drag_leave(&mut self, grid: &mut Grid, pos: GridPos) {
        let Some(ctx) = self.drag else {
            return;
        };
        if ctx.hover != Some(pos) {
            return;
        }
        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.drop_target = false;
        }
        if let Some(ctx) = self.drag.as_mut() {
            ctx.hover = None;
        }
    }

    /// Complete the drag at `pos`. Invalid drops (self-drop, field
    /// mismatch, non-primary target) clean up and leave the grid
    /// untouched.
    pub fn drop(&mut self, grid: &mut Grid, pos: GridPos) -> DropOutcome {
        let Some(ctx) = self.drag else {
            return DropOutcome::default();
        };
        let source = ctx.source;
        self.drag_end(grid);

        if pos == source {
            return DropOutcome::default();
        }
        if !Self::same_primary_field(grid, source, pos) {
            log::warn!(
                "exchange drop refused: target ({}, {}) does not match source field",
                pos.row,
                pos.col
            );
            return DropOutcome::default();
        }

        let Some(ledger) = grid.field_at(source.col).and_then(|f| f.ledger()) else {
            return DropOutcome::default();
        };
        let schema = grid.schema.clone();

        // Swap the whole ledger slice, record id included. Original values
        // stay put so the dirty tracker sees the moves.
        let (row_a, row_b) = (source.row, pos.row);
        for col in schema.ledger_cols(ledger) {
            grid.swap_cell_values(row_a, row_b, col);
            let field_code = match schema.field_at(col) {
                Some(f) => f.field_code.clone(),
                None => continue,
            };
            for index in [row_a, row_b] {
                if let Some(row_id) = grid.row(index).map(|r| r.row_id()) {
                    grid.emit(GridEvent::CellChanged {
                        row_id,
                        field_code: field_code.clone(),
                    });
                }
            }
        }

        for index in [row_a, row_b] {
            dirty::refresh_row(grid, index);
            dirty::refresh_unlinked(grid, index);
            Self::rebuild_integration_key(grid, index);
        }

        // Track survivors by row id; pruning shifts indices.
        let ids: Vec<u64> = [row_a, row_b]
            .iter()
            .filter_map(|&i| grid.row(i).map(|r| r.row_id()))
            .collect();
        let placeholder = grid.settings.empty_placeholder.clone();
        let mut removed_row_ids = Vec::new();
        for id in ids {
            let Some(index) = grid.row_index_by_id(id) else {
                continue;
            };
            let empty = grid
                .row(index)
                .is_some_and(|r| r.is_empty_row(&schema, &placeholder));
            if empty {
                grid.remove_row(index);
                removed_row_ids.push(id);
            }
        }
        if !removed_row_ids.is_empty() {
            log::info!("exchange pruned {} emptied row(s)", removed_row_ids.len());
            grid.renumber_from_row_ids();
        }

        DropOutcome { swapped: true, removed_row_ids }
    }

    /// Idempotent cleanup: drop all drag visuals and forget the gesture.
    pub fn drag_end(&mut self, grid: &mut Grid) {
        if let Some(ctx) = self.drag.take() {
            if let Some(cell) = grid.cell_at_mut(ctx.source) {
                cell.dragging = false;
            }
            if let Some(hover) = ctx.hover {
                if let Some(cell) = grid.cell_at_mut(hover) {
                    cell.drop_target = false;
                }
            }
        }
    }

    fn same_primary_field(grid: &Grid, a: GridPos, b: GridPos) -> bool {
        if a.col != b.col || grid.cell_at(b).is_none() {
            return false;
        }
        grid.field_at(a.col).is_some_and(|f| f.is_primary_key)
    }

    fn rebuild_integration_key(grid: &mut Grid, index: usize) {
        let schema = grid.schema.clone();
        let Some(row) = grid.row(index) else {
            return;
        };
        let old = row.integration_key().to_string();
        let derived = row.derive_integration_key(&schema);
        let new = derived.to_string();
        if new != old {
            let row_id = row.row_id();
            if let Some(row) = grid.row_mut(index) {
                row.set_integration_key(derived);
            }
            grid.emit(GridEvent::IntegrationKeyChanged { row_id, old, new });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::GridHarness;

    #[test]
    fn drag_start_requires_edit_mode_and_primary_key() {
        let mut h = GridHarness::standard();
        let pk = h.pos(0, "pc_number");
        assert!(!h.exchange.drag_start(&mut h.grid, pk, DragOrigin::Cell));

        h.grid.set_edit_mode(true);
        let payload = h.pos(0, "pc_usage");
        assert!(!h.exchange.drag_start(&mut h.grid, payload, DragOrigin::Cell));
        assert!(!h.exchange.drag_start(&mut h.grid, pk, DragOrigin::SeparateControl));

        assert!(h.exchange.drag_start(&mut h.grid, pk, DragOrigin::Cell));
        assert!(h.grid.cell_at(pk).unwrap().dragging);
    }

    #[test]
    fn hover_highlights_single_target() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let first = h.pos(1, "pc_number");
        let second = h.pos(2, "pc_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);

        assert!(h.exchange.drag_over(&mut h.grid, first));
        assert!(h.grid.cell_at(first).unwrap().drop_target);

        assert!(h.exchange.drag_over(&mut h.grid, second));
        assert!(!h.grid.cell_at(first).unwrap().drop_target);
        assert!(h.grid.cell_at(second).unwrap().drop_target);

        // Different field: not a target, and the highlight clears.
        let off = h.pos(1, "seat_number");
        assert!(!h.exchange.drag_over(&mut h.grid, off));
        assert!(!h.grid.cell_at(second).unwrap().drop_target);
        assert!(!h.grid.cell_at(off).unwrap().drop_target);
    }

    #[test]
    fn self_drop_is_a_noop() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let pk = h.pos(0, "pc_number");
        h.exchange.drag_start(&mut h.grid, pk, DragOrigin::Cell);

        // The source cell highlights as its own target while hovered.
        assert!(h.exchange.drag_over(&mut h.grid, pk));
        assert!(h.grid.cell_at(pk).unwrap().drop_target);

        let outcome = h.exchange.drop(&mut h.grid, pk);
        assert!(!outcome.swapped);
        assert_eq!(h.grid.value_at(0, "pc_number"), Some("PC-001"));
        assert!(!h.grid.cell_at(pk).unwrap().dragging);
        assert!(!h.grid.cell_at(pk).unwrap().drop_target);
        assert!(h.events.borrow().is_empty());
    }

    #[test]
    fn drop_swaps_whole_ledger_slice() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let target = h.pos(1, "pc_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);
        let outcome = h.exchange.drop(&mut h.grid, target);
        assert!(outcome.swapped);

        assert_eq!(h.grid.value_at(0, "pc_number"), Some("PC-002"));
        assert_eq!(h.grid.value_at(1, "pc_number"), Some("PC-001"));
        // Payload and the record id travel with the key.
        assert_eq!(h.grid.value_at(0, "pc_usage"), Some("dev"));
        assert_eq!(h.grid.value_at(1, "pc_usage"), Some("business"));
        assert_eq!(h.grid.value_at(0, "pc_record_id"), Some("102"));
        assert_eq!(h.grid.value_at(1, "pc_record_id"), Some("101"));
        // Non-PC ledgers untouched.
        assert_eq!(h.grid.value_at(0, "seat_number"), Some("A-101"));
        assert_eq!(h.grid.value_at(1, "seat_number"), Some("B-201"));
    }

    #[test]
    fn drop_rebuilds_integration_keys_and_marks_dirty() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let target = h.pos(1, "pc_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);
        h.exchange.drop(&mut h.grid, target);

        assert!(h.grid.row_by_key("SEAT:B-201|PC:PC-001").is_some());
        assert!(h.grid.row(0).unwrap().modified);
        assert!(h.grid.row(1).unwrap().modified);

        let events = h.events.borrow();
        assert_eq!(events.keys_changed().len(), 2);
        // Cell changes land before key changes.
        let first_key = events
            .events()
            .iter()
            .position(|e| matches!(e, GridEvent::IntegrationKeyChanged { .. }))
            .unwrap();
        let last_cell = events
            .events()
            .iter()
            .rposition(|e| matches!(e, GridEvent::CellChanged { .. }))
            .unwrap();
        assert!(last_cell < first_key);
    }

    #[test]
    fn drop_onto_mismatched_field_cleans_up_without_swapping() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let target = h.pos(1, "seat_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);
        let outcome = h.exchange.drop(&mut h.grid, target);

        assert!(!outcome.swapped);
        assert_eq!(h.grid.value_at(0, "pc_number"), Some("PC-001"));
        assert!(!h.grid.cell_at(source).unwrap().dragging);
        assert!(!h.exchange.is_dragging());
    }

    #[test]
    fn stale_drag_leave_is_inert() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let first = h.pos(1, "pc_number");
        let second = h.pos(2, "pc_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);
        h.exchange.drag_over(&mut h.grid, first);
        h.exchange.drag_over(&mut h.grid, second);

        // A late leave for the previous target must not clear the current one.
        h.exchange.drag_leave(&mut h.grid, first);
        assert!(h.grid.cell_at(second).unwrap().drop_target);

        h.exchange.drag_leave(&mut h.grid, second);
        assert!(!h.grid.cell_at(h.pos(2, "pc_number")).unwrap().drop_target);
    }

    #[test]
    fn drag_end_is_idempotent() {
        let mut h = GridHarness::standard();
        h.grid.set_edit_mode(true);
        let source = h.pos(0, "pc_number");
        let over = h.pos(1, "pc_number");
        h.exchange.drag_start(&mut h.grid, source, DragOrigin::Cell);
        h.exchange.drag_over(&mut h.grid, over);

        h.exchange.drag_end(&mut h.grid);
        h.exchange.drag_end(&mut h.grid);
        assert!(!h.grid.cell_at(source).unwrap().dragging);
        assert!(!h.grid.cell_at(h.pos(1, "pc_number")).unwrap().drop_target);
    }
}
