//! Dirty/highlight tracking.
//!
//! Modified state is a pure function of each cell's current vs. captured
//! original value; row state is the OR over non-system cells, with the
//! modification checkbox synced one-way from cell state. Unlinked-ledger
//! marking is an independent, idempotent recompute over primary-key
//! values.

use ledgergrid_config::CheckboxPolicy;

use crate::cell::Cell;
use crate::events::GridEvent;
use crate::grid::Grid;

/// Straight trimmed-string inequality. The empty-value placeholder is NOT
/// special-cased here (only the row-empty check treats it as blank).
pub fn cell_modified(cell: &Cell) -> bool {
    cell.value().trim() != cell.original().trim()
}

/// Re-evaluate per-cell modified flags and the row-level rollup, syncing
/// the checkbox according to the configured policy. Emits
/// `RowModifiedChanged` when row-level state flips.
pub fn refresh_row(grid: &mut Grid, index: usize) {
    let schema = grid.schema.clone();
    let policy = grid.settings.checkbox_policy;

    let Some(row) = grid.rows.get_mut(index) else {
        return;
    };

    let mut any_modified = false;
    for (col, field) in schema.fields().iter().enumerate() {
        let Some(cell) = row.cell_mut(col) else {
            continue;
        };
        if field.is_system() {
            // System fields never count, and never carry the highlight.
            cell.modified = false;
            continue;
        }
        let modified = cell_modified(cell);
        cell.modified = modified;
        any_modified |= modified;
    }

    let was = (row.modified, row.checkbox);
    if any_modified && !row.modified {
        // Clean -> dirty transition lifts a manual uncheck.
        row.manual_unchecked = false;
    }
    if !any_modified {
        row.manual_unchecked = false;
    }
    row.modified = any_modified;
    row.checkbox = match policy {
        CheckboxPolicy::Derived => any_modified,
        CheckboxPolicy::ManualOverride => any_modified && !row.manual_unchecked,
    };

    if was != (row.modified, row.checkbox) {
        let (row_id, modified, checkbox) = (row.row_id(), row.modified, row.checkbox);
        grid.emit(GridEvent::RowModifiedChanged { row_id, modified, checkbox });
    }
}

/// Re-evaluate the unlinked-ledger marking for one row: a ledger whose
/// primary-key cell is blank has all of its cells marked unlinked. Pure
/// function of current primary-key values; safe to re-run any time.
pub fn refresh_unlinked(grid: &mut Grid, index: usize) {
    let schema = grid.schema.clone();
    let placeholder = grid.settings.empty_placeholder.clone();

    let Some(row) = grid.rows.get_mut(index) else {
        return;
    };

    for ledger in schema.ledgers() {
        let Some(pk_col) = schema.primary_key_col(ledger) else {
            continue;
        };
        let unlinked = row
            .cell(pk_col)
            .map(|c| c.is_blank(&placeholder))
            .unwrap_or(true);
        for col in schema.ledger_cols(ledger) {
            if let Some(cell) = row.cell_mut(col) {
                cell.unlinked = unlinked;
            }
        }
    }
}
