//! Row separation: split one ledger's records out of a joined row into a
//! fresh row of their own.
//!
//! The separated row keeps the ledger's current values (record id
//! included) with empty baselines, so everything on it reads as a pending
//! change. The original row keeps its baselines and loses the ledger's
//! current values, so those cells read as pending clears. Between the two
//! rows no value is duplicated and none is lost.

use ledgergrid_core::GridPos;

use crate::dirty;
use crate::error::GridError;
use crate::events::GridEvent;
use crate::grid::Grid;
use crate::key::IntegrationKey;

/// Separation engine. Stateless; one call does the whole split.
#[derive(Debug, Default)]
pub struct SeparationEngine;

impl SeparationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Whether `pos` names a primary-key cell with a separable value.
    pub fn can_separate(&self, grid: &Grid, pos: GridPos) -> bool {
        let is_pk = grid.field_at(pos.col).is_some_and(|f| f.is_primary_key);
        is_pk && grid.cell_at(pos).is_some_and(|c| !c.trimmed().is_empty())
    }

    /// Separate the ledger owning `pos` out of its row. Returns the row id
    /// of the inserted row.
    pub fn separate(&self, grid: &mut Grid, pos: GridPos) -> Result<u64, GridError> {
        match self.split(grid, pos) {
            Ok(row_id) => Ok(row_id),
            Err(err) => {
                log::error!("separation at ({}, {}) failed: {err}", pos.row, pos.col);
                Err(err)
            }
        }
    }

    fn split(&self, grid: &mut Grid, pos: GridPos) -> Result<u64, GridError> {
        let schema = grid.schema.clone();

        let field = grid.field_at(pos.col).ok_or(GridError::MissingCell(pos))?;
        if !field.is_primary_key {
            return Err(GridError::NotPrimaryKey(field.field_code.clone()));
        }
        let ledger = field
            .ledger()
            .ok_or_else(|| GridError::NotPrimaryKey(field.field_code.clone()))?;

        let cell = grid.cell_at(pos).ok_or(GridError::MissingCell(pos))?;
        let value = cell.trimmed().to_string();
        if value.is_empty() {
            return Err(GridError::SeparateEmptyValue);
        }

        let source = grid.row(pos.row).ok_or(GridError::MissingCell(pos))?.clone();
        let row_id = source.row_id();
        if source.integration_key().is_empty() {
            return Err(GridError::MissingIntegrationKey { row_id });
        }

        let mut remaining = source.integration_key().clone();
        if !remaining.remove(ledger, &value) {
            return Err(GridError::SeparateTargetNotFound { ledger, value });
        }

        let old = source.integration_key().to_string();
        let new = remaining.to_string();

        // Clone carries the full row; it is built before the original is
        // touched.
        let new_id = grid.next_row_number();
        let mut separated = source.clone_as(new_id, IntegrationKey::single(ledger, value.clone()));
        for (col, field) in schema.fields().iter().enumerate() {
            let Some(cell) = separated.cell_mut(col) else {
                continue;
            };
            cell.reset_original_empty();
            if field.is_row_number() {
                cell.set_value(new_id.to_string());
            } else if field.ledger().is_some_and(|l| l != ledger) {
                cell.clear_value();
            }
        }

        if let Some(row) = grid.row_mut(pos.row) {
            row.set_integration_key(remaining);
            for col in schema.ledger_cols(ledger) {
                if let Some(cell) = row.cell_mut(col) {
                    cell.clear_value();
                }
            }
        }
        grid.emit(GridEvent::IntegrationKeyChanged { row_id, old, new });

        grid.insert_row_after(pos.row, separated);
        grid.attach_drag_affordances_to_row(pos.row + 1);

        for index in [pos.row, pos.row + 1] {
            dirty::refresh_row(grid, index);
            dirty::refresh_unlinked(grid, index);
        }

        log::info!("separated {}:{value} from row {row_id} into row {new_id}", ledger.tag());
        Ok(new_id)
    }
}
