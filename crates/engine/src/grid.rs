//! The grid: schema + rows + interaction settings, plus the boundary
//! contracts toward the render/persistence collaborators (render input,
//! submission batch, row numbering, edit-mode notification, events).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ledgergrid_config::Settings;
use ledgergrid_core::GridPos;

use crate::cell::Cell;
use crate::dirty;
use crate::error::GridError;
use crate::events::{EventCallback, GridEvent};
use crate::key::IntegrationKey;
use crate::row::Row;
use crate::schema::{FieldDescriptor, FieldSchema};

/// External monotonically-increasing row-number service. The grid never
/// implements the counter itself; separation asks it for fresh numbers and
/// a full render reports the new maximum.
pub trait RowNumberSource {
    fn next_row_number(&mut self) -> u64;
    fn track_max(&mut self, max: u64);
}

/// Default in-process counter.
#[derive(Debug, Default)]
pub struct SequenceRowNumbers {
    max: u64,
}

impl SequenceRowNumbers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowNumberSource for SequenceRowNumbers {
    fn next_row_number(&mut self) -> u64 {
        self.max += 1;
        self.max
    }

    fn track_max(&mut self, max: u64) {
        self.max = self.max.max(max);
    }
}

/// Render input: one integrated record from the external data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowRecord {
    pub integration_key: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// One row of the batch handed to the external "submit changes"
/// collaborator. Only rows whose checkbox is checked are included.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRow {
    pub row_id: u64,
    pub integration_key: String,
    /// Ledger tag -> persisted record id, for grouping the write by ledger.
    pub record_ids: HashMap<String, String>,
    /// field code -> current on-screen value.
    pub values: HashMap<String, String>,
}

/// The authoritative grid model. One instance per rendered grid; all
/// engines are handed a `&mut Grid` instead of reaching for globals.
pub struct Grid {
    pub(crate) schema: Arc<FieldSchema>,
    pub(crate) settings: Settings,
    pub(crate) rows: Vec<Row>,
    edit_mode: bool,
    row_numbers: Box<dyn RowNumberSource>,
    on_event: Option<EventCallback>,
}

impl Grid {
    pub fn new(
        schema: Arc<FieldSchema>,
        settings: Settings,
        row_numbers: Box<dyn RowNumberSource>,
    ) -> Self {
        Self {
            schema,
            settings,
            rows: Vec::new(),
            edit_mode: false,
            row_numbers,
            on_event: None,
        }
    }

    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        if let Some(cb) = &mut self.on_event {
            cb(event);
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =========================================================================
    // Render input
    // =========================================================================

    /// Replace all rows from the external data source. Every cell's
    /// original value is captured from the incoming record; row ids are
    /// assigned 1..N and the external counter is told the new maximum.
    pub fn render(&mut self, records: &[RowRecord]) -> Result<(), GridError> {
        let schema = self.schema.clone();
        let mut rows = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let row_id = (i + 1) as u64;
            let key = IntegrationKey::parse(&record.integration_key)?;

            let cells: Vec<Cell> = schema
                .fields()
                .iter()
                .map(|field| {
                    if field.is_row_number() {
                        Cell::from_render(&row_id.to_string())
                    } else {
                        let value = record
                            .values
                            .get(&field.field_code)
                            .map(String::as_str)
                            .unwrap_or("");
                        Cell::from_render(value)
                    }
                })
                .collect();

            rows.push(Row::new(row_id, cells, key));
        }

        log::debug!("rendered {} rows", rows.len());
        self.rows = rows;
        self.row_numbers.track_max(records.len() as u64);

        let edit_mode = self.edit_mode;
        for i in 0..self.rows.len() {
            dirty::refresh_unlinked(self, i);
            self.set_row_draggable(i, edit_mode);
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.schema.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Find a row by the string form of its integration key.
    pub fn row_by_key(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.integration_key().to_string() == key)
    }

    pub fn row_index_by_id(&self, row_id: u64) -> Option<usize> {
        self.rows.iter().position(|r| r.row_id() == row_id)
    }

    pub fn cell_at(&self, pos: GridPos) -> Option<&Cell> {
        self.rows.get(pos.row).and_then(|r| r.cell(pos.col))
    }

    pub fn cell_at_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        self.rows.get_mut(pos.row).and_then(|r| r.cell_mut(pos.col))
    }

    pub fn field_at(&self, col: usize) -> Option<&FieldDescriptor> {
        self.schema.field_at(col)
    }

    /// Current value of a cell by row index and field code (model query,
    /// never a render-side lookup).
    pub fn value_at(&self, row: usize, field_code: &str) -> Option<&str> {
        let col = self.schema.col_of(field_code)?;
        self.rows.get(row)?.cell(col).map(Cell::value)
    }

    /// Apply a direct user edit by field code. Edits to non-editable
    /// fields and missing rows are guarded no-ops; an unknown field code
    /// is a caller defect and an error.
    pub fn apply_edit(
        &mut self,
        index: usize,
        field_code: &str,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let col = self
            .schema
            .col_of(field_code)
            .ok_or_else(|| GridError::UnknownField(field_code.to_string()))?;
        let editable = self.schema.field_at(col).is_some_and(|f| f.editable());
        if !editable {
            return Ok(());
        }
        let Some(row) = self.rows.get_mut(index) else {
            return Ok(());
        };
        let row_id = row.row_id();
        if let Some(cell) = row.cell_mut(col) {
            cell.set_value(value);
        }
        self.emit(GridEvent::CellChanged { row_id, field_code: field_code.to_string() });
        dirty::refresh_row(self, index);
        Ok(())
    }

    // =========================================================================
    // Edit mode
    // =========================================================================

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// `onEditModeChanged` notification: bulk-toggle the drag affordance
    /// on every primary-key cell. An explicit mode transition, not a
    /// per-gesture check.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
        for i in 0..self.rows.len() {
            self.set_row_draggable(i, edit_mode);
        }
    }

    /// Install drag affordances on one row's primary-key cells (used right
    /// after a separated row is inserted; no full-table rescan).
    pub fn attach_drag_affordances_to_row(&mut self, index: usize) {
        let edit_mode = self.edit_mode;
        self.set_row_draggable(index, edit_mode);
    }

    fn set_row_draggable(&mut self, index: usize, draggable: bool) {
        let schema = self.schema.clone();
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        for ledger in schema.ledgers() {
            if let Some(col) = schema.primary_key_col(ledger) {
                if let Some(cell) = row.cell_mut(col) {
                    cell.draggable = draggable;
                }
            }
        }
    }

    // =========================================================================
    // Checkbox / submission
    // =========================================================================

    /// User toggle of the modification checkbox. Under the manual-override
    /// policy, unchecking a dirty row pins it unchecked until the row goes
    /// clean and dirty again.
    pub fn set_checkbox(&mut self, index: usize, checked: bool) {
        use ledgergrid_config::CheckboxPolicy;
        let policy = self.settings.checkbox_policy;
        if let Some(row) = self.rows.get_mut(index) {
            row.checkbox = checked;
            if policy == CheckboxPolicy::ManualOverride {
                row.manual_unchecked = !checked && row.modified;
            }
        }
    }

    /// The batch the external "submit changes" collaborator reads: checked
    /// rows only, with current values and per-ledger record ids.
    pub fn submission_batch(&self) -> Vec<SubmissionRow> {
        let schema = &self.schema;
        self.rows
            .iter()
            .filter(|row| row.checkbox)
            .map(|row| {
                let values = schema
                    .fields()
                    .iter()
                    .zip(row.cells())
                    .filter(|(field, _)| !field.is_system())
                    .map(|(field, cell)| (field.field_code.clone(), cell.value().to_string()))
                    .collect();
                let record_ids = row
                    .record_ids(schema)
                    .into_iter()
                    .map(|(ledger, id)| (ledger.tag().to_string(), id))
                    .collect();
                SubmissionRow {
                    row_id: row.row_id(),
                    integration_key: row.integration_key().to_string(),
                    record_ids,
                    values,
                }
            })
            .collect()
    }

    // =========================================================================
    // Structural mutation (engines only)
    // =========================================================================

    pub(crate) fn next_row_number(&mut self) -> u64 {
        self.row_numbers.next_row_number()
    }

    pub(crate) fn remove_row(&mut self, index: usize) -> Option<Row> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        self.emit(GridEvent::RowRemoved {
            row_id: row.row_id(),
            integration_key: row.integration_key().to_string(),
        });
        Some(row)
    }

    pub(crate) fn insert_row_after(&mut self, index: usize, row: Row) {
        let after_row_id = self.rows.get(index).map(|r| r.row_id()).unwrap_or(0);
        let row_id = row.row_id();
        let at = (index + 1).min(self.rows.len());
        self.rows.insert(at, row);
        self.emit(GridEvent::RowInserted { row_id, after_row_id });
    }

    /// Re-derive every visible row number from the rows' stored ids.
    pub(crate) fn renumber_from_row_ids(&mut self) {
        let schema = self.schema.clone();
        for row in &mut self.rows {
            row.sync_row_number_cell(&schema);
        }
    }

    /// Swap the current values (only) of one column between two rows.
    pub(crate) fn swap_cell_values(&mut self, a: usize, b: usize, col: usize) {
        if a == b || a >= self.rows.len() || b >= self.rows.len() {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (left, right) = self.rows.split_at_mut(hi);
        let (ra, rb) = (&mut left[lo], &mut right[0]);
        if let (Some(ca), Some(cb)) = (ra.cell_mut(col), rb.cell_mut(col)) {
            let tmp = ca.value().to_string();
            ca.set_value(cb.value().to_string());
            cb.set_value(tmp);
        }
    }
}
