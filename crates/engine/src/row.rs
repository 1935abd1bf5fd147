//! A grid row: stored identity, one cell per schema field, and the
//! integration key tying the row to its backing ledger records.

use crate::cell::Cell;
use crate::key::IntegrationKey;
use crate::schema::{FieldSchema, Ledger};

#[derive(Debug, Clone)]
pub struct Row {
    /// Stored row identity. Survives structural changes; visible row
    /// numbers re-derive from this, never from a fresh recount.
    row_id: u64,
    cells: Vec<Cell>,
    integration_key: IntegrationKey,

    /// Any non-system cell is dirty.
    pub modified: bool,
    /// The modification checkbox gating batch submission.
    pub checkbox: bool,
    /// User explicitly unchecked a dirty row (manual-override policy).
    pub(crate) manual_unchecked: bool,
}

impl Row {
    pub fn new(row_id: u64, cells: Vec<Cell>, integration_key: IntegrationKey) -> Self {
        Self {
            row_id,
            cells,
            integration_key,
            modified: false,
            checkbox: false,
            manual_unchecked: false,
        }
    }

    pub fn row_id(&self) -> u64 {
        self.row_id
    }

    pub fn integration_key(&self) -> &IntegrationKey {
        &self.integration_key
    }

    pub(crate) fn set_integration_key(&mut self, key: IntegrationKey) {
        self.integration_key = key;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    /// Rebuild the integration key from the current non-empty primary-key
    /// cells. Does not store it; callers compare against the current key
    /// and update only on change.
    pub fn derive_integration_key(&self, schema: &FieldSchema) -> IntegrationKey {
        let mut key = IntegrationKey::empty();
        for ledger in schema.ledgers() {
            if let Some(col) = schema.primary_key_col(ledger) {
                if let Some(cell) = self.cells.get(col) {
                    key.insert(ledger, cell.trimmed());
                }
            }
        }
        key
    }

    /// A row is empty when every non-system cell is blank (trimmed-empty
    /// or the placeholder).
    pub fn is_empty_row(&self, schema: &FieldSchema, placeholder: &str) -> bool {
        schema
            .fields()
            .iter()
            .zip(&self.cells)
            .filter(|(field, _)| !field.is_system())
            .all(|(_, cell)| cell.is_blank(placeholder))
    }

    /// Non-empty ledger record identifiers on this row.
    pub fn record_ids(&self, schema: &FieldSchema) -> Vec<(Ledger, String)> {
        schema
            .fields()
            .iter()
            .zip(&self.cells)
            .filter(|(field, cell)| field.is_record_id && !cell.trimmed().is_empty())
            .filter_map(|(field, cell)| {
                field.ledger().map(|l| (l, cell.trimmed().to_string()))
            })
            .collect()
    }

    /// Write the stored row id into the row-number cell.
    pub(crate) fn sync_row_number_cell(&mut self, schema: &FieldSchema) {
        if let Some(col) = schema.row_number_col() {
            let id = self.row_id;
            if let Some(cell) = self.cells.get_mut(col) {
                cell.set_value(id.to_string());
            }
        }
    }

    /// Structural clone carrying all current values but none of the
    /// transient state. Used by separation before the original is cleared.
    pub(crate) fn clone_as(&self, row_id: u64, integration_key: IntegrationKey) -> Self {
        let mut cells = self.cells.clone();
        for cell in &mut cells {
            cell.clear_visuals();
        }
        Self {
            row_id,
            cells,
            integration_key,
            modified: false,
            checkbox: false,
            manual_unchecked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;

    fn row_with(schema: &FieldSchema, values: &[(&str, &str)]) -> Row {
        let mut cells = vec![Cell::default(); schema.len()];
        for (code, value) in values {
            cells[schema.col_of(code).unwrap()] = Cell::from_render(value);
        }
        Row::new(1, cells, IntegrationKey::empty())
    }

    #[test]
    fn derive_key_from_primary_cells() {
        let schema = FieldSchema::integrated();
        let row = row_with(&schema, &[("pc_number", "PC-001"), ("user_id", " u042 ")]);
        let key = row.derive_integration_key(&schema);
        assert_eq!(key.to_string(), "PC:PC-001|USER:u042");
    }

    #[test]
    fn empty_row_ignores_system_fields() {
        let schema = FieldSchema::integrated();
        let row = row_with(
            &schema,
            &[
                ("_row_number", "7"),
                ("_ledger_inconsistency", "!"),
                ("pc_record_id", "55"),
                ("seat_floor", "---"),
            ],
        );
        assert!(row.is_empty_row(&schema, "---"));

        let row = row_with(&schema, &[("pc_number", "PC-001")]);
        assert!(!row.is_empty_row(&schema, "---"));
    }

    #[test]
    fn record_ids_collects_non_empty() {
        let schema = FieldSchema::integrated();
        let row = row_with(&schema, &[("pc_record_id", "55"), ("user_record_id", "")]);
        assert_eq!(row.record_ids(&schema), vec![(Ledger::Pc, "55".to_string())]);
    }

    #[test]
    fn clone_as_drops_transient_state() {
        let schema = FieldSchema::integrated();
        let mut row = row_with(&schema, &[("pc_number", "PC-001")]);
        row.modified = true;
        row.checkbox = true;
        let col = schema.col_of("pc_number").unwrap();
        row.cell_mut(col).unwrap().dragging = true;

        let cloned = row.clone_as(9, IntegrationKey::single(Ledger::Pc, "PC-001"));
        assert_eq!(cloned.row_id(), 9);
        assert!(!cloned.modified && !cloned.checkbox);
        assert!(!cloned.cell(col).unwrap().dragging);
        assert_eq!(cloned.cell(col).unwrap().value(), "PC-001");
    }
}
