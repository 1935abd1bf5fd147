//! A single cell: current value, captured original value, and the visual
//! state flags the renderer projects.

/// One cell of one row. The row owns its cells; a cell knows nothing about
/// its neighbors — its field is identified positionally via the schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    current_value: String,
    original_value: String,

    /// Current value differs from the captured original (trimmed compare).
    pub modified: bool,
    /// The owning ledger's primary key is blank in this row.
    pub unlinked: bool,
    /// Active (focused) cell.
    pub selected: bool,
    /// Inside the open range selection.
    pub range_selected: bool,
    /// Source of the in-flight drag.
    pub dragging: bool,
    /// Current drop target of the in-flight drag.
    pub drop_target: bool,
    /// Drag affordance enabled (primary-key cells in edit mode).
    pub draggable: bool,
}

impl Cell {
    /// Build a cell from render input: original is captured from the
    /// incoming value.
    pub fn from_render(value: &str) -> Self {
        Self {
            current_value: value.to_string(),
            original_value: value.to_string(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.current_value
    }

    pub fn original(&self) -> &str {
        &self.original_value
    }

    /// User-visible trimmed value.
    pub fn trimmed(&self) -> &str {
        self.current_value.trim()
    }

    /// Set the current value. Never touches the original value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.current_value = value.into();
    }

    /// Clear the current value (text, dropdown selection, or primary-key
    /// value — all collapse to the empty string in the model).
    pub fn clear_value(&mut self) {
        self.current_value.clear();
    }

    /// Accept the current value as the new baseline (post-save).
    pub fn accept(&mut self) {
        self.original_value = self.current_value.clone();
    }

    /// Reset the baseline to empty so any present value reads as a pending
    /// change. Used when building a separated row.
    pub fn reset_original_empty(&mut self) {
        self.original_value.clear();
    }

    /// Blank for row-empty accounting: trimmed-empty or the literal
    /// placeholder. Dirty comparison does NOT use this; it is a straight
    /// trimmed inequality.
    pub fn is_blank(&self, placeholder: &str) -> bool {
        let t = self.trimmed();
        t.is_empty() || t == placeholder
    }

    /// Drop all transient visual flags (used when cloning a row).
    pub fn clear_visuals(&mut self) {
        self.modified = false;
        self.unlinked = false;
        self.selected = false;
        self.range_selected = false;
        self.dragging = false;
        self.drop_target = false;
        self.draggable = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_captures_original() {
        let cell = Cell::from_render("PC-001");
        assert_eq!(cell.value(), "PC-001");
        assert_eq!(cell.original(), "PC-001");
    }

    #[test]
    fn edits_never_touch_original() {
        let mut cell = Cell::from_render("PC-001");
        cell.set_value("PC-002");
        cell.clear_value();
        assert_eq!(cell.original(), "PC-001");
    }

    #[test]
    fn accept_resets_baseline() {
        let mut cell = Cell::from_render("a");
        cell.set_value("b");
        cell.accept();
        assert_eq!(cell.original(), "b");
    }

    #[test]
    fn blank_treats_placeholder_as_empty() {
        let mut cell = Cell::from_render("---");
        assert!(cell.is_blank("---"));
        cell.set_value("  ");
        assert!(cell.is_blank("---"));
        cell.set_value("PC-001");
        assert!(!cell.is_blank("---"));
    }
}
