//! Event types for grid change notifications.
//!
//! The renderer and the persistence collaborator observe the model
//! through these instead of polling. Tests use `EventCollector` to
//! verify emission ordering around exchange and separation.

use ledgergrid_core::GridPos;

/// Events emitted by the grid and its engines.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The active cell moved; the renderer should scroll it into view.
    ScrollTo { pos: GridPos },

    /// A cell's current value changed.
    CellChanged { row_id: u64, field_code: String },

    /// Row-level dirty state (and checkbox) flipped.
    RowModifiedChanged { row_id: u64, modified: bool, checkbox: bool },

    /// A row's integration key was rebuilt to a different value.
    IntegrationKeyChanged { row_id: u64, old: String, new: String },

    /// A separated row was inserted after an existing row.
    RowInserted { row_id: u64, after_row_id: u64 },

    /// A row became empty and was pruned.
    RowRemoved { row_id: u64, integration_key: String },
}

/// Callback type for receiving grid events.
pub type EventCallback = Box<dyn FnMut(GridEvent)>;

/// Simple event collector for testing.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Row ids of all `RowRemoved` events, in order.
    pub fn removed_rows(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::RowRemoved { row_id, .. } => Some(*row_id),
                _ => None,
            })
            .collect()
    }

    /// `(row_id, field_code)` of all `CellChanged` events, in order.
    pub fn cells_changed(&self) -> Vec<(u64, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::CellChanged { row_id, field_code } => {
                    Some((*row_id, field_code.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// `(row_id, old, new)` of all `IntegrationKeyChanged` events.
    pub fn keys_changed(&self) -> Vec<(u64, &str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::IntegrationKeyChanged { row_id, old, new } => {
                    Some((*row_id, old.as_str(), new.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Targets of all `ScrollTo` events.
    pub fn scrolls(&self) -> Vec<GridPos> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::ScrollTo { pos } => Some(*pos),
                _ => None,
            })
            .collect()
    }
}
