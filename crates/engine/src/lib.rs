//! `ledgergrid-engine` — Interactive grid core for the integrated ledger
//! editor.
//!
//! Four backing record sets ("ledgers": seat, PC, extension, user) are
//! joined into grid rows by primary-key values. This crate owns the
//! authoritative row/cell model and the engines that mutate it: selection
//! and keyboard navigation, drag-based primary-key exchange, row
//! separation, and dirty/highlight tracking. Rendering is a projection
//! over the model's state flags; no UI dependencies here.

pub mod cell;
pub mod dirty;
pub mod error;
pub mod events;
pub mod exchange;
pub mod grid;
pub mod key;
pub mod row;
pub mod schema;
pub mod select;
pub mod separate;

#[cfg(test)]
pub mod harness;

pub use error::GridError;
pub use events::{EventCallback, EventCollector, GridEvent};
pub use exchange::{DragOrigin, DropOutcome, ExchangeEngine};
pub use grid::{Grid, RowNumberSource, RowRecord, SequenceRowNumbers, SubmissionRow};
pub use key::IntegrationKey;
pub use schema::{CellKind, EditPolicy, FieldDescriptor, FieldSchema, FieldSource, Ledger};
pub use select::{ClipEntry, Direction, SelectionEngine};
pub use separate::SeparationEngine;
