//! `ledgergrid-core` — Pure grid geometry.
//!
//! Positions, rectangular ranges, and the selection model. No knowledge of
//! schemas, ledgers, or cell contents; the engine crate layers those on top.

pub mod selection;

pub use selection::{GridPos, Range, Selection};
