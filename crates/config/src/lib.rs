//! `ledgergrid-config` — Settings for the integrated ledger grid.
//!
//! Small leaf crate: interaction policies the engine consults at runtime,
//! loaded from a TOML file in the platform config directory.

pub mod settings;

pub use settings::{CheckboxPolicy, Settings};
