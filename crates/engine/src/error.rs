use std::fmt;

use ledgergrid_core::GridPos;

use crate::schema::Ledger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Schema JSON parse / deserialization error.
    SchemaParse(String),
    /// Two field descriptors share the same field code.
    DuplicateField(String),
    /// A field code not present in the schema.
    UnknownField(String),
    /// Integration key string could not be parsed.
    KeyParse(String),
    /// No row/cell exists at the given position.
    MissingCell(GridPos),
    /// Separation requires the row to carry an integration key.
    MissingIntegrationKey { row_id: u64 },
    /// Separation target not found in the row's integration key
    /// (cell content and stored key are out of sync).
    SeparateTargetNotFound { ledger: Ledger, value: String },
    /// Separation invoked on an empty primary-key value. The control must
    /// be disabled in that state; reaching this is an invariant violation.
    SeparateEmptyValue,
    /// Separation invoked on a cell that is not a primary key.
    NotPrimaryKey(String),
    /// Multi-cell paste is not implemented in this version.
    UnsupportedPaste,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaParse(msg) => write!(f, "schema parse error: {msg}"),
            Self::DuplicateField(code) => write!(f, "duplicate field code: {code}"),
            Self::UnknownField(code) => write!(f, "unknown field code: {code}"),
            Self::KeyParse(msg) => write!(f, "integration key parse error: {msg}"),
            Self::MissingCell(pos) => write!(f, "no cell at row {}, col {}", pos.row, pos.col),
            Self::MissingIntegrationKey { row_id } => {
                write!(f, "row {row_id} has no integration key")
            }
            Self::SeparateTargetNotFound { ledger, value } => {
                write!(f, "separation target {ledger}:{value} not found in integration key")
            }
            Self::SeparateEmptyValue => write!(f, "cannot separate an empty primary-key value"),
            Self::NotPrimaryKey(code) => write!(f, "field '{code}' is not a primary key"),
            Self::UnsupportedPaste => write!(f, "multi-cell paste is not supported"),
        }
    }
}

impl std::error::Error for GridError {}
