//! Field schema: the ordered, read-only list of field descriptors the
//! rest of the engine consumes.
//!
//! The external schema source delivers JSON; `FieldSchema::from_json`
//! validates it. `FieldSchema::integrated()` builds the standard
//! four-ledger schema used by the integrated view (and by tests).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// One of the four backing record sets.
///
/// Declaration order is the canonical ledger order used when serializing
/// integration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ledger {
    Seat,
    Pc,
    Ext,
    User,
}

impl Ledger {
    pub const ALL: [Ledger; 4] = [Ledger::Seat, Ledger::Pc, Ledger::Ext, Ledger::User];

    /// Stable tag used in integration keys and schema JSON.
    pub fn tag(&self) -> &'static str {
        match self {
            Ledger::Seat => "SEAT",
            Ledger::Pc => "PC",
            Ledger::Ext => "EXT",
            Ledger::User => "USER",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Ledger> {
        match tag {
            "SEAT" => Some(Ledger::Seat),
            "PC" => Some(Ledger::Pc),
            "EXT" => Some(Ledger::Ext),
            "USER" => Some(Ledger::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Where a field's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldSource {
    /// One of the four ledgers.
    Ledger(Ledger),
    /// Grid-internal structural field (row number, checkbox, ...).
    System,
    /// Shared by the integrated view, owned by no ledger.
    #[default]
    Common,
}

impl From<FieldSource> for String {
    fn from(source: FieldSource) -> String {
        match source {
            FieldSource::Ledger(l) => l.tag().to_string(),
            FieldSource::System => "system".to_string(),
            FieldSource::Common => String::new(),
        }
    }
}

impl TryFrom<String> for FieldSource {
    type Error = String;

    fn try_from(s: String) -> Result<Self, String> {
        match s.as_str() {
            "" => Ok(FieldSource::Common),
            "system" => Ok(FieldSource::System),
            tag => Ledger::from_tag(tag)
                .map(FieldSource::Ledger)
                .ok_or_else(|| format!("unknown field source '{tag}'")),
        }
    }
}

/// How a cell is rendered and edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CellKind {
    /// Plain text.
    Text,
    /// Free-text input.
    Input,
    /// Fixed option list.
    Dropdown { options: Vec<String> },
    /// Structural: the row-number cell.
    RowNumber,
    /// Structural: the modification checkbox.
    ModificationCheckbox,
    /// Structural: the hide-row control.
    HideButton,
    /// Structural: render-side indicator for rows whose ledgers disagree.
    LedgerInconsistency,
    /// A record identifier rendered as a link into the owning ledger.
    RecordLink,
}

/// Which edits a field accepts ("editableFrom" policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
    /// Fully editable.
    All,
    /// Display-only; values change only through exchange/separation/render.
    #[default]
    Static,
}

/// Immutable descriptor for one grid column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_code: String,
    pub label: String,
    #[serde(default)]
    pub source: FieldSource,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_record_id: bool,
    #[serde(default)]
    pub edit_policy: EditPolicy,
    pub cell_kind: CellKind,
}

impl FieldDescriptor {
    /// Ledger this field belongs to, if any.
    pub fn ledger(&self) -> Option<Ledger> {
        match self.source {
            FieldSource::Ledger(l) => Some(l),
            _ => None,
        }
    }

    /// Whether the field accepts direct edits.
    pub fn editable(&self) -> bool {
        self.edit_policy == EditPolicy::All
    }

    pub fn is_row_number(&self) -> bool {
        self.cell_kind == CellKind::RowNumber
    }

    /// Structural/system fields are excluded from modified-state and
    /// row-empty accounting: record identifiers, row number, checkbox,
    /// hide button, and anything else sourced from `system`.
    pub fn is_system(&self) -> bool {
        self.is_record_id
            || self.source == FieldSource::System
            || matches!(
                self.cell_kind,
                CellKind::RowNumber
                    | CellKind::ModificationCheckbox
                    | CellKind::HideButton
                    | CellKind::LedgerInconsistency
                    | CellKind::RecordLink
            )
    }
}

/// The ordered field list plus a code -> column index.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: Vec<FieldDescriptor>,
    index: FxHashMap<String, usize>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, GridError> {
        let mut index = FxHashMap::default();
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.field_code.clone(), i).is_some() {
                return Err(GridError::DuplicateField(field.field_code.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Parse a schema from the external source's JSON form (an array of
    /// field descriptors).
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let fields: Vec<FieldDescriptor> =
            serde_json::from_str(json).map_err(|e| GridError::SchemaParse(e.to_string()))?;
        Self::new(fields)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_at(&self, col: usize) -> Option<&FieldDescriptor> {
        self.fields.get(col)
    }

    pub fn field(&self, code: &str) -> Option<&FieldDescriptor> {
        self.index.get(code).map(|&i| &self.fields[i])
    }

    /// Column index of a field code.
    pub fn col_of(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Columns belonging to one ledger (record id, primary key, payload).
    pub fn ledger_cols(&self, ledger: Ledger) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.ledger() == Some(ledger))
            .map(|(i, _)| i)
            .collect()
    }

    /// The primary-key column for a ledger.
    pub fn primary_key_col(&self, ledger: Ledger) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.is_primary_key && f.ledger() == Some(ledger))
    }

    /// Ledgers that contribute at least one field, in canonical order.
    pub fn ledgers(&self) -> Vec<Ledger> {
        Ledger::ALL
            .into_iter()
            .filter(|&l| self.fields.iter().any(|f| f.ledger() == Some(l)))
            .collect()
    }

    /// Column index of the row-number field, if the schema has one.
    pub fn row_number_col(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.is_row_number())
    }

    /// The standard integrated four-ledger schema.
    pub fn integrated() -> Self {
        fn f(
            code: &str,
            label: &str,
            source: FieldSource,
            cell_kind: CellKind,
            edit_policy: EditPolicy,
        ) -> FieldDescriptor {
            FieldDescriptor {
                field_code: code.to_string(),
                label: label.to_string(),
                source,
                is_primary_key: false,
                is_record_id: false,
                edit_policy,
                cell_kind,
            }
        }
        fn pk(code: &str, label: &str, ledger: Ledger) -> FieldDescriptor {
            FieldDescriptor {
                is_primary_key: true,
                ..f(code, label, FieldSource::Ledger(ledger), CellKind::Text, EditPolicy::Static)
            }
        }
        fn rid(code: &str, label: &str, ledger: Ledger) -> FieldDescriptor {
            FieldDescriptor {
                is_record_id: true,
                ..f(
                    code,
                    label,
                    FieldSource::Ledger(ledger),
                    CellKind::RecordLink,
                    EditPolicy::Static,
                )
            }
        }
        fn dropdown(options: &[&str]) -> CellKind {
            CellKind::Dropdown { options: options.iter().map(|s| s.to_string()).collect() }
        }

        use EditPolicy::{All, Static};
        use FieldSource::{Ledger as Src, System};
        use Ledger::{Ext, Pc, Seat, User};

        Self::new(vec![
            f("_row_number", "No.", System, CellKind::RowNumber, Static),
            f("_modification_checkbox", "Save", System, CellKind::ModificationCheckbox, Static),
            f("_hide_button", "Hide", System, CellKind::HideButton, Static),
            f("_ledger_inconsistency", "!", System, CellKind::LedgerInconsistency, Static),
            rid("seat_record_id", "Seat record", Seat),
            pk("seat_number", "Seat no.", Seat),
            f("seat_floor", "Floor", Src(Seat), dropdown(&["1F", "2F", "3F"]), All),
            rid("pc_record_id", "PC record", Pc),
            pk("pc_number", "PC no.", Pc),
            f("pc_usage", "PC usage", Src(Pc), dropdown(&["business", "dev", "loaner"]), All),
            f("pc_model", "Model", Src(Pc), CellKind::Input, All),
            rid("ext_record_id", "Ext record", Ext),
            pk("ext_number", "Ext no.", Ext),
            f("ext_type", "Ext type", Src(Ext), dropdown(&["direct", "shared"]), All),
            rid("user_record_id", "User record", User),
            pk("user_id", "User ID", User),
            f("user_name", "Name", Src(User), CellKind::Input, All),
            f("department", "Department", Src(User), CellKind::Input, All),
        ])
        .expect("integrated schema has unique field codes")
    }
}
