//! Integration keys: which ledger records (by primary-key value) are
//! currently joined into a row.
//!
//! String form is `LEDGER:value|LEDGER:value` in canonical ledger order,
//! so content equality implies string equality regardless of the order
//! components were added.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::schema::Ledger;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IntegrationKey {
    components: BTreeMap<Ledger, String>,
}

impl IntegrationKey {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A key with a single ledger component.
    pub fn single(ledger: Ledger, value: impl Into<String>) -> Self {
        let mut key = Self::default();
        key.insert(ledger, value);
        key
    }

    /// Parse the `LEDGER:value|...` form. Parts without a `:` separator
    /// are skipped; an unknown ledger tag is an error.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let mut key = Self::default();
        for part in s.split('|') {
            let Some((tag, value)) = part.split_once(':') else {
                continue;
            };
            let ledger = Ledger::from_tag(tag)
                .ok_or_else(|| GridError::KeyParse(format!("unknown ledger tag '{tag}'")))?;
            if !value.is_empty() {
                key.components.insert(ledger, value.to_string());
            }
        }
        Ok(key)
    }

    pub fn insert(&mut self, ledger: Ledger, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.components.insert(ledger, value);
        }
    }

    /// Remove the `(ledger, value)` component. Returns false when the
    /// ledger is absent or holds a different value.
    pub fn remove(&mut self, ledger: Ledger, value: &str) -> bool {
        if self.components.get(&ledger).map(String::as_str) == Some(value) {
            self.components.remove(&ledger);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, ledger: Ledger, value: &str) -> bool {
        self.components.get(&ledger).map(String::as_str) == Some(value)
    }

    pub fn get(&self, ledger: Ledger) -> Option<&str> {
        self.components.get(&ledger).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> impl Iterator<Item = (Ledger, &str)> {
        self.components.iter().map(|(&l, v)| (l, v.as_str()))
    }
}

impl fmt::Display for IntegrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (ledger, value) in &self.components {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{}:{}", ledger.tag(), value)?;
            first = false;
        }
        Ok(())
    }
}

impl From<IntegrationKey> for String {
    fn from(key: IntegrationKey) -> String {
        key.to_string()
    }
}

impl TryFrom<String> for IntegrationKey {
    type Error = GridError;

    fn try_from(s: String) -> Result<Self, GridError> {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_round_trip() {
        let key = IntegrationKey::parse("SEAT:A-101|PC:PC-001|USER:u042").unwrap();
        assert_eq!(key.to_string(), "SEAT:A-101|PC:PC-001|USER:u042");
        assert!(key.contains(Ledger::Pc, "PC-001"));
        assert_eq!(key.get(Ledger::Ext), None);
    }

    #[test]
    fn string_form_is_order_independent() {
        let a = IntegrationKey::parse("USER:u042|SEAT:A-101").unwrap();
        let b = IntegrationKey::parse("SEAT:A-101|USER:u042").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "SEAT:A-101|USER:u042");
    }

    #[test]
    fn parts_without_separator_are_skipped() {
        let key = IntegrationKey::parse("garbage|PC:PC-001|").unwrap();
        assert_eq!(key.len(), 1);
        assert_eq!(key.to_string(), "PC:PC-001");
    }

    #[test]
    fn unknown_ledger_tag_is_an_error() {
        assert!(matches!(
            IntegrationKey::parse("PRINTER:x"),
            Err(GridError::KeyParse(_))
        ));
    }

    #[test]
    fn remove_requires_matching_value() {
        let mut key = IntegrationKey::parse("PC:PC-001|EXT:200").unwrap();
        assert!(!key.remove(Ledger::Pc, "PC-999"));
        assert!(key.remove(Ledger::Pc, "PC-001"));
        assert!(!key.remove(Ledger::Pc, "PC-001"));
        assert_eq!(key.to_string(), "EXT:200");
    }

    #[test]
    fn empty_values_are_not_stored() {
        let mut key = IntegrationKey::empty();
        key.insert(Ledger::Seat, "");
        assert!(key.is_empty());
        assert_eq!(key.to_string(), "");
    }
}
