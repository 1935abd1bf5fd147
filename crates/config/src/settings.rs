// Grid interaction settings
// Loaded from <config_dir>/ledgergrid/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the per-row modification checkbox tracks cell dirty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckboxPolicy {
    /// The checkbox is a pure projection of row dirty state. A manual
    /// uncheck may be overwritten by the next recompute.
    #[default]
    Derived,
    /// A manual uncheck sticks until the row transitions clean -> dirty
    /// again (or the user re-checks it).
    ManualOverride,
}

/// Grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Literal cell text treated as empty when deciding whether a row
    /// still holds any data (not consulted for dirty comparison).
    pub empty_placeholder: String,

    /// Checkbox auto-sync behavior.
    pub checkbox_policy: CheckboxPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            empty_placeholder: "---".to_string(),
            checkbox_policy: CheckboxPolicy::Derived,
        }
    }
}

impl Settings {
    /// Path to the settings file.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("ledgergrid").join("settings.toml")
    }

    /// Load settings from the default location, falling back to defaults
    /// on a missing or unparseable file.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, contents).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.empty_placeholder, "---");
        assert_eq!(s.checkbox_policy, CheckboxPolicy::Derived);
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut s = Settings::default();
        s.checkbox_policy = CheckboxPolicy::ManualOverride;
        s.empty_placeholder = "(none)".to_string();
        s.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, s);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("nope.toml"));
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "not = [valid").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "checkbox_policy = \"manual_override\"\n").unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded.checkbox_policy, CheckboxPolicy::ManualOverride);
        assert_eq!(loaded.empty_placeholder, "---");
    }
}
