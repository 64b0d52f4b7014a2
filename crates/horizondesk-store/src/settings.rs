//! Persisted application preferences.
//!
//! Settings live under their own key next to the collections. Stored or
//! imported documents are merged over the defaults field by field, so a
//! partial document only overrides what it names.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::kv::KeyValueStorage;
use crate::store::RecordStore;
use crate::{Result, StoreError};

/// Name of the settings entry, appended to the key prefix.
pub const SETTINGS_NAME: &str = "settings";

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Auto,
}

/// Code editor preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeEditorSettings {
    pub font_size: u32,
    pub tab_size: u32,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub minimap: bool,
}

impl Default for CodeEditorSettings {
    fn default() -> Self {
        Self {
            font_size: 14,
            tab_size: 2,
            word_wrap: true,
            line_numbers: true,
            minimap: false,
        }
    }
}

/// Privacy preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettings {
    pub analytics: bool,
    pub crash_reports: bool,
    pub usage_data: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            analytics: false,
            crash_reports: true,
            usage_data: false,
        }
    }
}

/// All user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    pub auto_save: bool,
    pub notifications: bool,
    pub developer_mode: bool,
    pub ai_assistant: bool,
    pub terminal_history: usize,
    pub code_editor: CodeEditorSettings,
    pub privacy: PrivacySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: "en".to_string(),
            auto_save: true,
            notifications: true,
            developer_mode: false,
            ai_assistant: true,
            terminal_history: horizondesk_core::config::DEFAULT_HISTORY_LIMIT,
            code_editor: CodeEditorSettings::default(),
            privacy: PrivacySettings::default(),
        }
    }
}

impl AppSettings {
    /// Parse a settings document, filling absent fields from the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| StoreError::Decoding {
            collection: SETTINGS_NAME.to_string(),
            source,
        })
    }

    /// Set one field by its dot-separated camelCase path, e.g.
    /// `codeEditor.fontSize`.
    ///
    /// `raw` is parsed as JSON when possible and taken as a string otherwise.
    pub fn set_path(&mut self, path: &str, raw: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let new_value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        let mut current = &mut json;
        for part in path.split('.') {
            current = current
                .get_mut(part)
                .ok_or_else(|| StoreError::Validation(format!("unknown setting: {path}")))?;
        }
        if current.is_object() {
            return Err(StoreError::Validation(format!(
                "{path} is a section, set one of its fields instead"
            )));
        }
        *current = new_value;

        *self = serde_json::from_value(json).map_err(|e| {
            StoreError::Validation(format!("invalid value for {path}: {e}"))
        })?;
        Ok(())
    }
}

/// Load and persist [`AppSettings`] in the shared storage namespace.
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SettingsStore {
    /// Create a settings store keyed under `prefix`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, prefix: &str) -> Self {
        Self {
            storage,
            key: format!("{prefix}{SETTINGS_NAME}"),
        }
    }

    /// Settings store sharing the namespace of `records`.
    pub fn for_records(records: &RecordStore) -> Self {
        Self::new(records.storage().clone(), &records.options().key_prefix)
    }

    /// Storage key of the settings entry.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored settings merged over defaults. Absent or undecodable settings
    /// yield the defaults.
    pub fn load(&self) -> Result<AppSettings> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(AppSettings::default());
        };
        match AppSettings::from_json(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(key = %self.key, "using default settings: {e}");
                Ok(AppSettings::default())
            }
        }
    }

    /// Persist `settings`.
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let data = serde_json::to_string(settings)?;
        debug!(key = %self.key, "saving settings");
        self.storage.set(&self.key, &data)
    }

    /// Persist and return the defaults.
    pub fn reset(&self) -> Result<AppSettings> {
        let defaults = AppSettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }

    /// Remove the settings entry.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }

    /// Current settings as a pretty-printed JSON document.
    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.load()?)?)
    }

    /// Replace the stored settings with `json` merged over the defaults.
    ///
    /// Unlike [`load`](Self::load), an invalid document is an error and
    /// leaves the stored settings untouched.
    pub fn import(&self, json: &str) -> Result<AppSettings> {
        let settings = AppSettings::from_json(json)?;
        self.save(&settings)?;
        Ok(settings)
    }
}
