use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::metric::Metric;

/// Version written by this build. Version 1 documents stored
/// `darken_after_pausing` as a bool.
pub const SETTINGS_VERSION: u64 = 2;

/// Accepted ticks per second, from the settings file and the command line.
pub const TICK_RATES: RangeInclusive<u32> = 1..=20;

/// What the readout does while typing is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DarkenPolicy {
    #[default]
    Darken,
    Hide,
    Show,
}

impl DarkenPolicy {
    /// The next policy in settings order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            DarkenPolicy::Darken => DarkenPolicy::Hide,
            DarkenPolicy::Hide => DarkenPolicy::Show,
            DarkenPolicy::Show => DarkenPolicy::Darken,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub version: u64,
    pub metrics: Metric,
    pub monkeytype_counting: bool,
    pub show_minmax: bool,
    pub darken_after_pausing: DarkenPolicy,
    /// Ticks per second.
    pub tick_rate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            metrics: Metric::Wpm,
            monkeytype_counting: true,
            show_minmax: false,
            darken_after_pausing: DarkenPolicy::Darken,
            tick_rate: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn document_version(doc: &Value) -> u64 {
    doc.get("version").and_then(Value::as_u64).unwrap_or(1)
}

/// Upgrade a stored settings document to [`SETTINGS_VERSION`].
///
/// Running it on an already current document changes nothing.
pub fn migrate(doc: Value) -> Value {
    let version = document_version(&doc);
    let mut obj = match doc {
        Value::Object(obj) => obj,
        other => {
            log::warn!("settings document is not an object ({other}), using defaults");
            Map::new()
        }
    };

    if version < 2 {
        if let Some(darken) = obj.get("darken_after_pausing").and_then(Value::as_bool) {
            let policy = if darken {
                DarkenPolicy::Darken
            } else {
                DarkenPolicy::Show
            };
            log::info!("migrating darken_after_pausing={darken} to \"{policy}\"");
            obj.insert(
                "darken_after_pausing".to_string(),
                Value::String(policy.to_string()),
            );
        }
    }

    obj.insert("version".to_string(), Value::from(SETTINGS_VERSION));
    Value::Object(obj)
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str, default: T) -> T {
    let Some(raw) = obj.get(key) else {
        return default;
    };
    match serde_json::from_value(raw.clone()) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("ignoring invalid setting `{key}` = {raw} ({err}), using default");
            default
        }
    }
}

impl Settings {
    /// Build settings from a migrated document, falling back to the default
    /// for each field that is missing or invalid.
    pub fn from_value(doc: &Value) -> Self {
        let defaults = Settings::default();
        let Some(obj) = doc.as_object() else {
            return defaults;
        };

        let mut tick_rate = field(obj, "tick_rate", defaults.tick_rate);
        if !TICK_RATES.contains(&tick_rate) {
            log::warn!(
                "tick_rate {tick_rate} outside {}..={}, using {}",
                TICK_RATES.start(),
                TICK_RATES.end(),
                defaults.tick_rate
            );
            tick_rate = defaults.tick_rate;
        }

        Self {
            version: SETTINGS_VERSION,
            metrics: field(obj, "metrics", defaults.metrics),
            monkeytype_counting: field(obj, "monkeytype_counting", defaults.monkeytype_counting),
            show_minmax: field(obj, "show_minmax", defaults.show_minmax),
            darken_after_pausing: field(
                obj,
                "darken_after_pausing",
                defaults.darken_after_pausing,
            ),
            tick_rate,
        }
    }

    /// Parse stored bytes. The flag reports whether an older document was
    /// upgraded and should be written back. Newer or non-object documents
    /// are read with fallbacks but never flagged.
    pub fn from_slice(bytes: &[u8]) -> (Self, bool) {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(doc) => {
                let migrated = doc.is_object() && document_version(&doc) < SETTINGS_VERSION;
                (Self::from_value(&migrate(doc)), migrated)
            }
            Err(err) => {
                log::warn!("settings are not valid JSON ({err}), using defaults");
                (Self::default(), false)
            }
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::settings_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing, unreadable or invalid files yield defaults. A migrated
    /// document is written back once so the next load sees the current
    /// version.
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::debug!("no settings at {} ({err}), using defaults", self.path.display());
                return Settings::default();
            }
        };

        let (settings, migrated) = Settings::from_slice(&bytes);
        if migrated {
            if let Err(err) = self.save(&settings) {
                log::warn!("could not persist migrated settings: {err}");
            }
        }
        settings
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_settings() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("settings.json"));
        let settings = Settings::default();
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn save_and_load_custom_settings() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("settings.json"));
        let settings = Settings {
            metrics: Metric::Cpm,
            monkeytype_counting: false,
            show_minmax: true,
            darken_after_pausing: DarkenPolicy::Hide,
            tick_rate: 4,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Settings::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn legacy_bool_darken_is_migrated() {
        let doc = migrate(json!({ "darken_after_pausing": true }));
        assert_eq!(doc["darken_after_pausing"], "darken");
        assert_eq!(doc["version"], SETTINGS_VERSION);

        let doc = migrate(json!({ "darken_after_pausing": false }));
        assert_eq!(doc["darken_after_pausing"], "show");
    }

    #[test]
    fn migrate_is_idempotent() {
        let once = migrate(json!({ "metrics": "cps", "darken_after_pausing": true }));
        let twice = migrate(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_fields_fall_back() {
        let settings = Settings::from_value(&migrate(json!({ "metrics": "cps" })));
        assert_eq!(
            settings,
            Settings {
                metrics: Metric::Cps,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn invalid_fields_fall_back() {
        let settings = Settings::from_value(&migrate(json!({
            "metrics": "wps",
            "show_minmax": "yes",
            "monkeytype_counting": false,
            "tick_rate": 0,
            "darken_after_pausing": "blink",
        })));
        assert_eq!(settings.metrics, Metric::Wpm);
        assert!(!settings.show_minmax);
        assert!(!settings.monkeytype_counting);
        assert_eq!(settings.tick_rate, 1);
        assert_eq!(settings.darken_after_pausing, DarkenPolicy::Darken);
    }

    #[test]
    fn out_of_range_tick_rate_falls_back() {
        for raw in [json!(4_000_000_000u64), json!(21), json!(5000), json!(-3)] {
            let settings = Settings::from_value(&json!({ "version": 2, "tick_rate": raw }));
            assert_eq!(settings.tick_rate, 1, "{raw}");
        }
        let settings = Settings::from_value(&json!({ "version": 2, "tick_rate": 20 }));
        assert_eq!(settings.tick_rate, 20);

        let (settings, _) = Settings::from_slice(br#"{"version":2,"tick_rate":4000000000}"#);
        assert_eq!(settings.tick_rate, 1);
    }

    #[test]
    fn darken_policy_cycles() {
        assert_eq!(DarkenPolicy::Darken.next(), DarkenPolicy::Hide);
        assert_eq!(DarkenPolicy::Hide.next(), DarkenPolicy::Show);
        assert_eq!(DarkenPolicy::Show.next(), DarkenPolicy::Darken);
    }

    #[test]
    fn only_older_objects_are_flagged_for_write_back() {
        assert!(Settings::from_slice(br#"{"darken_after_pausing":true}"#).1);
        assert!(Settings::from_slice(br#"{"version":1}"#).1);
        assert!(!Settings::from_slice(br#"{"version":2}"#).1);
        assert!(!Settings::from_slice(br#"{"version":3,"metrics":"cps"}"#).1);
        assert!(!Settings::from_slice(b"[1, 2, 3]").1);
    }

    #[test]
    fn future_and_non_object_files_are_left_alone() {
        let dir = tempdir().unwrap();
        for (name, contents) in [
            ("future.json", r#"{"version":3,"metrics":"cps","extra":true}"#),
            ("array.json", "[1, 2, 3]"),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, contents).unwrap();
            FileConfigStore::with_path(&path).load();
            assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        }

        let future = FileConfigStore::with_path(dir.path().join("future.json")).load();
        assert_eq!(future.metrics, Metric::Cps);
    }

    #[test]
    fn garbage_bytes_give_defaults() {
        let (settings, migrated) = Settings::from_slice(b"{not json");
        assert_eq!(settings, Settings::default());
        assert!(!migrated);

        let (settings, _) = Settings::from_slice(b"[1, 2, 3]");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn legacy_file_is_rewritten_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"metrics":"cps","darken_after_pausing":true,"monkeytype_counting":true}"#,
        )
        .unwrap();
        let store = FileConfigStore::with_path(&path);

        let first = store.load();
        assert_eq!(first.darken_after_pausing, DarkenPolicy::Darken);
        assert_eq!(first.metrics, Metric::Cps);

        let stored: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored["darken_after_pausing"], "darken");
        assert_eq!(stored["version"], SETTINGS_VERSION);

        assert_eq!(store.load(), first);
        assert_eq!(store.load(), first);
    }
}
