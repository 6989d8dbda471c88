//! Configuration store
//!
//! Settings are identified by a dotted key (`query.coerce_types`). Every known key is declared,
//! together with its default value and description, in the embedded `settings.json`. A storage
//! adapter may override the defaults.
mod errors;
pub mod settings;
pub mod storage;

pub use crate::errors::Error;

use crate::settings::{Setting, SettingInfo};
use crate::storage::MemoryStorageAdapter;
use commentq_shared::types::Result;
use lazy_static::lazy_static;
use log::warn;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::mem;
use std::str::FromStr;
use wildmatch::WildMatch;

const SETTINGS_JSON: &str = include_str!("./settings.json");

/// `StorageAdapter` is the interface for storing and retrieving settings.
pub trait StorageAdapter: Send + Sync {
    /// Retrieves a setting from the storage
    fn get(&self, key: &str) -> Option<Setting>;

    /// Stores a given setting to the storage
    fn set(&self, key: &str, value: Setting);

    /// Retrieves all the settings in the storage in one go. Used when a storage is attached to
    /// the store.
    fn all(&self) -> Result<HashMap<String, Setting>>;
}

lazy_static! {
    static ref CONFIG_STORE: RwLock<ConfigStore> = RwLock::new(ConfigStore::default());
}

/// Returns a read guard on the global config store
pub fn config_store() -> RwLockReadGuard<'static, ConfigStore> {
    CONFIG_STORE.read()
}

/// Returns a write guard on the global config store
pub fn config_store_write() -> RwLockWriteGuard<'static, ConfigStore> {
    CONFIG_STORE.write()
}

/// Shorthands for reading the global config store:
///
/// ```
/// use commentq_config::{config, config_store};
/// let coerce = config!(bool "query.coerce_types");
/// ```
///
/// Unknown keys return the zero value of the requested type.
#[allow(clippy::crate_in_macro_def)]
#[macro_export]
macro_rules! config {
    (string $key:expr) => {
        match config_store().get($key) {
            Some(setting) => setting.value_string(),
            None => String::new(),
        }
    };
    (bool $key:expr) => {
        match config_store().get($key) {
            Some(setting) => setting.to_bool(),
            None => false,
        }
    };
}

#[allow(clippy::crate_in_macro_def)]
#[macro_export]
macro_rules! config_set {
    (string $key:expr, $val:expr) => {
        config_store().set($key, Setting::String($val))
    };
    (bool $key:expr, $val:expr) => {
        config_store().set($key, Setting::Bool($val))
    };
}

/// `JsonEntry` is used for parsing the settings.json file
#[derive(Debug, Deserialize)]
struct JsonEntry {
    key: String,
    #[serde(rename = "type")]
    _entry_type: String,
    default: String,
    description: String,
}

/// Holds the current value of every known setting
pub struct ConfigStore {
    /// Current values, keyed by the full dotted key
    settings: Mutex<HashMap<String, Setting>>,
    /// Description, default value and type information of each setting
    settings_info: HashMap<String, SettingInfo>,
    /// Keys in declaration order
    setting_keys: Vec<String>,
    /// The storage adapter used for persisting and loading keys
    storage: Box<dyn StorageAdapter>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        let mut store = Self {
            settings: Mutex::new(HashMap::new()),
            settings_info: HashMap::new(),
            setting_keys: Vec::new(),
            storage: Box::new(MemoryStorageAdapter::new()),
        };

        if let Err(err) = store.populate_default_settings() {
            warn!("config: could not load default settings: {err}");
        }
        store
    }
}

impl ConfigStore {
    /// Sets a new storage engine and overwrites the current settings with everything found in
    /// the storage. Settings in the storage with an unknown key or a mismatching type are skipped.
    pub fn set_storage(&mut self, storage: Box<dyn StorageAdapter>) {
        self.storage = storage;

        let all_settings = match self.storage.all() {
            Ok(all_settings) => all_settings,
            Err(err) => {
                warn!("config: could not read settings from storage: {err}");
                return;
            }
        };

        for (key, value) in all_settings {
            if self.accepts(&key, &value) {
                self.settings.lock().insert(key, value);
            }
        }
    }

    /// Resets every setting to its default value
    pub fn reset(&self) {
        let mut settings = self.settings.lock();
        for (key, info) in &self.settings_info {
            settings.insert(key.clone(), info.default.clone());
        }
    }

    /// Returns true when the store knows about the given key
    pub fn has(&self, key: &str) -> bool {
        self.settings_info.contains_key(key)
    }

    /// Returns the list of keys that match the given search string (`?` and `*` wildcards)
    pub fn find(&self, search: &str) -> Vec<String> {
        let search = WildMatch::new(search);

        self.setting_keys
            .iter()
            .filter(|key| search.matches(key))
            .cloned()
            .collect()
    }

    /// Returns the current value of the given key. Falls back to the storage adapter and then to
    /// the default value. Returns None for unknown keys.
    pub fn get(&self, key: &str) -> Option<Setting> {
        let Some(info) = self.settings_info.get(key) else {
            warn!("config: setting {key} is not known");
            return None;
        };

        if let Some(setting) = self.settings.lock().get(key) {
            return Some(setting.clone());
        }

        if let Some(setting) = self.storage.get(key) {
            if self.accepts(key, &setting) {
                self.settings.lock().insert(key.to_string(), setting.clone());
                return Some(setting);
            }
        }

        Some(info.default.clone())
    }

    /// Sets the given setting and persists it to the storage. Unknown keys and values of a
    /// different type than the default are rejected with a warning.
    pub fn set(&self, key: &str, value: Setting) {
        if !self.accepts(key, &value) {
            return;
        }

        self.settings.lock().insert(key.to_owned(), value.clone());
        self.storage.set(key, value);
    }

    fn accepts(&self, key: &str, value: &Setting) -> bool {
        let Some(info) = self.settings_info.get(key) else {
            warn!("config: setting {key} is not known");
            return false;
        };

        if mem::discriminant(&info.default) != mem::discriminant(value) {
            warn!("config: setting {key} is of different type than setting expects");
            return false;
        }

        true
    }

    /// Populates the settings from the embedded settings.json file
    fn populate_default_settings(&mut self) -> Result<()> {
        let json_data: Value = serde_json::from_str(SETTINGS_JSON).map_err(Error::JsonSerde)?;

        let Value::Object(data) = json_data else {
            return Err(Error::Config("settings.json must contain an object".into()).into());
        };

        for (section_prefix, section_entries) in data {
            let section_entries: Vec<JsonEntry> =
                serde_json::from_value(section_entries).map_err(Error::JsonSerde)?;

            for entry in section_entries {
                let key = format!("{}.{}", section_prefix, entry.key);

                let info = SettingInfo {
                    key: key.clone(),
                    description: entry.description,
                    default: Setting::from_str(&entry.default)?,
                };

                self.setting_keys.push(key.clone());
                self.settings.lock().insert(key.clone(), info.default.clone());
                self.settings_info.insert(key, info);
            }
        }

        Ok(())
    }
}
