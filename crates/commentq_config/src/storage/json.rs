use crate::errors::Error;
use crate::settings::Setting;
use crate::StorageAdapter;
use commentq_shared::types::Result;
use log::warn;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads settings from a flat json object (`{ "query.coerce_types": "b:false" }`). Settings
/// that are set afterwards are written back to the file.
pub struct JsonStorageAdapter {
    path: PathBuf,
    elements: Mutex<HashMap<String, Setting>>,
}

impl TryFrom<&Path> for JsonStorageAdapter {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> Result<Self> {
        let elements = if path.exists() {
            if !path.is_file() {
                return Err(Error::Config(format!("{} is not a regular file", path.display())).into());
            }
            read_file(path)?
        } else {
            fs::write(path, "{}")?;
            HashMap::new()
        };

        Ok(JsonStorageAdapter {
            path: path.to_path_buf(),
            elements: Mutex::new(elements),
        })
    }
}

impl JsonStorageAdapter {
    /// Opens a settings file that must already exist. Unlike `try_from`, a missing file is an
    /// error and nothing is written.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!("settings file {} not found", path.display())).into());
        }

        Self::try_from(path)
    }
}

impl StorageAdapter for JsonStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        self.elements.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) {
        let mut lock = self.elements.lock();
        lock.insert(key.to_owned(), value);

        if let Err(err) = write_file(&self.path, &lock) {
            warn!("could not write settings to {}: {err}", self.path.display());
        }
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        Ok(self.elements.lock().clone())
    }
}

/// Reads the whole json file. Entries that cannot be decoded are skipped with a warning.
fn read_file(path: &Path) -> Result<HashMap<String, Setting>> {
    let buf = fs::read_to_string(path).map_err(Error::IO)?;
    let parsed_json: Value = serde_json::from_str(&buf).map_err(Error::JsonSerde)?;

    let Value::Object(settings) = parsed_json else {
        return Err(Error::Config(format!("{} does not contain a json object", path.display())).into());
    };

    let mut elements = HashMap::new();
    for (key, value) in settings {
        match serde_json::from_value::<Setting>(value) {
            Ok(setting) => {
                elements.insert(key, setting);
            }
            Err(err) => {
                warn!("problem reading setting {key} from json: {err}");
            }
        }
    }

    Ok(elements)
}

fn write_file(path: &Path, elements: &HashMap<String, Setting>) -> Result<()> {
    let json = serde_json::to_string_pretty(elements).map_err(Error::JsonSerde)?;
    fs::write(path, json).map_err(Error::IO)?;
    Ok(())
}
