use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::Error;

/// Resolves label keys to display strings. A missing key is an error, never a
/// silent fallback.
pub trait LabelResolver {
    fn translate(&self, key: &str) -> Result<String, Error>;
}

/// Flat key -> string table. Nested JSON objects are flattened to dotted keys,
/// so `{"slide": {"title": "Slide"}}` resolves `slide.title`. Numbers are
/// stored as their decimal text (`{"version": 3}` resolves `version` to "3");
/// any other value type is rejected.
#[derive(Clone, Debug, Default)]
pub struct Labels {
    entries: HashMap<String, String>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let root: Value = serde_json::from_str(json)?;
        let mut labels = Self::new();
        flatten_into(&mut labels.entries, String::new(), &root)?;
        Ok(labels)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LabelResolver for Labels {
    fn translate(&self, key: &str) -> Result<String, Error> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| Error::MissingLabel(key.to_string()))
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: String, value: &Value) -> Result<(), Error> {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_into(out, key, v)?;
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Number(n) => {
            out.insert(prefix, n.to_string());
        }
        other => {
            return Err(Error::InvalidConfig(format!(
                "label '{prefix}' must be a string or object, got {other}"
            )));
        }
    }
    Ok(())
}
