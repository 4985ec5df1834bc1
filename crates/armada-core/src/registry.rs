//! String-keyed parameter store.
//!
//! Backs controller configuration, scenario files, and the persisted
//! population format: `key = value` lines with `#` comments. Keys are kept
//! sorted so a save → load → save round trip is byte-identical.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}:{line_no}: malformed line (expected `key = value`): {line:?}")]
    Parse {
        path: String,
        line_no: usize,
        line: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    map: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn put(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_owned(), value.to_owned());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // --- Typed accessors ---
    //
    // An unparseable value is a configuration fault: registries are
    // validated before any battle starts, so these panic rather than
    // threading errors through the tick loop.

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("Registry key {key:?} is not an integer: {v:?}"))
        })
    }

    pub fn get_uint(&self, key: &str) -> Option<u64> {
        self.get(key).map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("Registry key {key:?} is not an unsigned integer: {v:?}"))
        })
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key).map(|v| {
            v.trim()
                .parse()
                .unwrap_or_else(|_| panic!("Registry key {key:?} is not a float: {v:?}"))
        })
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| match v.trim() {
            "TRUE" | "true" | "1" => true,
            "FALSE" | "false" | "0" => false,
            other => panic!("Registry key {key:?} is not a bool: {other:?}"),
        })
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn get_uint_or(&self, key: &str, default: u64) -> u64 {
        self.get_uint(key).unwrap_or(default)
    }

    pub fn get_float_or(&self, key: &str, default: f32) -> f32 {
        self.get_float(key).unwrap_or(default)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    pub fn put_int(&mut self, key: &str, value: i64) {
        self.put(key, &value.to_string());
    }

    pub fn put_float(&mut self, key: &str, value: f32) {
        self.put(key, &format!("{value}"));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, if value { "TRUE" } else { "FALSE" });
    }

    /// Set `key` to `value` only if absent (controller defaults).
    pub fn put_default(&mut self, key: &str, value: &str) {
        if !self.contains(key) {
            self.put(key, value);
        }
    }

    // --- Prefix handling (population `fleet<i>.` namespaces) ---

    /// Extract every `prefix`-keyed entry into a new registry, with the
    /// prefix stripped.
    pub fn split_on_prefix(&self, prefix: &str) -> Registry {
        let mut out = Registry::new();
        for (k, v) in &self.map {
            if let Some(stripped) = k.strip_prefix(prefix) {
                out.put(stripped, v);
            }
        }
        out
    }

    /// Copy every entry of `other` into this registry under `prefix`.
    pub fn put_all_with_prefix(&mut self, other: &Registry, prefix: &str) {
        for (k, v) in &other.map {
            self.put(&format!("{prefix}{k}"), v);
        }
    }

    // --- Text format ---

    pub fn parse(text: &str, path: &str) -> Result<Registry, RegistryError> {
        let mut reg = Registry::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((k, v)) if !k.trim().is_empty() => {
                    reg.put(k.trim(), v.trim());
                }
                _ => {
                    return Err(RegistryError::Parse {
                        path: path.to_owned(),
                        line_no: i + 1,
                        line: raw.to_owned(),
                    });
                }
            }
        }
        Ok(reg)
    }

    pub fn serialize_to_string(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.map {
            let _ = writeln!(out, "{k} = {v}");
        }
        out
    }

    pub fn load(path: &Path) -> Result<Registry, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Load `path` on top of this registry, overwriting existing keys.
    pub fn load_into(&mut self, path: &Path) -> Result<(), RegistryError> {
        let loaded = Self::load(path)?;
        for (k, v) in &loaded.map {
            self.put(k, v);
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        std::fs::write(path, self.serialize_to_string()).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
