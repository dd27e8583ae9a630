//! `--set key=value` overrides.

use crate::error::ValuesError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Flat name -> string overrides applied to every (policy, resource) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` pairs.
    ///
    /// Splits on the first `=` and trims both sides, so values may contain
    /// `=`. Later duplicates win.
    pub fn parse<I, S>(pairs: I) -> Result<Self, ValuesError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for pair in pairs {
            let raw = pair.as_ref();
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| ValuesError::InvalidOverride(raw.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ValuesError::InvalidOverride(raw.to_string()));
            }
            overrides.insert(key, value.trim());
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (key, value) in iter {
            overrides.insert(key, value);
        }
        overrides
    }
}
