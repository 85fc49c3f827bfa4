use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// An ordered string-to-string table backed by a single JSON object file.
///
/// Entries keep file order. Every `put` rewrites the whole file through a
/// temp file and rename. A table without a backing path lives only in memory.
#[derive(Clone, Debug, Default)]
pub struct JsonTable {
    entries: Vec<(String, String)>,
    path: Option<PathBuf>,
}

impl JsonTable {
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (k, v) in entries {
            table.insert(k.into(), v.into());
        }
        table
    }

    /// Load `path`. When the file does not exist, the table starts from
    /// `seed` and the seed is written out straight away.
    pub fn open(path: impl Into<PathBuf>, seed: Vec<(String, String)>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let map: Map<String, Value> = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            let entries = map
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    other => {
                        tracing::warn!(key = %k, value = %other, file = %path.display(), "skipping non-string entry");
                        None
                    }
                })
                .collect();
            Ok(Self {
                entries,
                path: Some(path),
            })
        } else {
            let table = Self {
                entries: seed,
                path: Some(path),
            };
            table.save()?;
            Ok(table)
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Insert or replace, then write through to disk.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.insert(key.into(), value.into());
        self.save()
    }

    fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let json = serde_json::to_string_pretty(&map)?;

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}
