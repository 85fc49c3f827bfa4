use std::path::PathBuf;

use anyhow::Result;

use crate::engine::normalize::normalize;
use crate::store::json_store::JsonTable;

/// Image `src` to word table, shared by Choose-Picture and Describe-Picture.
#[derive(Clone, Debug)]
pub struct PictureIndex {
    table: JsonTable,
}

impl PictureIndex {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let table = JsonTable::open(path, Vec::new())?;
        tracing::info!(entries = table.len(), "picture index loaded");
        Ok(Self { table })
    }

    #[cfg(test)]
    pub fn in_memory<K: Into<String>, V: Into<String>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            table: JsonTable::from_entries(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn word_for(&self, src: &str) -> Option<&str> {
        self.table.get(src).filter(|w| !w.trim().is_empty())
    }

    /// The first image whose normalized word equals `word`.
    pub fn src_for(&self, word: &str) -> Option<&str> {
        self.table
            .iter()
            .find(|(_, w)| normalize(w) == word)
            .map(|(src, _)| src)
    }

    pub fn learn(&mut self, src: &str, word: &str) -> Result<()> {
        self.table.put(src, word)?;
        tracing::info!(src, word, "picture entry added");
        Ok(())
    }
}
