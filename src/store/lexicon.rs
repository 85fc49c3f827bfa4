use std::path::PathBuf;

use anyhow::Result;

use crate::engine::normalize::{normalize, split_terms};
use crate::store::json_store::JsonTable;
use crate::store::schema;

/// Source-term to target-term table with forward, reverse and
/// comma-separated lookups.
#[derive(Clone, Debug)]
pub struct Lexicon {
    table: JsonTable,
}

impl Lexicon {
    /// Open the lexicon file, seeding it with the bundled word list when it
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let table = JsonTable::open(path, schema::default_lexicon())?;
        tracing::info!(entries = table.len(), "lexicon loaded");
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter()
    }

    pub fn forward(&self, term: &str) -> Option<&str> {
        self.table.get(term).filter(|v| !v.is_empty())
    }

    /// The first key (file order) whose normalized value equals `term`.
    pub fn reverse(&self, term: &str) -> Option<&str> {
        self.table
            .iter()
            .find(|(_, v)| normalize(v) == term)
            .map(|(k, _)| k)
    }

    /// Forward, then reverse, then each comma-separated part of `term`, then
    /// the comma-separated parts of stored keys and values.
    /// `term` must already be normalized.
    pub fn lookup(&self, term: &str) -> Option<&str> {
        if let Some(answer) = self.forward(term).or_else(|| self.reverse(term)) {
            return Some(answer);
        }
        if term.contains(',') {
            for part in term.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                if let Some(answer) = self.forward(part).or_else(|| self.reverse(part)) {
                    return Some(answer);
                }
            }
        }
        self.sub_term(term)
    }

    fn sub_term(&self, term: &str) -> Option<&str> {
        self.table.iter().find_map(|(k, v)| {
            if k.contains(',') && k.split(',').any(|p| p.trim() == term) {
                Some(v)
            } else if v.contains(',') && split_terms(v).iter().any(|p| p == term) {
                Some(k)
            } else {
                None
            }
        })
    }

    /// Record an operator-supplied answer under the full normalized term.
    pub fn learn(&mut self, term: &str, answer: &str) -> Result<()> {
        self.table.put(term, answer)?;
        tracing::info!(term, answer, "lexicon entry added");
        Ok(())
    }
}
