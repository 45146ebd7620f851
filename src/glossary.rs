use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single medical term and its definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

impl GlossaryEntry {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// In-memory term store for one process run.
///
/// Keys are case-sensitive and the first definition stored for a term is
/// kept forever. Search is a linear, case-insensitive substring scan over
/// terms and definitions.
#[derive(Debug, Default, Clone)]
pub struct GlossaryStore {
    entries: Vec<GlossaryEntry>,
    index: HashMap<String, usize>,
}

impl GlossaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `term` unless it is already present. Returns whether it was inserted.
    pub fn add(&mut self, term: &str, definition: &str) -> bool {
        if self.index.contains_key(term) {
            tracing::debug!("Glossary already has term '{}', keeping first definition", term);
            return false;
        }
        self.index.insert(term.to_string(), self.entries.len());
        self.entries.push(GlossaryEntry::new(term, definition));
        true
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.index
            .get(term)
            .map(|&i| self.entries[i].definition.as_str())
    }

    /// Terms in insertion order
    pub fn list_terms(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.term.clone()).collect()
    }

    pub fn search(&self, query: &str) -> Vec<GlossaryEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.term.to_lowercase().contains(&needle)
                    || e.definition.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
