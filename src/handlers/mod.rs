//! Request handlers for each shim mode

pub mod articles;
pub mod chat;
pub mod locations;
pub mod reading;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::Config;
use crate::error::{Result, ShimError};
use crate::glossary::{GlossaryEntry, GlossaryStore};
use crate::prompts;
use crate::records::parse_records;
use crate::transport::Generator;
use std::sync::Arc;

/// Owns the generator and the glossary for one process run
pub struct Handlers {
    pub(crate) generator: Arc<dyn Generator>,
    pub(crate) glossary: GlossaryStore,
    pub(crate) config: Arc<Config>,
}

impl Handlers {
    pub fn new(generator: Arc<dyn Generator>, config: Arc<Config>) -> Self {
        Self {
            generator,
            glossary: GlossaryStore::new(),
            config,
        }
    }

    pub fn glossary(&self) -> &GlossaryStore {
        &self.glossary
    }

    /// Ask the generator for a term list over `text` and store what it returns.
    /// Only entries that were new to the glossary are returned.
    pub(crate) async fn extract_into_glossary(&mut self, text: &str) -> Result<Vec<GlossaryEntry>> {
        let reply = self.generator.generate(&prompts::extract_terms(text)).await?;
        Ok(self.store_term_rows(&reply))
    }

    pub(crate) fn store_term_rows(&mut self, reply: &str) -> Vec<GlossaryEntry> {
        let mut added = Vec::new();
        for row in records_or_empty(reply, 2) {
            let (term, definition) = (&row[0], &row[1]);
            if self.glossary.add(term, definition) {
                added.push(GlossaryEntry::new(term.as_str(), definition.as_str()));
            }
        }
        tracing::info!("Glossary gained {} new terms ({} total)", added.len(), self.glossary.len());
        added
    }
}

/// Parse model output, treating an unreadable reply as having no rows
pub(crate) fn records_or_empty(text: &str, min_columns: usize) -> Vec<Vec<String>> {
    parse_records(text, min_columns).unwrap_or_else(|e| {
        tracing::warn!("Discarding unparseable model output: {}", e);
        Vec::new()
    })
}

/// Returns the field as given, or `InvalidRequest` naming it when absent or empty
pub(crate) fn required_field(value: Option<&str>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ShimError::InvalidRequest(format!(
            "'{name}' is required and must not be empty"
        ))),
    }
}

/// Envelope identifier `<mode>-<epoch-millis>`
pub(crate) fn envelope_id(mode: &str) -> String {
    format!("{mode}-{}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_id_shape() {
        let id = envelope_id("chat");
        let millis = id.strip_prefix("chat-").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_required_field() {
        assert_eq!(required_field(Some(" GERD "), "prompt").unwrap(), " GERD ");
        assert_eq!(required_field(Some("   "), "prompt").unwrap(), "   ");
        assert!(matches!(
            required_field(Some(""), "prompt"),
            Err(ShimError::InvalidRequest(_))
        ));
        assert!(required_field(None, "topic").is_err());
    }
}
