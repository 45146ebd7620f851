use tracing::{info, warn};

use super::{Handlers, envelope_id, records_or_empty, required_field};
use crate::error::Result;
use crate::models::{ArticleRecord, ArticleRequest, ArticlesResponse};
use crate::prompts;

impl Handlers {
    /// Recommend reading material for a topic and optionally harvest glossary terms from it
    pub async fn articles(&mut self, req: ArticleRequest) -> Result<ArticlesResponse> {
        let topic = required_field(req.topic.as_deref(), "topic")?;

        let meta = req.metadata.unwrap_or_default();
        let defaults = &self.config.articles;
        let max_results = meta.max_results.unwrap_or(defaults.max_results);
        let source_priority = meta
            .source_priority
            .unwrap_or_else(|| defaults.source_priority.clone());
        let include_definitions = meta
            .include_definitions
            .unwrap_or(defaults.include_definitions);

        info!(max_results, include_definitions, "Finding articles for '{}'", topic);
        let reply = self
            .generator
            .generate(&prompts::find_articles(&topic, max_results, &source_priority))
            .await?;

        let articles: Vec<ArticleRecord> = records_or_empty(&reply, 4)
            .into_iter()
            .filter_map(|row| match <[String; 4]>::try_from(row) {
                Ok([name, url, source_type, description]) => Some(ArticleRecord {
                    name,
                    url,
                    source_type: source_type.to_lowercase(),
                    description,
                }),
                Err(_) => None,
            })
            .take(max_results as usize)
            .collect();
        info!("Parsed {} articles", articles.len());

        let mut glossary_terms = Vec::new();
        if include_definitions {
            for article in &articles {
                match self.extract_into_glossary(&article.description).await {
                    Ok(added) => glossary_terms.extend(added),
                    Err(e) => warn!(
                        "Term extraction failed for article '{}': {} - skipping",
                        article.name, e
                    ),
                }
            }
        }

        Ok(ArticlesResponse {
            topic,
            articles,
            glossary_terms,
            id: envelope_id("articles"),
        })
    }
}
