use tracing::info;

use super::{Handlers, envelope_id, required_field};
use crate::error::Result;
use crate::models::{LocationRequest, LocationResponse, SearchParams};
use crate::prompts;

impl Handlers {
    /// Build map-search parameters, rewriting healthcare queries through the generator
    pub async fn locations(&mut self, req: LocationRequest) -> Result<LocationResponse> {
        let query = required_field(req.query.as_deref(), "query")?;

        let meta = req.metadata.unwrap_or_default();
        let defaults = &self.config.locations;
        let region = meta.region.unwrap_or_else(|| defaults.region.clone());
        let language = meta.language.unwrap_or_else(|| defaults.language.clone());
        let zoom = meta.zoom.unwrap_or(defaults.zoom);

        let enhanced_query = if self.is_healthcare_query(&query) {
            info!("Enhancing healthcare location query '{}'", query);
            let rewritten = self
                .generator
                .generate(&prompts::enhance_location_query(&query))
                .await?;
            let rewritten = rewritten.trim();
            if rewritten.is_empty() {
                query.clone()
            } else {
                rewritten.to_string()
            }
        } else {
            query.clone()
        };

        Ok(LocationResponse {
            id: envelope_id("map"),
            search_params: SearchParams {
                q: enhanced_query.clone(),
                region,
                language,
                zoom,
            },
            original_query: query,
            enhanced_query,
        })
    }

    fn is_healthcare_query(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.config
            .locations
            .keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
    }
}
