use tracing::info;

use super::{Handlers, envelope_id, required_field};
use crate::error::Result;
use crate::models::{ReadArticleRequest, ReadArticleResponse};
use crate::prompts;

impl Handlers {
    /// Have the generator read a web page and add the terms it lists to the glossary
    pub async fn read_article(&mut self, req: ReadArticleRequest) -> Result<ReadArticleResponse> {
        let url = required_field(req.url.as_deref(), "url")?;

        info!("Reading article {}", url);
        let reply = self.generator.generate(&prompts::read_article(&url)).await?;
        let glossary_terms = self.store_term_rows(&reply);

        Ok(ReadArticleResponse {
            url,
            glossary_terms,
            id: envelope_id("read"),
        })
    }
}
