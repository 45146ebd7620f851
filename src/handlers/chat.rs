use tracing::info;

use super::{Handlers, envelope_id, required_field};
use crate::error::{Result, ShimError};
use crate::models::{ChatRequest, ChatResponse};
use crate::prompts;

impl Handlers {
    /// Answer a chat prompt, optionally consulting and growing the glossary
    pub async fn chat(&mut self, req: ChatRequest) -> Result<ChatResponse> {
        let prompt = required_field(req.prompt.as_deref(), "prompt")?;

        let file = req
            .file
            .as_ref()
            .filter(|f| !f.content.is_empty())
            .map(|f| (f.name.as_str(), f.content.as_str()));
        let file_received = file.is_some();
        let context = prompts::chat_context(&prompt, file);

        info!(file_received, "Generating chat reply");
        let reply = self
            .generator
            .generate(&prompts::chat(&context))
            .await
            .map_err(|e| match e {
                ShimError::Generation(_) => e,
                other => ShimError::Generation(other.to_string()),
            })?;

        let tokens = reply.split_whitespace().count();

        let mut glossary_terms = Vec::new();
        let meta = req.metadata.unwrap_or_default();
        if meta.kind.as_deref() == Some("medical") {
            if meta.search_glossary {
                let matches = self.glossary.search(&prompt);
                info!("Glossary search matched {} terms", matches.len());
                glossary_terms.extend(matches);
            }
            if meta.update_glossary {
                let added = self.extract_into_glossary(&reply).await?;
                glossary_terms.extend(added);
            }
        }

        Ok(ChatResponse {
            response: reply,
            tokens,
            prompt,
            file_received,
            id: envelope_id("chat"),
            glossary_terms,
        })
    }
}
