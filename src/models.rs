use serde::{Deserialize, Deserializer, Serialize};

use crate::glossary::GlossaryEntry;

/// Flexible integer deserializer: the web server forwards form values that may
/// arrive as numbers, floats or numeric strings
fn deserialize_flexible_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleInt {
        Int(u32),
        Float(f64),
        String(String),
    }

    let value = Option::<FlexibleInt>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(FlexibleInt::Int(i)) => Ok(Some(i)),
        Some(FlexibleInt::Float(f)) if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) => {
            Ok(Some(f as u32))
        }
        Some(FlexibleInt::Float(f)) => Err(serde::de::Error::custom(format!(
            "expected a whole number between 0 and {}, got {f}",
            u32::MAX
        ))),
        Some(FlexibleInt::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub file: Option<FilePayload>,
    #[serde(default)]
    pub metadata: Option<ChatMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    /// Conversation type; glossary features only apply to `"medical"`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub search_glossary: bool,
    #[serde(default)]
    pub update_glossary: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    /// Whitespace word count of `response`, not a tokenizer count
    pub tokens: usize,
    pub prompt: String,
    pub file_received: bool,
    pub id: String,
    pub glossary_terms: Vec<GlossaryEntry>,
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub metadata: Option<ArticleMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    #[serde(default, deserialize_with = "deserialize_flexible_u32")]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub source_priority: Option<Vec<String>>,
    #[serde(default)]
    pub include_definitions: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub name: String,
    pub url: String,
    pub source_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub topic: String,
    pub articles: Vec<ArticleRecord>,
    pub glossary_terms: Vec<GlossaryEntry>,
    pub id: String,
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub metadata: Option<LocationMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationMetadata {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flexible_u32")]
    pub zoom: Option<u32>,
}

/// Parameters handed to the embedding application's map client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub q: String,
    pub region: String,
    pub language: String,
    pub zoom: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: String,
    pub original_query: String,
    pub enhanced_query: String,
    pub search_params: SearchParams,
}

// ---------------------------------------------------------------------------
// Read article
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadArticleRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadArticleResponse {
    pub url: String,
    pub glossary_terms: Vec<GlossaryEntry>,
    pub id: String,
}

/// Body written to stdout when a request fails
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
}

// ---------------------------------------------------------------------------
// Gemini generateContent wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying one user text prompt
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if it has any
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_metadata_names() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"prompt":"what is GERD?","metadata":{"type":"medical","updateGlossary":true}}"#,
        )
        .unwrap();
        let meta = req.metadata.unwrap();
        assert_eq!(meta.kind.as_deref(), Some("medical"));
        assert!(meta.update_glossary);
        assert!(!meta.search_glossary);
    }

    #[test]
    fn test_flexible_numbers_in_metadata() {
        let req: ArticleRequest =
            serde_json::from_str(r#"{"topic":"asthma","metadata":{"maxResults":"3"}}"#).unwrap();
        assert_eq!(req.metadata.unwrap().max_results, Some(3));

        let req: LocationRequest =
            serde_json::from_str(r#"{"query":"clinic","metadata":{"zoom":15.0}}"#).unwrap();
        assert_eq!(req.metadata.unwrap().zoom, Some(15));

        let req: LocationRequest =
            serde_json::from_str(r#"{"query":"clinic","metadata":{"zoom":null}}"#).unwrap();
        assert_eq!(req.metadata.unwrap().zoom, None);
    }

    #[test]
    fn test_fractional_or_huge_numbers_are_rejected() {
        assert!(
            serde_json::from_str::<ArticleRequest>(r#"{"topic":"asthma","metadata":{"maxResults":2.7}}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<ArticleRequest>(r#"{"topic":"asthma","metadata":{"maxResults":1e12}}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<LocationRequest>(r#"{"query":"clinic","metadata":{"zoom":-1}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_gemini_response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]}}]}"#;
        let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Hello there"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_chat_response_serializes_camel_case() {
        let resp = ChatResponse {
            response: "ok".into(),
            tokens: 1,
            prompt: "p".into(),
            file_received: false,
            id: "chat-1".into(),
            glossary_terms: vec![],
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("fileReceived").is_some());
        assert!(value.get("glossaryTerms").is_some());
    }
}
