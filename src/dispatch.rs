use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, ShimError};
use crate::handlers::Handlers;
use crate::models::ErrorEnvelope;

/// Request mode chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Chat,
    Articles,
    Locations,
    /// Extract glossary terms from a single web page
    Read,
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ShimError::InvalidRequest(format!("Malformed request body: {e}")))
}

/// Decode `body` for `mode`, run its handler and serialize the success envelope
pub async fn dispatch(handlers: &mut Handlers, mode: Mode, body: &str) -> Result<Value> {
    tracing::info!(?mode, bytes = body.len(), "Dispatching request");
    let envelope = match mode {
        Mode::Chat => serde_json::to_value(handlers.chat(parse_body(body)?).await?)?,
        Mode::Articles => serde_json::to_value(handlers.articles(parse_body(body)?).await?)?,
        Mode::Locations => serde_json::to_value(handlers.locations(parse_body(body)?).await?)?,
        Mode::Read => serde_json::to_value(handlers.read_article(parse_body(body)?).await?)?,
    };
    Ok(envelope)
}

pub fn error_envelope(err: &ShimError) -> ErrorEnvelope {
    let details = match err {
        ShimError::InvalidRequest(msg)
        | ShimError::Generation(msg)
        | ShimError::Parse(msg)
        | ShimError::Internal(msg) => msg.clone(),
        other => other.to_string(),
    };
    ErrorEnvelope {
        error: err.category().to_string(),
        details,
    }
}

/// Turn a request outcome into the single stdout line and the process exit status
pub fn render_outcome(outcome: Result<Value>) -> (String, u8) {
    match outcome {
        Ok(envelope) => (envelope.to_string(), 0),
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            let envelope = error_envelope(&e);
            let body = serde_json::json!({"error": envelope.error, "details": envelope.details});
            (body.to_string(), 1)
        }
    }
}
