pub mod config;
pub mod dispatch;
pub mod error;
pub mod glossary;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod records;
pub mod transport;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::handlers::Handlers;
use crate::transport::{GeminiTransport, Generator};

/// Handlers wired to the Gemini API as configured
pub fn gemini_handlers(cfg: Arc<Config>) -> Result<Handlers> {
    let transport = Arc::new(GeminiTransport::new(&cfg)?);
    Ok(Handlers::new(transport as Arc<dyn Generator>, cfg))
}
