use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::Handlers;
use crate::config::Config;
use crate::error::{Result, ShimError};
use crate::transport::Generator;

/// Generator stub that replays canned replies in order and records every prompt
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: Vec<std::result::Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn ok(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl Generator for ScriptedTransport {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .push(prompt.to_string());
        let next = self
            .replies
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ShimError::Generation(message)),
            None => Err(ShimError::Generation("No more scripted replies".to_string())),
        }
    }
}

pub(crate) fn handlers_with(transport: Arc<ScriptedTransport>) -> Handlers {
    Handlers::new(transport, Arc::new(Config::default()))
}
