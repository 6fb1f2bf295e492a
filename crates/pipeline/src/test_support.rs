//! Scripted provider stubs for the stage tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use llm_client::{ChatCompletion, CompletionRequest, LlmClientError};
use metadata_client::{MetadataClientError, MetadataProvider, TitleResponse};

/// Replies from a fixed script and records every request.
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, LlmClientError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String, LlmClientError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn failing(error: LlmClientError) -> Arc<Self> {
        Self::new(vec![Err(error)])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmClientError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmClientError::InvalidResponse("script exhausted".into())))
    }
}

/// Answers every lookup with the same result and records the titles.
pub struct FixedMetadata {
    result: Result<TitleResponse, MetadataClientError>,
    titles: Mutex<Vec<String>>,
}

impl FixedMetadata {
    pub fn new(result: Result<TitleResponse, MetadataClientError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            titles: Mutex::new(Vec::new()),
        })
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FixedMetadata {
    async fn fetch_by_title(&self, title: &str) -> Result<TitleResponse, MetadataClientError> {
        self.titles.lock().unwrap().push(title.to_string());
        self.result.clone()
    }
}

pub fn network_error() -> LlmClientError {
    LlmClientError::Transport {
        message: "connection refused".into(),
        network: true,
    }
}

pub fn found(title: &str, plot: &str, poster: &str, rating: &str) -> TitleResponse {
    TitleResponse {
        response: Some("True".into()),
        error: None,
        title: Some(title.into()),
        plot: Some(plot.into()),
        poster: Some(poster.into()),
        imdb_rating: Some(rating.into()),
    }
}
