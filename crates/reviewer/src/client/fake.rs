//! Fake — scripted [`InsightModel`] for deterministic tests.

use tokio::sync::Mutex;

use super::error::ModelError;
use super::model::{InsightModel, ModelFuture, ModelRequest};

/// What the fake answers with.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Empty,
    Fail(String),
}

/// A fake model that replays one canned reply and records every request.
pub struct FakeModel {
    name: String,
    reply: FakeReply,
    calls: Mutex<Vec<ModelRequest>>,
}

impl FakeModel {
    pub fn new(name: impl Into<String>, reply: FakeReply) -> Self {
        Self {
            name: name.into(),
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new("fake-model", FakeReply::Text(text.into()))
    }

    pub fn empty() -> Self {
        Self::new("fake-model", FakeReply::Empty)
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new("fake-model", FakeReply::Fail(reason.into()))
    }

    pub async fn calls(&self) -> Vec<ModelRequest> {
        self.calls.lock().await.clone()
    }
}

impl InsightModel for FakeModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn complete<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a> {
        Box::pin(async move {
            self.calls.lock().await.push(request.clone());
            match &self.reply {
                FakeReply::Text(text) => Ok(Some(text.clone())),
                FakeReply::Empty => Ok(None),
                FakeReply::Fail(reason) => Err(ModelError::Transport(reason.clone())),
            }
        })
    }
}
