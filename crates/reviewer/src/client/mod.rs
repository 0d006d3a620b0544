//! Model client — the seam between insight extraction and whatever
//! produces completions.
//!
//! - [`model::InsightModel`] is the object-safe trait the extractor holds.
//! - [`live::OpenAiClient`] talks to an OpenAI-compatible chat endpoint.
//! - [`fake::FakeModel`] is a scripted double for tests.

pub mod error;
pub mod fake;
pub mod live;
pub mod model;

pub use error::ModelError;
pub use live::OpenAiClient;
pub use model::{InsightModel, ModelFuture, ModelRequest};
