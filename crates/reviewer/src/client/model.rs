use std::future::Future;
use std::pin::Pin;

use super::error::ModelError;

/// One completion call: a system instruction, the user prompt and sampling
/// settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    /// Ask the endpoint to constrain its reply to a JSON object.
    pub json_response: bool,
}

/// Reply text, or `None` when the model answered with empty content.
pub type ModelFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<String>, ModelError>> + Send + 'a>>;

/// Anything that can answer a [`ModelRequest`].
///
/// Object-safe thanks to the boxed future so it can be shared as
/// `Arc<dyn InsightModel>` across request handlers.
pub trait InsightModel: Send + Sync {
    /// Identifier reported alongside insights produced by this model.
    fn model_name(&self) -> &str;

    fn complete<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a>;
}
