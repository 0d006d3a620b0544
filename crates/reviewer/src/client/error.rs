use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Transport(String),
    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed model response: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelError::MalformedBody(err.to_string())
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}
