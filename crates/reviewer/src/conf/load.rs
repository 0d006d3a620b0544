//! Load — model config from environment variables, plus validation.

use super::model::ModelConfig;

impl ModelConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay the `OPENAI_*` variables found through `lookup`.
    /// Blank values leave the current setting alone.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_blank("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = non_blank("OPENAI_API_URL") {
            self.api_url = url;
        }
        if let Some(model) = non_blank("OPENAI_MODEL") {
            self.model = model;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("model.api_url must not be empty".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("model.api_url must be an http(s) URL, got: {}", self.api_url));
        }
        if self.model.trim().is_empty() {
            return Err("model.model must not be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("model.temperature must be within 0.0..=2.0, got: {}", self.temperature));
        }
        Ok(())
    }
}
