//! Conf module — model endpoint configuration and its env loading.

pub mod load;
pub mod model;

pub use model::ModelConfig;
