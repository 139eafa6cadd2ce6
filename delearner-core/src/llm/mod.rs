//! Generation backend integration
//!
//! The analysis client only sees [`GenerationBackend`]; [`GeminiBackend`] is the
//! production implementation.

pub mod errors;
pub mod gemini;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use errors::{LLMError, LLMResult};
pub use gemini::GeminiBackend;
pub use traits::GenerationBackend;
pub use types::{
    GenerationRequest, GenerationResponse, ModelInfo, ResponseFormat, SUPPORTED_MODELS, Usage,
    default_model,
};

#[cfg(test)]
pub use mock::MockBackend;
