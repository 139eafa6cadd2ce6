//! Traits for generation backend implementations
//!
//! Every backend, remote or scripted, is reached through [`GenerationBackend`], so the
//! analysis client never depends on a concrete provider.

use super::errors::LLMError;
use super::types::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// Core trait for generation backends
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Produce text for a schema-constrained request
    ///
    /// Implementations must not retry; a failed call surfaces immediately.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LLMError>;
}
