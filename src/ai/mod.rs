//! AI service integration for image composition
//!
//! Provides the interface to Gemini's generateContent image endpoint for
//! blending the two uploaded photos into one generated picture.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiComposeClient;
pub use mock::MockCompositionClient;

use crate::models::CompositionRequest;
use crate::Result;
use async_trait::async_trait;

/// Single-attempt image composition against an external generative service.
///
/// The caller validates upload completeness before invoking; implementations
/// do not re-check the payloads. Returns the raw bytes of the first
/// image-bearing response part.
#[async_trait]
pub trait CompositionService: Send + Sync {
    async fn compose(&self, request: &CompositionRequest) -> Result<Vec<u8>>;
}
