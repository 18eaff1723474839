//! pairpose - blends two uploaded photos into one AI-generated portrait
//!
//! Ingests two photos, builds a deterministic instruction from a background
//! preset, an outfit flag and a pose choice, then asks Gemini's image model
//! to composite both people into a single photorealistic picture.

pub mod ai;
pub mod error;
pub mod ingest;
pub mod models;
pub mod prompts;
pub mod session;
pub mod share;

pub use error::{Error, Result};
