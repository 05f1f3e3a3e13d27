//! Generation client for the Gemini multimodal API
//!
//! - [`types`]: request/response wire model
//! - [`prompts`]: deterministic prompt construction
//! - [`GenerationBackend`]: transport seam, with [`GeminiBackend`] over HTTP
//! - [`GenerationClient`]: styled composites and clothing item generation

mod backend;
mod client;
pub mod prompts;
pub mod types;

pub use backend::{GeminiBackend, GenerationBackend};
pub use client::{GeneratedItem, GenerationClient};
