//! OpsDeck LLM - Generative-text backend for the dashboard assistant
//!
//! This crate wraps the Google Gemini `generateContent` API behind the
//! [`LLMProvider`] trait and an [`LLMRouter`] that holds the configured
//! provider.
//!
//! ## Key Design Principles
//!
//! 1. The model may **propose** commands, it never mutates state itself
//! 2. One request per call: no retries, no streaming, no cancellation
//! 3. A missing credential yields a disabled router, never a panic

pub mod providers;
pub mod router;
pub mod types;

pub use providers::*;
pub use router::*;
pub use types::*;
