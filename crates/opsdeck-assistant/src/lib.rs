//! OpsDeck Assistant - Chat assistant and insight requests
//!
//! The assistant sends the operator's prompt, with the transcript so far,
//! to the configured backend and hands the reply to the interpreter.
//!
//! # Key Principle
//!
//! **The model may PROPOSE commands, the session store EXECUTES them.**
//!
//! Nothing here mutates session records directly. [`Assistant::converse`]
//! queues the prompt and the interpreted reply on the store, where the
//! dispatcher validates and applies any command.

pub mod assistant;
pub mod insight;
pub mod prompt;

pub use assistant::Assistant;
pub use insight::{InsightKind, LOG_SAMPLE_SIZE};
pub use prompt::*;
