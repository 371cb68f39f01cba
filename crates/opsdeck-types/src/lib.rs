//! OpsDeck Types - Canonical domain records for the admin dashboard
//!
//! This crate has zero dependencies on other opsdeck crates. It defines:
//!
//! - Directory records (users and their roles)
//! - Infrastructure records (resources, tasks)
//! - Activity records (log entries, notifications)
//! - Metric samples and the fixed-size sliding window that holds them
//! - Chat turns exchanged with the assistant
//!
//! All collections are insertion-ordered and live only in process memory.

pub mod chat;
pub mod error;
pub mod metrics;
pub mod records;

pub use chat::*;
pub use error::*;
pub use metrics::*;
pub use records::*;
