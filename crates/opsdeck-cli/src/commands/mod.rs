//! Subcommand implementations

pub mod ask;
pub mod insight;
pub mod simulate;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while waiting on the backend
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
