//! Metric samples and the sliding window that retains them
//!
//! A window has a fixed capacity. Pushing past capacity drops the oldest
//! sample, so the window always holds the most recent samples in
//! chronological order.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of samples kept per series
pub const DEFAULT_WINDOW: usize = 10;

/// The synthetic series plotted on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Ram,
    Network,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Ram, MetricKind::Network];
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Ram => write!(f, "RAM"),
            Self::Network => write!(f, "Network"),
        }
    }
}

/// One point of a series: a wall-clock label and a percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Local time as `HH:MM:SS`
    pub label: String,
    pub value: u8,
}

impl MetricSample {
    pub fn new(label: impl Into<String>, value: u8) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Fixed-capacity, drop-oldest buffer of samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WindowParts")]
pub struct MetricWindow {
    capacity: usize,
    samples: VecDeque<MetricSample>,
}

/// Wire shape of a window; rebuilt through [`MetricWindow::new`]
#[derive(Deserialize)]
struct WindowParts {
    capacity: usize,
    #[serde(default)]
    samples: Vec<MetricSample>,
}

impl From<WindowParts> for MetricWindow {
    fn from(parts: WindowParts) -> Self {
        let mut window = Self::new(parts.capacity);
        for sample in parts.samples {
            window.push(sample);
        }
        window
    }
}

impl MetricWindow {
    /// Capacity is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: MetricSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MetricSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.back()
    }

    pub fn values(&self) -> Vec<u8> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

impl Default for MetricWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_keeps_most_recent_in_order() {
        let mut window = MetricWindow::new(10);
        for i in 0..25u8 {
            window.push(MetricSample::new(format!("t{i}"), i));
        }

        assert_eq!(window.len(), 10);
        assert_eq!(window.values(), (15..25).collect::<Vec<u8>>());
        assert_eq!(window.latest().map(|s| s.label.as_str()), Some("t24"));
    }

    #[test]
    fn test_window_below_capacity() {
        let mut window = MetricWindow::new(10);
        window.push(MetricSample::new("a", 1));
        window.push(MetricSample::new("b", 2));

        assert_eq!(window.len(), 2);
        assert_eq!(window.values(), vec![1, 2]);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut window = MetricWindow::new(0);
        window.push(MetricSample::new("a", 1));
        window.push(MetricSample::new("b", 2));

        assert_eq!(window.capacity(), 1);
        assert_eq!(window.values(), vec![2]);
    }

    #[test]
    fn test_deserialized_window_keeps_its_bound() {
        let json = r#"{"capacity": 0, "samples": [{"label": "a", "value": 1}, {"label": "b", "value": 2}]}"#;
        let mut window: MetricWindow = serde_json::from_str(json).unwrap();

        assert_eq!(window.capacity(), 1);
        assert_eq!(window.values(), vec![2]);

        window.push(MetricSample::new("c", 3));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_deserialized_window_drops_oldest_overflow() {
        let json = r#"{"capacity": 2, "samples": [
            {"label": "a", "value": 1}, {"label": "b", "value": 2}, {"label": "c", "value": 3}
        ]}"#;
        let window: MetricWindow = serde_json::from_str(json).unwrap();

        assert_eq!(window.values(), vec![2, 3]);
    }
}
