/// Static CPU and memory alert thresholds

use serde::{Deserialize, Serialize};

use super::notify::Notification;
use super::series::{MetricKind, Reading};
use crate::utils::{DEFAULT_CPU_THRESHOLD, DEFAULT_MEMORY_THRESHOLD, WARN_FRACTION};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_percent: DEFAULT_CPU_THRESHOLD,
            memory_percent: DEFAULT_MEMORY_THRESHOLD,
        }
    }
}

/// A metric reading strictly above its threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub metric: MetricKind,
    pub value: f64,
    pub threshold: f64,
}

impl Alert {
    pub fn to_notification(&self) -> Notification {
        Notification::new(
            format!("High {} usage", self.metric.label()),
            format!(
                "{} usage is {:.1}% (threshold {:.0}%)",
                self.metric.label(),
                self.value,
                self.threshold
            ),
        )
    }
}

/// Severity used for colouring the latest value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Normal,
    Elevated,
    Exceeded,
}

impl Thresholds {
    /// Error message for values outside (0, 100]
    pub fn validate(&self) -> Option<String> {
        for (name, value) in [("cpu_percent", self.cpu_percent), ("memory_percent", self.memory_percent)] {
            if !(value > 0.0 && value <= 100.0) {
                return Some(format!("{} must be within (0, 100], got {}", name, value));
            }
        }
        None
    }

    pub fn limit_for(&self, metric: MetricKind) -> Option<f64> {
        match metric {
            MetricKind::Cpu => Some(self.cpu_percent),
            MetricKind::Memory => Some(self.memory_percent),
            _ => None,
        }
    }

    /// One alert per metric whose latest reading is strictly above its limit
    pub fn check(&self, cpu: Reading, memory: Reading) -> Vec<Alert> {
        [(MetricKind::Cpu, cpu), (MetricKind::Memory, memory)]
            .into_iter()
            .filter_map(|(metric, reading)| {
                let value = reading.value()?;
                let threshold = self.limit_for(metric)?;
                (value > threshold).then_some(Alert { metric, value, threshold })
            })
            .collect()
    }

    pub fn level(&self, metric: MetricKind, reading: Reading) -> Level {
        match (reading.value(), self.limit_for(metric)) {
            (Some(value), Some(limit)) if value > limit => Level::Exceeded,
            (Some(value), Some(limit)) if value > limit * WARN_FRACTION => Level::Elevated,
            _ => Level::Normal,
        }
    }
}
