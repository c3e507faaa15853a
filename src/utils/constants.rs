/// Fixed monitor constants and panel definitions
///
/// Sampling cadence and retained history length are deliberately not
/// configurable.

use ratatui::style::Color;
use std::time::Duration;

use crate::core::series::MetricKind;

/// Period of the background sampling loop
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Minimum time between two redraws driven by the UI loop
pub const RENDER_INTERVAL: Duration = Duration::from_millis(250);

/// Timeout for a single terminal event poll
pub const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Samples retained per metric (one minute at one sample per second)
pub const HISTORY_CAPACITY: usize = 60;

/// Filesystem whose utilization is charted
pub const DISK_MOUNT: &str = "/";

/// Bytes per kilobyte used for network rates
pub const BYTES_PER_KB: f64 = 1024.0;

pub const DEFAULT_CPU_THRESHOLD: f64 = 80.0;
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 80.0;

/// Fraction of a threshold at which the header turns yellow
pub const WARN_FRACTION: f64 = 0.75;

/// Command prefix used to open the monitor in its own terminal window
pub const DEFAULT_TERMINAL: &[&str] = &["x-terminal-emulator", "-e"];

/// Substrings identifying a CPU package temperature sensor, in priority order
pub const CPU_SENSOR_HINTS: &[&str] = &["coretemp", "package", "tctl", "tdie", "cpu"];

pub const APP_NAME: &str = "okr-monitor";
pub const APP_TITLE: &str = "Monitoring PRO";

/// Y axis behaviour of a chart panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YScale {
    /// Fixed 0-100 range
    Percent,
    /// Current min/max of the window plus a margin
    Auto,
}

/// One line drawn inside a panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLine {
    pub metric: MetricKind,
    pub name: &'static str,
    pub color: Color,
}

/// Static description of a chart panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    pub title: &'static str,
    pub y_label: &'static str,
    pub scale: YScale,
    pub lines: &'static [PanelLine],
}

/// Panels in display order (three rows of two)
pub const PANELS: [PanelSpec; 6] = [
    PanelSpec {
        title: "CPU usage",
        y_label: "%",
        scale: YScale::Percent,
        lines: &[PanelLine { metric: MetricKind::Cpu, name: "cpu", color: Color::Cyan }],
    },
    PanelSpec {
        title: "Memory usage",
        y_label: "%",
        scale: YScale::Percent,
        lines: &[PanelLine { metric: MetricKind::Memory, name: "memory", color: Color::Magenta }],
    },
    PanelSpec {
        title: "Disk usage",
        y_label: "%",
        scale: YScale::Percent,
        lines: &[PanelLine { metric: MetricKind::Disk, name: "disk", color: Color::Yellow }],
    },
    PanelSpec {
        title: "Network",
        y_label: "KB/s",
        scale: YScale::Auto,
        lines: &[
            PanelLine { metric: MetricKind::NetSent, name: "sent", color: Color::Green },
            PanelLine { metric: MetricKind::NetRecv, name: "recv", color: Color::LightBlue },
        ],
    },
    PanelSpec {
        title: "Temperature",
        y_label: "°C",
        scale: YScale::Auto,
        lines: &[PanelLine { metric: MetricKind::Temperature, name: "temp", color: Color::Red }],
    },
    PanelSpec {
        title: "Processes",
        y_label: "count",
        scale: YScale::Auto,
        lines: &[PanelLine { metric: MetricKind::Processes, name: "procs", color: Color::Blue }],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_metric_is_charted() {
        let charted: Vec<MetricKind> = PANELS
            .iter()
            .flat_map(|panel| panel.lines.iter().map(|line| line.metric))
            .collect();

        for kind in MetricKind::all() {
            assert!(charted.contains(kind), "{:?} has no panel", kind);
        }
    }

    #[test]
    fn test_percentage_panels() {
        let percent: Vec<&str> = PANELS
            .iter()
            .filter(|panel| panel.scale == YScale::Percent)
            .map(|panel| panel.title)
            .collect();
        assert_eq!(percent, vec!["CPU usage", "Memory usage", "Disk usage"]);
    }
}
