/// Formatting helpers shared by the TUI screens and the status command

use crate::core::{MetricKind, Reading};

/// Format a reading with its unit, or "n/a"
pub fn format_reading(kind: MetricKind, reading: Reading) -> String {
    match reading.value() {
        None => "n/a".to_string(),
        Some(v) => match kind {
            MetricKind::Processes => format!("{:.0}", v),
            MetricKind::NetSent | MetricKind::NetRecv => format_rate(v),
            _ => format!("{:.1}{}", v, kind.unit()),
        },
    }
}

/// Format a KB/s rate, switching to MB/s above 1024 KB/s
pub fn format_rate(kb_per_sec: f64) -> String {
    if kb_per_sec >= 1024.0 {
        format!("{:.2} MB/s", kb_per_sec / 1024.0)
    } else {
        format!("{:.1} KB/s", kb_per_sec)
    }
}

/// Format an axis tick label, dropping decimals on large values
pub fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(MetricKind::Cpu, Reading::Value(12.345)), "12.3%");
        assert_eq!(format_reading(MetricKind::Temperature, Reading::Value(48.0)), "48.0°C");
        assert_eq!(format_reading(MetricKind::Processes, Reading::Value(312.0)), "312");
        assert_eq!(format_reading(MetricKind::Disk, Reading::Unavailable), "n/a");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.5), "0.5 KB/s");
        assert_eq!(format_rate(2048.0), "2.00 MB/s");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(50.0), "50");
        assert_eq!(format_tick(2.34), "2.3");
        assert_eq!(format_tick(123.4), "123");
    }
}
