/// One-shot metrics report for the `status` command

use serde::Serialize;

use super::series::{MetricKind, Reading, Sample};
use super::thresholds::{Level, Thresholds};
use crate::utils::format_reading;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportState {
    Ok,
    Elevated,
    Exceeded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub metric: &'static str,
    pub reading: Reading,
    pub display: String,
    pub unit: &'static str,
    pub threshold: Option<f64>,
    pub state: ReportState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub sampled_at: String,
    pub rows: Vec<ReportRow>,
}

impl StatusReport {
    pub fn from_sample(sample: &Sample, thresholds: &Thresholds) -> Self {
        let rows = MetricKind::all()
            .iter()
            .map(|&kind| {
                // The first network tick only records a baseline
                let reading = sample.reading(kind).unwrap_or(Reading::Unavailable);
                let state = if !reading.is_available() {
                    ReportState::Unavailable
                } else {
                    match thresholds.level(kind, reading) {
                        Level::Normal => ReportState::Ok,
                        Level::Elevated => ReportState::Elevated,
                        Level::Exceeded => ReportState::Exceeded,
                    }
                };
                ReportRow {
                    metric: kind.label(),
                    reading,
                    display: format_reading(kind, reading),
                    unit: kind.unit(),
                    threshold: thresholds.limit_for(kind),
                    state,
                }
            })
            .collect();

        Self {
            sampled_at: chrono::Local::now().to_rfc3339(),
            rows,
        }
    }

    pub fn exceeded(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.state == ReportState::Exceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sample {
        Sample {
            cpu: Reading::Value(91.0),
            memory: Reading::Value(70.0),
            disk: Reading::Value(40.0),
            network: Some((Reading::Value(2.0), Reading::Unavailable)),
            temperature: Reading::Unavailable,
            processes: Reading::Value(120.0),
        }
    }

    #[test]
    fn test_rows_cover_every_metric() {
        let report = StatusReport::from_sample(&sample(), &Thresholds::default());
        assert_eq!(report.rows.len(), MetricKind::all().len());

        let cpu = &report.rows[0];
        assert_eq!(cpu.state, ReportState::Exceeded);
        assert_eq!(cpu.threshold, Some(80.0));
        assert_eq!(report.exceeded().count(), 1);

        let memory = report.rows.iter().find(|r| r.metric == MetricKind::Memory.label()).unwrap();
        assert_eq!(memory.state, ReportState::Elevated);
    }

    #[test]
    fn test_missing_network_is_unavailable() {
        let mut sample = sample();
        sample.network = None;
        let report = StatusReport::from_sample(&sample, &Thresholds::default());
        let sent = report.rows.iter().find(|r| r.metric == MetricKind::NetSent.label()).unwrap();
        assert_eq!(sent.state, ReportState::Unavailable);
        assert_eq!(sent.display, "n/a");
    }

    #[test]
    fn test_json_shape() {
        let report = StatusReport::from_sample(&sample(), &Thresholds::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0]["state"], "exceeded");
        assert!(json["rows"][0]["threshold"].is_number());
    }
}
