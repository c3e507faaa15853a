/// Line-chart panel for one or more metric series
///
/// `PanelView::build` turns the history into plot data (pure, testable);
/// `render_panel` draws it. Nothing is cached between frames.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::core::MetricsHistory;
use crate::utils::{format_reading, format_tick, PanelSpec, YScale};

/// Relative padding added around auto-scaled data
const AUTO_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// No samples yet
    Collecting,
    /// Samples exist but none could be read
    Unavailable,
    Plot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineData {
    pub name: &'static str,
    pub color: Color,
    /// (seconds ago, value); the newest sample sits at x = 0
    pub points: Vec<(f64, f64)>,
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub spec: PanelSpec,
    pub state: PanelState,
    pub lines: Vec<LineData>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl PanelView {
    pub fn build(spec: PanelSpec, history: &MetricsHistory) -> Self {
        let lines: Vec<LineData> = spec
            .lines
            .iter()
            .map(|line| {
                let series = history.series(line.metric);
                let newest = series.len().saturating_sub(1) as f64;
                let points = series
                    .iter()
                    .enumerate()
                    .filter_map(|(i, reading)| reading.value().map(|v| (i as f64 - newest, v)))
                    .collect();
                let latest = series
                    .latest()
                    .map(|r| format_reading(line.metric, r))
                    .unwrap_or_else(|| "-".to_string());

                LineData { name: line.name, color: line.color, points, latest }
            })
            .collect();

        let any_samples = spec.lines.iter().any(|l| !history.series(l.metric).is_empty());
        let any_points = lines.iter().any(|l| !l.points.is_empty());
        let state = match (any_samples, any_points) {
            (false, _) => PanelState::Collecting,
            (true, false) => PanelState::Unavailable,
            (true, true) => PanelState::Plot,
        };

        let values = lines.iter().flat_map(|l| l.points.iter().map(|&(_, v)| v));
        let y_bounds = y_bounds(spec.scale, values);
        let span = history.capacity().saturating_sub(1).max(1) as f64;

        Self {
            spec,
            state,
            lines,
            x_bounds: [-span, 0.0],
            y_bounds,
        }
    }

    fn title(&self) -> String {
        let latest: Vec<String> = if self.lines.len() == 1 {
            vec![self.lines[0].latest.clone()]
        } else {
            self.lines.iter().map(|l| format!("{} {}", l.name, l.latest)).collect()
        };
        format!(" {}  {} ", self.spec.title, latest.join(" / "))
    }
}

/// Y range for a panel: fixed for percentages, data-driven otherwise
pub fn y_bounds(scale: YScale, values: impl Iterator<Item = f64>) -> [f64; 2] {
    if scale == YScale::Percent {
        return [0.0, 100.0];
    }

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let range = max - min;
    let margin = if range > f64::EPSILON {
        range * AUTO_MARGIN
    } else {
        (max.abs() * AUTO_MARGIN).max(1.0)
    };

    let lower = if min >= 0.0 { (min - margin).max(0.0) } else { min - margin };
    [lower, max + margin]
}

pub fn render_panel(frame: &mut Frame, area: Rect, view: &PanelView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            view.title(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    match view.state {
        PanelState::Collecting => render_placeholder(frame, area, block, "collecting data...", Color::DarkGray),
        PanelState::Unavailable => render_placeholder(frame, area, block, "data unavailable", Color::Yellow),
        PanelState::Plot => render_chart(frame, area, block, view),
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, block: Block, text: &str, color: Color) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }
    let line_area = Rect {
        y: inner.y + inner.height / 2,
        height: 1,
        ..inner
    };
    let placeholder = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(placeholder, line_area);
}

fn render_chart(frame: &mut Frame, area: Rect, block: Block, view: &PanelView) {
    let named = view.lines.len() > 1;
    let datasets: Vec<Dataset> = view
        .lines
        .iter()
        .map(|line| {
            // A lone point has no segment to draw
            let graph_type = if line.points.len() < 2 { GraphType::Scatter } else { GraphType::Line };
            let dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(line.color))
                .data(&line.points);
            if named {
                dataset.name(line.name)
            } else {
                dataset
            }
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    let [x_min, x_max] = view.x_bounds;
    let [y_min, y_max] = view.y_bounds;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("s")
                .style(axis_style)
                .bounds(view.x_bounds)
                .labels(vec![
                    Span::raw(format_tick(x_min)),
                    Span::raw(format_tick((x_min + x_max) / 2.0)),
                    Span::raw("now"),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(view.spec.y_label)
                .style(axis_style)
                .bounds(view.y_bounds)
                .labels(vec![
                    Span::raw(format_tick(y_min)),
                    Span::raw(format_tick((y_min + y_max) / 2.0)),
                    Span::raw(format_tick(y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Reading, Sample};
    use crate::utils::PANELS;

    fn panel(title: &str) -> PanelSpec {
        *PANELS.iter().find(|p| p.title == title).unwrap()
    }

    fn sample(cpu: f64, temperature: Reading, processes: f64) -> Sample {
        Sample {
            cpu: Reading::Value(cpu),
            memory: Reading::Value(30.0),
            disk: Reading::Value(70.0),
            network: Some((Reading::Value(1.0), Reading::Value(4.0))),
            temperature,
            processes: Reading::Value(processes),
        }
    }

    #[test]
    fn test_empty_history_is_collecting() {
        let history = MetricsHistory::new(60);
        for spec in PANELS {
            let view = PanelView::build(spec, &history);
            assert_eq!(view.state, PanelState::Collecting);
            assert!(view.lines.iter().all(|l| l.points.is_empty()));
        }
    }

    #[test]
    fn test_all_sentinel_temperature_is_unavailable() {
        let mut history = MetricsHistory::new(60);
        history.record(&sample(10.0, Reading::Unavailable, 100.0));
        history.record(&sample(12.0, Reading::Unavailable, 101.0));

        let view = PanelView::build(panel("Temperature"), &history);
        assert_eq!(view.state, PanelState::Unavailable);

        history.record(&sample(12.0, Reading::Value(45.0), 101.0));
        let view = PanelView::build(panel("Temperature"), &history);
        assert_eq!(view.state, PanelState::Plot);
        assert_eq!(view.lines[0].points, vec![(0.0, 45.0)]);
    }

    #[test]
    fn test_points_end_at_now() {
        let mut history = MetricsHistory::new(60);
        for cpu in [10.0, 20.0, 30.0] {
            history.record(&sample(cpu, Reading::Unavailable, 1.0));
        }

        let view = PanelView::build(panel("CPU usage"), &history);
        assert_eq!(view.lines[0].points, vec![(-2.0, 10.0), (-1.0, 20.0), (0.0, 30.0)]);
        assert_eq!(view.x_bounds, [-59.0, 0.0]);
        assert_eq!(view.y_bounds, [0.0, 100.0]);
    }

    #[test]
    fn test_auto_bounds_with_margin() {
        assert_eq!(y_bounds(YScale::Auto, [100.0, 200.0].into_iter()), [90.0, 210.0]);
        assert_eq!(y_bounds(YScale::Auto, [-10.0, 10.0].into_iter()), [-12.0, 12.0]);
    }

    #[test]
    fn test_auto_bounds_degenerate_inputs() {
        assert_eq!(y_bounds(YScale::Auto, std::iter::empty()), [0.0, 1.0]);
        // Flat series still gets a non-empty range
        assert_eq!(y_bounds(YScale::Auto, [5.0].into_iter()), [4.0, 6.0]);
        assert_eq!(y_bounds(YScale::Auto, [0.0, 0.0].into_iter()), [0.0, 1.0]);
    }

    #[test]
    fn test_network_panel_combines_lines() {
        let mut history = MetricsHistory::new(60);
        history.record(&sample(10.0, Reading::Unavailable, 1.0));

        let view = PanelView::build(panel("Network"), &history);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.state, PanelState::Plot);
        let [lo, hi] = view.y_bounds;
        assert!(lo <= 1.0 && hi >= 4.0);
        assert!(view.title().contains("sent") && view.title().contains("recv"));
    }
}
