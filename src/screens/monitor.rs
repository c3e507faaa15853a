/// Monitor screen: header with latest values, six chart panels, footer

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::{Level, MetricKind, MetricsHistory, Notification, Reading, Thresholds};
use crate::utils::{format_reading, APP_TITLE, PANELS};
use crate::widgets::{render_help, render_notification, render_panel, PanelView};

/// Everything one monitor frame is drawn from
pub struct MonitorFrame<'a> {
    pub history: &'a MetricsHistory,
    pub thresholds: &'a Thresholds,
    pub notification: Option<&'a Notification>,
    pub pending_alerts: usize,
    pub show_help: bool,
    pub status: Option<&'a str>,
    pub sampler_running: bool,
}

const HELP: &[(&str, &str)] = &[
    ("[r]", "Redraw charts now"),
    ("[Enter] / [Esc]", "Dismiss the current alert"),
    ("[?] / [F1]", "Toggle this help screen"),
    ("[q]", "Quit the monitor"),
];

pub struct MonitorScreen {
    title: String,
}

impl MonitorScreen {
    pub fn new() -> Self {
        Self {
            title: APP_TITLE.to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &MonitorFrame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title + latest values
                Constraint::Min(0),    // Charts
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        frame.render_widget(self.header(state), chunks[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[1]);

        for (row, pair) in rows.iter().zip(PANELS.chunks(2)) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row);

            for (cell, spec) in cells.iter().zip(pair) {
                let view = PanelView::build(*spec, state.history);
                render_panel(frame, *cell, &view);
            }
        }

        frame.render_widget(Self::footer(state), chunks[2]);

        if state.show_help {
            render_help(frame, "Monitor - Keyboard Shortcuts", HELP);
        }

        if let Some(notification) = state.notification {
            render_notification(frame, notification, state.pending_alerts);
        }
    }

    fn header(&self, state: &MonitorFrame) -> Paragraph<'_> {
        let history = state.history;
        let latest = |kind: MetricKind| history.latest(kind).unwrap_or(Reading::Unavailable);

        let level_color = |kind: MetricKind| match state.thresholds.level(kind, latest(kind)) {
            Level::Exceeded => Color::Red,
            Level::Elevated => Color::Yellow,
            Level::Normal => Color::Gray,
        };

        let value = |kind: MetricKind, color: Color| {
            Span::styled(
                format_reading(kind, latest(kind)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        };

        let title_line = Line::from(vec![
            Span::styled(
                self.title.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("CPU: ", Style::default().fg(Color::Gray)),
            value(MetricKind::Cpu, level_color(MetricKind::Cpu)),
            Span::raw(" | "),
            Span::styled("Mem: ", Style::default().fg(Color::Gray)),
            value(MetricKind::Memory, level_color(MetricKind::Memory)),
            Span::raw(" | "),
            Span::styled("Disk: ", Style::default().fg(Color::Gray)),
            value(MetricKind::Disk, Color::White),
            Span::raw(" | "),
            Span::styled("Net: ", Style::default().fg(Color::Gray)),
            value(MetricKind::NetSent, Color::Green),
            Span::raw(" up "),
            value(MetricKind::NetRecv, Color::LightBlue),
            Span::raw(" down | "),
            Span::styled("Temp: ", Style::default().fg(Color::Gray)),
            value(MetricKind::Temperature, Color::White),
            Span::raw(" | "),
            Span::styled("Procs: ", Style::default().fg(Color::Gray)),
            value(MetricKind::Processes, Color::White),
        ]);

        let limits_line = Line::from(Span::styled(
            format!(
                "Resource usage of this computer, sampled every second. Alerts above CPU {:.0}% / memory {:.0}%",
                state.thresholds.cpu_percent, state.thresholds.memory_percent
            ),
            Style::default().fg(Color::DarkGray),
        ));

        Paragraph::new(vec![title_line, limits_line])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn footer<'a>(state: &MonitorFrame<'a>) -> Paragraph<'a> {
        let (text, style) = match (state.status, state.sampler_running) {
            (Some(status), _) => (
                status.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            (None, false) => (
                "Sampler stopped - charts are frozen | [q]uit".to_string(),
                Style::default().fg(Color::Red),
            ),
            (None, true) => (
                "[r] Redraw | [?] Help | [Esc] Dismiss alert | [q]uit".to_string(),
                Style::default(),
            ),
        };

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL))
    }
}

impl Default for MonitorScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sample;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn history_with(samples: usize, temperature: Reading) -> MetricsHistory {
        let mut history = MetricsHistory::new(60);
        for i in 0..samples {
            history.record(&Sample {
                cpu: Reading::Value(10.0 + i as f64),
                memory: Reading::Value(45.0),
                disk: Reading::Value(60.0),
                network: (i > 0).then_some((Reading::Value(i as f64), Reading::Value(2.0 * i as f64))),
                temperature,
                processes: Reading::Value(200.0 + i as f64),
            });
        }
        history
    }

    fn draw(history: &MetricsHistory, notification: Option<&Notification>) -> Buffer {
        let screen = MonitorScreen::new();
        let thresholds = Thresholds::default();
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| {
                screen.render(
                    f,
                    &MonitorFrame {
                        history,
                        thresholds: &thresholds,
                        notification,
                        pending_alerts: 0,
                        show_help: false,
                        status: None,
                        sampler_running: true,
                    },
                )
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_is_idempotent() {
        let history = history_with(20, Reading::Value(50.0));
        assert_eq!(draw(&history, None), draw(&history, None));
    }

    #[test]
    fn test_render_tolerates_empty_and_single_sample() {
        let empty = text(&draw(&MetricsHistory::new(60), None));
        assert!(empty.contains("collecting data..."));

        let single = text(&draw(&history_with(1, Reading::Value(40.0)), None));
        assert!(single.contains("CPU usage"));
    }

    #[test]
    fn test_temperature_placeholder() {
        let rendered = text(&draw(&history_with(5, Reading::Unavailable), None));
        assert!(rendered.contains("data unavailable"));
    }

    #[test]
    fn test_notification_overlay() {
        let notification = Notification::new("High CPU usage", "CPU usage is 97.0% (threshold 80%)");
        let rendered = text(&draw(&history_with(3, Reading::Value(40.0)), Some(&notification)));
        assert!(rendered.contains("High CPU usage"));
    }
}
