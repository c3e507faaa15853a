/// Centered overlays: notifications and help

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::Notification;

/// Rect of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line>) {
    frame.render_widget(Clear, area);

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    format!(" {} ", title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().bg(Color::Black))
        .wrap(Wrap { trim: true });

    frame.render_widget(widget, area);
}

/// Warning popup; `pending` counts alerts raised since it was shown
pub fn render_notification(frame: &mut Frame, notification: &Notification, pending: usize) {
    let area = centered_rect(60, 8, frame.size());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("raised at {}", notification.raised_at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        )),
    ];
    if pending > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} more alert(s) since", pending),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[Enter] / [Esc] dismiss",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    render_overlay(frame, area, &notification.title, Color::Red, lines);
}

/// Keyboard help listing `(keys, description)` pairs
pub fn render_help(frame: &mut Frame, heading: &str, bindings: &[(&str, &str)]) {
    let height = bindings.len() as u16 + 6;
    let area = centered_rect(60, height, frame.size());

    let mut lines = vec![
        Line::from(Span::styled(
            heading.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        bindings
            .iter()
            .map(|(keys, description)| Line::from(format!("  {:<14} {}", keys, description))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press [?] or [Esc] to close this help",
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    )));

    render_overlay(frame, area, "Help", Color::Cyan, lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect { x: 0, y: 0, width: 100, height: 40 };
        assert_eq!(centered_rect(60, 10, area), Rect { x: 20, y: 15, width: 60, height: 10 });
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect { x: 5, y: 2, width: 30, height: 6 };
        assert_eq!(centered_rect(60, 10, area), area);
    }
}
