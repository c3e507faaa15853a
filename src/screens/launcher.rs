/// Launcher screen: a column of buttons

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::core::Notification;
use crate::utils::APP_TITLE;
use crate::widgets::{centered_rect, render_help, render_notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherAction {
    LaunchMonitor,
    Quit,
}

impl LauncherAction {
    pub fn label(&self) -> &'static str {
        match self {
            LauncherAction::LaunchMonitor => "Launch system monitor",
            LauncherAction::Quit => "Quit",
        }
    }

    pub fn all() -> &'static [LauncherAction] {
        &[LauncherAction::LaunchMonitor, LauncherAction::Quit]
    }
}

pub struct LauncherFrame<'a> {
    pub selected: usize,
    pub launched: usize,
    pub status: Option<&'a str>,
    pub notification: Option<&'a Notification>,
    pub show_help: bool,
}

const HELP: &[(&str, &str)] = &[
    ("[↑↓] / [Tab]", "Select a button"),
    ("[Enter]", "Activate the selected button"),
    ("[m]", "Launch the system monitor"),
    ("[?] / [F1]", "Toggle this help screen"),
    ("[q] / [Esc]", "Quit the launcher"),
];

const BUTTON_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, state: &LauncherFrame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Buttons
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} Launcher", APP_TITLE),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  monitors started: {}", state.launched),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let actions = LauncherAction::all();
    let column = centered_rect(40, BUTTON_HEIGHT * actions.len() as u16 + 2, chunks[1]);
    for (i, action) in actions.iter().enumerate() {
        let area = Rect {
            y: column.y + 1 + i as u16 * BUTTON_HEIGHT,
            height: BUTTON_HEIGHT,
            ..column
        };
        if area.bottom() > column.bottom() {
            break;
        }
        frame.render_widget(button(action.label(), i == state.selected), area);
    }

    let footer_text = state
        .status
        .map(str::to_string)
        .unwrap_or_else(|| "[↑↓] Select | [Enter] Activate | [?] Help | [q]uit".to_string());
    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(if state.status.is_some() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);

    if state.show_help {
        render_help(frame, "Launcher - Keyboard Shortcuts", HELP);
    }

    if let Some(notification) = state.notification {
        render_notification(frame, notification, 0);
    }
}

fn button(label: &str, selected: bool) -> Paragraph<'_> {
    let (style, border) = if selected {
        (
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            BorderType::Thick,
        )
    } else {
        (Style::default().fg(Color::White), BorderType::Plain)
    };

    Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_type(border))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &LauncherFrame) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_buttons_are_drawn() {
        let text = rendered(&LauncherFrame {
            selected: 0,
            launched: 0,
            status: None,
            notification: None,
            show_help: false,
        });
        assert!(text.contains("Launch system monitor"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn test_spawn_failure_popup() {
        let notification = Notification::new("Launch failed", "failed to start 'xterm'");
        let text = rendered(&LauncherFrame {
            selected: 0,
            launched: 0,
            status: Some("Launch failed"),
            notification: Some(&notification),
            show_help: false,
        });
        assert!(text.contains("failed to start 'xterm'"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|f| {
                render(
                    f,
                    &LauncherFrame {
                        selected: 1,
                        launched: 3,
                        status: None,
                        notification: None,
                        show_help: true,
                    },
                )
            })
            .unwrap();
    }
}
