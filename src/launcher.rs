/// Launcher TUI: starts monitors in their own terminal windows

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use crate::core::{ChildExit, Notification, ProcessSpawner, TerminalSpawner};
use crate::screens::launcher::{self as screen, LauncherAction, LauncherFrame};
use crate::tui;
use crate::utils::{AppConfig, EVENT_POLL_TIMEOUT};

pub struct Launcher<S: ProcessSpawner> {
    spawner: S,
    selected: usize,
    launched: usize,
    exits_rx: UnboundedReceiver<ChildExit>,
    notification: Option<Notification>,
    status: Option<String>,
    show_help: bool,
    should_quit: bool,
}

impl Launcher<TerminalSpawner> {
    pub fn new(config: &AppConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        let spawner = TerminalSpawner::for_monitor(config.launcher.terminal.clone()).with_exit_reports(tx);
        Self::with_spawner(spawner, rx)
    }
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn with_spawner(spawner: S, exits_rx: UnboundedReceiver<ChildExit>) -> Self {
        Self {
            spawner,
            selected: 0,
            launched: 0,
            exits_rx,
            notification: None,
            status: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = tui::enter()?;
        let result = self.run_loop(&mut terminal);
        tui::leave(&mut terminal)?;
        result
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.drain_exits();

            terminal.draw(|f| {
                screen::render(
                    f,
                    &LauncherFrame {
                        selected: self.selected,
                        launched: self.launched,
                        status: self.status.as_deref(),
                        notification: self.notification.as_ref(),
                        show_help: self.show_help,
                    },
                )
            })?;

            if event::poll(EVENT_POLL_TIMEOUT)? {
                if let Event::Key(key) = event::read()? {
                    if tui::is_press(&key) {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn drain_exits(&mut self) {
        while let Ok(exit) = self.exits_rx.try_recv() {
            self.status = Some(if exit.success {
                format!("Monitor (pid {}) closed", exit.pid)
            } else {
                format!("Monitor (pid {}) exited: {}", exit.pid, exit.description)
            });
        }
    }

    /// Start one more monitor; a failure stays inside the launcher
    fn launch(&mut self) {
        match self.spawner.spawn() {
            Ok(pid) => {
                self.launched += 1;
                self.status = Some(format!("Monitor started (pid {})", pid));
            }
            Err(e) => {
                tracing::error!("failed to launch monitor: {}", e);
                self.status = Some("Launch failed".to_string());
                self.notification = Some(Notification::new("Launch failed", e.to_string()));
            }
        }
    }

    fn activate(&mut self) {
        match LauncherAction::all()[self.selected] {
            LauncherAction::LaunchMonitor => self.launch(),
            LauncherAction::Quit => self.should_quit = true,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // An open popup takes the next key
        if self.notification.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.notification = None;
            } else if tui::is_quit(&key) {
                self.should_quit = true;
            }
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1) => self.show_help = false,
                _ if tui::is_quit(&key) => self.should_quit = true,
                _ => {}
            }
            return;
        }

        let count = LauncherAction::all().len();
        match key.code {
            KeyCode::Up | KeyCode::BackTab => self.selected = (self.selected + count - 1) % count,
            KeyCode::Down | KeyCode::Tab => self.selected = (self.selected + 1) % count,
            KeyCode::Enter => self.activate(),
            KeyCode::Char('m') => self.launch(),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.should_quit = true,
            _ if tui::is_quit(&key) => self.should_quit = true,
            _ => {}
        }
    }
}
