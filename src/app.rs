/// Monitor TUI application
///
/// The sampler thread writes into the shared history once per tick; this
/// loop redraws on its own cadence from a copy of that history.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::{
    ChannelNotifier, Notification, Sampler, SamplerHandle, SharedHistory, SysinfoProvider,
    Thresholds,
};
use crate::screens::{MonitorFrame, MonitorScreen};
use crate::tui;
use crate::utils::{AppConfig, DISK_MOUNT, EVENT_POLL_TIMEOUT, HISTORY_CAPACITY, RENDER_INTERVAL, TICK_INTERVAL};

// How long a footer status message stays visible
const STATUS_TTL: Duration = Duration::from_secs(3);

pub struct App {
    screen: MonitorScreen,
    history: SharedHistory,
    thresholds: Thresholds,
    sampler: Option<SamplerHandle>,
    notifications_rx: UnboundedReceiver<Notification>,
    notification: Option<Notification>,
    pending_alerts: usize,
    show_help: bool,
    should_quit: bool,
    redraw_requested: bool,
    last_render: Option<Instant>,
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Start sampling the local machine with the configured thresholds
    pub fn new(config: &AppConfig) -> Result<Self> {
        let history = SharedHistory::new(HISTORY_CAPACITY);
        let (notifier, notifications_rx) = ChannelNotifier::new();

        let sampler = Sampler::new(
            SysinfoProvider::new(DISK_MOUNT),
            notifier,
            config.thresholds,
            history.clone(),
        )
        .spawn(TICK_INTERVAL)?;

        Ok(Self::with_sampler(history, config.thresholds, notifications_rx, Some(sampler)))
    }

    pub fn with_sampler(
        history: SharedHistory,
        thresholds: Thresholds,
        notifications_rx: UnboundedReceiver<Notification>,
        sampler: Option<SamplerHandle>,
    ) -> Self {
        Self {
            screen: MonitorScreen::new(),
            history,
            thresholds,
            sampler,
            notifications_rx,
            notification: None,
            pending_alerts: 0,
            show_help: false,
            should_quit: false,
            redraw_requested: true,
            last_render: None,
            status_message: None,
        }
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn clear_expired_status(&mut self) {
        if let Some((_, since)) = &self.status_message {
            if since.elapsed() >= STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = match tui::enter() {
            Ok(terminal) => terminal,
            Err(e) => {
                self.shutdown().await;
                return Err(e);
            }
        };

        let result = self.run_loop(&mut terminal);

        // The sampler must be gone before the terminal is released
        self.shutdown().await;
        tui::leave(&mut terminal)?;

        result
    }

    fn run_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.drain_notifications();
            self.clear_expired_status();

            if self.render_due() {
                terminal.draw(|f| self.render(f))?;
                self.last_render = Some(Instant::now());
                self.redraw_requested = false;
            }

            if event::poll(EVENT_POLL_TIMEOUT)? {
                match event::read()? {
                    Event::Key(key) if tui::is_press(&key) => self.handle_key(key),
                    Event::Resize(_, _) => self.redraw_requested = true,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn render_due(&self) -> bool {
        self.redraw_requested
            || self
                .last_render
                .map_or(true, |at| at.elapsed() >= RENDER_INTERVAL)
    }

    /// Keep only the newest alert on screen, counting the ones it replaced
    fn drain_notifications(&mut self) {
        while let Ok(notification) = self.notifications_rx.try_recv() {
            if self.notification.is_some() {
                self.pending_alerts += 1;
            }
            self.notification = Some(notification);
            self.redraw_requested = true;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.redraw_requested = true;

        if tui::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Enter if self.notification.is_some() => {
                self.notification = None;
                self.pending_alerts = 0;
            }
            KeyCode::Esc if self.show_help => self.show_help = false,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Char('r') => self.set_status("Charts redrawn".to_string()),
            _ => {}
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        // Copy under the lock, draw without it
        let history = self.history.snapshot();

        self.screen.render(
            frame,
            &MonitorFrame {
                history: &history,
                thresholds: &self.thresholds,
                notification: self.notification.as_ref(),
                pending_alerts: self.pending_alerts,
                show_help: self.show_help,
                status: self.status_message.as_ref().map(|(m, _)| m.as_str()),
                sampler_running: self.sampler.as_ref().map_or(false, |s| s.is_running()),
            },
        );
    }

    /// Stop the sampler and wait for its thread
    pub async fn shutdown(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            if tokio::task::spawn_blocking(move || sampler.stop()).await.is_err() {
                tracing::error!("failed to join sampler thread");
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Early returns must not leave the sampler thread running
        if let Some(sampler) = self.sampler.take() {
            sampler.stop();
        }
    }
}
