/// User-facing warnings
///
/// Background code raises notifications through `Notifier`; the UI loop
/// drains the channel and shows the most recent one as a popup.

use chrono::{DateTime, Local};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub raised_at: DateTime<Local>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            raised_at: Local::now(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the UI loop
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(title = %notification.title, "{}", notification.message);
        // The receiver is gone once the UI is shutting down
        let _ = self.tx.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::new("first", "a"));
        notifier.notify(Notification::new("second", "b"));

        assert_eq!(rx.try_recv().unwrap().title, "first");
        assert_eq!(rx.try_recv().unwrap().title, "second");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_notify_after_receiver_dropped() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::new("late", "ignored"));
    }
}
