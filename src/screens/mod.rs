pub mod monitor;
pub mod launcher;

// Two full-screen views share the widgets module:
// - monitor: live charts for every metric plus alert popups
// - launcher: buttons that start the monitor in its own terminal window

pub use monitor::{MonitorFrame, MonitorScreen};
pub use launcher::{LauncherAction, LauncherFrame};
