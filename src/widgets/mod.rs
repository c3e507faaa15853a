// Reusable ratatui building blocks shared by the monitor and launcher screens:
// - chart_panel: one line chart per metric group, with placeholders
// - popup: centered notification and help overlays
pub mod chart_panel;
pub mod popup;

pub use chart_panel::{render_panel, PanelState, PanelView};
pub use popup::{centered_rect, render_help, render_notification};
