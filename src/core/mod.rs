pub mod series;
pub mod provider;
pub mod network;
pub mod thresholds;
pub mod notify;
pub mod sampler;
pub mod spawner;
pub mod report;

pub use series::{MetricKind, MetricSeries, MetricsHistory, Reading, Sample, SharedHistory};
pub use provider::{MetricsProvider, SysinfoProvider};
pub use thresholds::{Level, Thresholds};
pub use notify::{ChannelNotifier, Notification, Notifier};
pub use sampler::{Sampler, SamplerHandle};
pub use spawner::{ChildExit, LaunchError, ProcessSpawner, TerminalSpawner};
pub use report::{ReportState, StatusReport};
