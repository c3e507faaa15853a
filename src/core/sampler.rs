/// Background sampling loop
///
/// Runs on its own OS thread because metric collection issues blocking
/// syscalls. The thread is the only writer of the shared history.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::network::NetworkRate;
use super::notify::Notifier;
use super::provider::{MetricsProvider, TemperatureSensor};
use super::series::{MetricKind, Reading, Sample, SharedHistory};
use super::thresholds::Thresholds;
use crate::utils::CPU_SENSOR_HINTS;

pub struct Sampler<P, N> {
    provider: P,
    notifier: N,
    thresholds: Thresholds,
    history: SharedHistory,
    network: NetworkRate,
}

impl<P: MetricsProvider, N: Notifier> Sampler<P, N> {
    pub fn new(provider: P, notifier: N, thresholds: Thresholds, history: SharedHistory) -> Self {
        Self {
            provider,
            notifier,
            thresholds,
            history,
            network: NetworkRate::new(),
        }
    }

    /// Collect one reading per metric, append it and evaluate thresholds
    pub fn sample_once(&mut self, now: Instant) -> Sample {
        let sample = Sample {
            cpu: self.provider.cpu_percent(),
            memory: self.provider.memory_percent(),
            disk: self.provider.disk_percent(),
            network: self.network.update(self.provider.network_counters(), now),
            temperature: pick_cpu_temperature(&self.provider.temperatures()),
            processes: self.provider.process_count(),
        };

        for &kind in MetricKind::all() {
            if sample.reading(kind) == Some(Reading::Unavailable) {
                tracing::debug!("{} unavailable this tick", kind.label());
            }
        }

        self.history.record(&sample);

        for alert in self.thresholds.check(sample.cpu, sample.memory) {
            self.notifier.notify(alert.to_notification());
        }

        sample
    }
}

impl<P, N> Sampler<P, N>
where
    P: MetricsProvider + Send + 'static,
    N: Notifier + Send + 'static,
{
    /// Move the sampler onto a dedicated thread ticking every `interval`
    pub fn spawn(mut self, interval: Duration) -> Result<SamplerHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = thread::Builder::new()
            .name("okr-sampler".to_string())
            .spawn(move || {
                tracing::info!(interval_ms = interval.as_millis() as u64, "sampler started");
                while flag.load(Ordering::Acquire) {
                    let started = Instant::now();
                    self.sample_once(started);
                    wait_until(started + interval, &flag);
                }
                tracing::info!("sampler stopped");
            })
            .context("Failed to spawn sampler thread")?;

        Ok(SamplerHandle { running, thread })
    }
}

/// Park until `deadline`, or earlier once `running` is cleared.
///
/// `park_timeout` may return spuriously, so the deadline is re-checked.
fn wait_until(deadline: Instant, running: &AtomicBool) {
    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::park_timeout(deadline - now);
    }
}

/// Owns the sampler thread; `stop` must run before the UI is torn down
pub struct SamplerHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl SamplerHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.thread.is_finished()
    }

    /// Request shutdown and wait for the current iteration to finish
    pub fn stop(self) {
        self.running.store(false, Ordering::Release);
        self.thread.thread().unpark();
        if self.thread.join().is_err() {
            tracing::error!("sampler thread panicked");
        }
    }
}

/// Pick the CPU package sensor, else the first readable one
pub fn pick_cpu_temperature(sensors: &[TemperatureSensor]) -> Reading {
    let available = || sensors.iter().filter(|s| s.reading.is_available());

    CPU_SENSOR_HINTS
        .iter()
        .find_map(|hint| {
            available().find(|sensor| sensor.label.to_lowercase().contains(hint))
        })
        .or_else(|| available().next())
        .map(|sensor| sensor.reading)
        .unwrap_or(Reading::Unavailable)
}
