/// Rolling metric buffers shared between the sampler and the renderer

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of reading a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "value")]
pub enum Reading {
    Value(f64),
    Unavailable,
}

impl Reading {
    /// Wrap a raw value, treating NaN and infinities as unavailable
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Reading::Value(value)
        } else {
            Reading::Unavailable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map(Reading::from_f64).unwrap_or(Reading::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    NetSent,
    NetRecv,
    Temperature,
    Processes,
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Disk => "Disk",
            MetricKind::NetSent => "Net sent",
            MetricKind::NetRecv => "Net recv",
            MetricKind::Temperature => "Temperature",
            MetricKind::Processes => "Processes",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Cpu | MetricKind::Memory | MetricKind::Disk => "%",
            MetricKind::NetSent | MetricKind::NetRecv => "KB/s",
            MetricKind::Temperature => "°C",
            MetricKind::Processes => "",
        }
    }

    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::Cpu,
            MetricKind::Memory,
            MetricKind::Disk,
            MetricKind::NetSent,
            MetricKind::NetRecv,
            MetricKind::Temperature,
            MetricKind::Processes,
        ]
    }
}

/// Fixed-capacity FIFO of readings; the oldest sample is evicted first
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    samples: VecDeque<Reading>,
    capacity: usize,
}

impl MetricSeries {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, reading: Reading) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(reading);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<Reading> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Reading> + '_ {
        self.samples.iter().copied()
    }

    /// Available values in window order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(|r| r.value())
    }

    /// True when the window holds samples but none of them could be read
    pub fn all_unavailable(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(|r| !r.is_available())
    }
}

/// Readings collected in a single sampler tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub cpu: Reading,
    pub memory: Reading,
    pub disk: Reading,
    /// Sent/received KB/s; `None` while the first network baseline is taken
    pub network: Option<(Reading, Reading)>,
    pub temperature: Reading,
    pub processes: Reading,
}

impl Sample {
    /// Reading for one metric; `None` for network while baselining
    pub fn reading(&self, kind: MetricKind) -> Option<Reading> {
        match kind {
            MetricKind::Cpu => Some(self.cpu),
            MetricKind::Memory => Some(self.memory),
            MetricKind::Disk => Some(self.disk),
            MetricKind::NetSent => self.network.map(|(sent, _)| sent),
            MetricKind::NetRecv => self.network.map(|(_, recv)| recv),
            MetricKind::Temperature => Some(self.temperature),
            MetricKind::Processes => Some(self.processes),
        }
    }
}

/// One series per metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsHistory {
    cpu: MetricSeries,
    memory: MetricSeries,
    disk: MetricSeries,
    net_sent: MetricSeries,
    net_recv: MetricSeries,
    temperature: MetricSeries,
    processes: MetricSeries,
}

impl MetricsHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: MetricSeries::new(capacity),
            memory: MetricSeries::new(capacity),
            disk: MetricSeries::new(capacity),
            net_sent: MetricSeries::new(capacity),
            net_recv: MetricSeries::new(capacity),
            temperature: MetricSeries::new(capacity),
            processes: MetricSeries::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cpu.capacity()
    }

    pub fn series(&self, kind: MetricKind) -> &MetricSeries {
        match kind {
            MetricKind::Cpu => &self.cpu,
            MetricKind::Memory => &self.memory,
            MetricKind::Disk => &self.disk,
            MetricKind::NetSent => &self.net_sent,
            MetricKind::NetRecv => &self.net_recv,
            MetricKind::Temperature => &self.temperature,
            MetricKind::Processes => &self.processes,
        }
    }

    pub fn latest(&self, kind: MetricKind) -> Option<Reading> {
        self.series(kind).latest()
    }

    pub fn record(&mut self, sample: &Sample) {
        self.cpu.push(sample.cpu);
        self.memory.push(sample.memory);
        self.disk.push(sample.disk);
        if let Some((sent, recv)) = sample.network {
            self.net_sent.push(sent);
            self.net_recv.push(recv);
        }
        self.temperature.push(sample.temperature);
        self.processes.push(sample.processes);
    }
}

/// History handle shared by the sampler thread and the UI loop
#[derive(Debug, Clone)]
pub struct SharedHistory(Arc<Mutex<MetricsHistory>>);

impl SharedHistory {
    pub fn new(capacity: usize) -> Self {
        Self(Arc::new(Mutex::new(MetricsHistory::new(capacity))))
    }

    fn lock(&self) -> MutexGuard<'_, MetricsHistory> {
        // A panicking writer leaves whole samples behind, so the data stays usable
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, sample: &Sample) {
        self.lock().record(sample);
    }

    /// Copy of the current buffers; the lock is released before rendering
    pub fn snapshot(&self) -> MetricsHistory {
        self.lock().clone()
    }
}
