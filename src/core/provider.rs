/// OS metrics provider
///
/// Every query refreshes only the subsystem it reads and reports absence as
/// `Reading::Unavailable` instead of failing.

use std::path::Path;
use sysinfo::{Components, Disks, Networks, ProcessRefreshKind, System};

use super::series::Reading;

/// Cumulative byte counters summed over all interfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCounters {
    pub sent: u64,
    pub received: u64,
}

/// A named temperature sensor and its current reading in °C
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSensor {
    pub label: String,
    pub reading: Reading,
}

#[cfg_attr(test, mockall::automock)]
pub trait MetricsProvider {
    fn cpu_percent(&mut self) -> Reading;
    fn memory_percent(&mut self) -> Reading;
    fn disk_percent(&mut self) -> Reading;
    fn network_counters(&mut self) -> Option<NetworkCounters>;
    fn temperatures(&mut self) -> Vec<TemperatureSensor>;
    fn process_count(&mut self) -> Reading;
}

/// `MetricsProvider` backed by the sysinfo crate
pub struct SysinfoProvider {
    system: System,
    disks: Disks,
    networks: Networks,
    components: Components,
    mount: &'static str,
}

impl SysinfoProvider {
    pub fn new(mount: &'static str) -> Self {
        let mut system = System::new();
        // CPU usage is a delta between two refreshes; prime the first one
        system.refresh_cpu();

        Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            mount,
        }
    }
}

impl MetricsProvider for SysinfoProvider {
    fn cpu_percent(&mut self) -> Reading {
        self.system.refresh_cpu();
        if self.system.cpus().is_empty() {
            return Reading::Unavailable;
        }
        Reading::from_f64(self.system.global_cpu_info().cpu_usage() as f64)
    }

    fn memory_percent(&mut self) -> Reading {
        self.system.refresh_memory();
        percent(self.system.used_memory(), self.system.total_memory())
    }

    fn disk_percent(&mut self) -> Reading {
        // Refresh the list so a late mount is picked up
        self.disks.refresh_list();
        self.disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new(self.mount))
            .map(|disk| {
                let total = disk.total_space();
                percent(total.saturating_sub(disk.available_space()), total)
            })
            .unwrap_or(Reading::Unavailable)
    }

    fn network_counters(&mut self) -> Option<NetworkCounters> {
        if self.networks.list().is_empty() {
            self.networks.refresh_list();
        } else {
            self.networks.refresh();
        }
        if self.networks.list().is_empty() {
            return None;
        }

        let counters = self.networks.list().iter().fold(
            NetworkCounters { sent: 0, received: 0 },
            |acc, (_name, data)| NetworkCounters {
                sent: acc.sent.saturating_add(data.total_transmitted()),
                received: acc.received.saturating_add(data.total_received()),
            },
        );
        Some(counters)
    }

    fn temperatures(&mut self) -> Vec<TemperatureSensor> {
        self.components.refresh();
        self.components
            .list()
            .iter()
            .map(|component| TemperatureSensor {
                label: component.label().to_string(),
                reading: Reading::from_f64(component.temperature() as f64),
            })
            .collect()
    }

    fn process_count(&mut self) -> Reading {
        self.system.refresh_processes_specifics(ProcessRefreshKind::new());
        Reading::Value(self.system.processes().len() as f64)
    }
}

fn percent(used: u64, total: u64) -> Reading {
    if total == 0 {
        return Reading::Unavailable;
    }
    Reading::from_f64(used as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(50, 200), Reading::Value(25.0));
        assert_eq!(percent(0, 0), Reading::Unavailable);
    }

    #[test]
    fn test_sysinfo_provider_never_panics() {
        let mut provider = SysinfoProvider::new("/");

        if let Reading::Value(cpu) = provider.cpu_percent() {
            assert!((0.0..=100.0).contains(&cpu));
        }
        if let Reading::Value(mem) = provider.memory_percent() {
            assert!((0.0..=100.0).contains(&mem));
        }
        let _ = provider.disk_percent();
        let _ = provider.network_counters();
        let _ = provider.temperatures();
        assert!(provider.process_count().is_available());
    }

    #[test]
    fn test_missing_mount_is_unavailable() {
        let mut provider = SysinfoProvider::new("/definitely/not/a/mount/point");
        assert_eq!(provider.disk_percent(), Reading::Unavailable);
    }
}
