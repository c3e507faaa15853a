/// Network throughput derived from cumulative byte counters

use std::time::Instant;

use super::provider::NetworkCounters;
use super::series::Reading;
use crate::utils::BYTES_PER_KB;

/// Remembers the previous counters so each tick can record a KB/s delta
#[derive(Debug, Default)]
pub struct NetworkRate {
    previous: Option<(NetworkCounters, Instant)>,
}

impl NetworkRate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest counters, returning (sent, received) KB/s.
    ///
    /// Returns `None` while a baseline is being established. Unavailable
    /// counters record `Unavailable` for both directions and drop the
    /// baseline; a counter that went backwards records `Unavailable` for that
    /// direction only.
    pub fn update(
        &mut self,
        counters: Option<NetworkCounters>,
        now: Instant,
    ) -> Option<(Reading, Reading)> {
        let Some(current) = counters else {
            self.previous = None;
            return Some((Reading::Unavailable, Reading::Unavailable));
        };

        let rates = self.previous.map(|(previous, then)| {
            let elapsed = now.saturating_duration_since(then).as_secs_f64();
            (
                rate(previous.sent, current.sent, elapsed),
                rate(previous.received, current.received, elapsed),
            )
        });

        self.previous = Some((current, now));
        rates
    }
}

fn rate(previous: u64, current: u64, elapsed_secs: f64) -> Reading {
    if elapsed_secs <= 0.0 {
        return Reading::Unavailable;
    }
    match current.checked_sub(previous) {
        Some(delta) => Reading::from_f64(delta as f64 / BYTES_PER_KB / elapsed_secs),
        None => Reading::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn counters(sent: u64, received: u64) -> Option<NetworkCounters> {
        Some(NetworkCounters { sent, received })
    }

    #[test]
    fn test_rates_one_tick_apart() {
        let t0 = Instant::now();
        let mut net = NetworkRate::new();

        assert_eq!(net.update(counters(1000, 4000), t0), None);
        assert_eq!(
            net.update(counters(1500, 6048), t0 + Duration::from_secs(1)),
            Some((Reading::Value(500.0 / 1024.0), Reading::Value(2.0)))
        );
        assert_eq!(
            net.update(counters(1700, 6048), t0 + Duration::from_secs(2)),
            Some((Reading::Value(200.0 / 1024.0), Reading::Value(0.0)))
        );
    }

    #[test]
    fn test_rate_uses_elapsed_interval() {
        let t0 = Instant::now();
        let mut net = NetworkRate::new();
        net.update(counters(0, 0), t0);

        let (sent, _) = net
            .update(counters(4096, 0), t0 + Duration::from_secs(2))
            .unwrap();
        assert_eq!(sent, Reading::Value(2.0));
    }

    #[test]
    fn test_counter_reset_is_unavailable() {
        let t0 = Instant::now();
        let mut net = NetworkRate::new();
        net.update(counters(5000, 5000), t0);

        let (sent, recv) = net
            .update(counters(100, 6024), t0 + Duration::from_secs(1))
            .unwrap();
        assert_eq!(sent, Reading::Unavailable);
        assert_eq!(recv, Reading::Value(1.0));

        // Baseline was re-established from the reset value
        let (sent, _) = net
            .update(counters(1124, 6024), t0 + Duration::from_secs(2))
            .unwrap();
        assert_eq!(sent, Reading::Value(1.0));
    }

    #[test]
    fn test_missing_counters_drop_baseline() {
        let t0 = Instant::now();
        let mut net = NetworkRate::new();
        net.update(counters(1000, 1000), t0);

        assert_eq!(
            net.update(None, t0 + Duration::from_secs(1)),
            Some((Reading::Unavailable, Reading::Unavailable))
        );
        assert_eq!(net.update(counters(9000, 9000), t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_zero_elapsed_is_unavailable() {
        let t0 = Instant::now();
        let mut net = NetworkRate::new();
        net.update(counters(0, 0), t0);
        assert_eq!(
            net.update(counters(10, 10), t0),
            Some((Reading::Unavailable, Reading::Unavailable))
        );
    }
}
