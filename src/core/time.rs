//! Time provider abstraction for testable time-dependent logic

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;
use std::time::Instant;

/// Abstraction over the monotonic clock used to time scans
pub trait TimeProvider: Send + Sync {
    /// Get the current monotonic time (for measuring intervals)
    fn now(&self) -> Instant;
}

/// Production time provider using the actual monotonic clock
#[derive(Debug, Default, Clone)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Mock time provider for deterministic testing
///
/// Every call to `now()` returns the current mock instant and then advances
/// it by `step`, so two consecutive readings are exactly `step` apart.
#[derive(Clone)]
#[cfg(test)]
pub struct MockTimeProvider {
    current_instant: Arc<Mutex<Instant>>,
    step: Duration,
}

#[cfg(test)]
impl MockTimeProvider {
    pub fn new() -> Self {
        Self::ticking(Duration::ZERO)
    }

    /// Create a provider that advances by `step` on every reading
    pub fn ticking(step: Duration) -> Self {
        Self {
            current_instant: Arc::new(Mutex::new(Instant::now())),
            step,
        }
    }

    /// Advance the mock clock by the given duration
    pub fn advance_time(&self, duration: Duration) {
        let mut instant = self.current_instant.lock().unwrap();
        *instant += duration;
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> Instant {
        let mut instant = self.current_instant.lock().unwrap();
        let reading = *instant;
        *instant += self.step;
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_system_time_provider() {
        let provider = SystemTimeProvider;

        let instant1 = provider.now();
        std::thread::sleep(Duration::from_millis(1));
        let instant2 = provider.now();

        assert!(instant2 > instant1);
    }

    #[test]
    fn test_mock_time_provider_advance() {
        let provider = MockTimeProvider::new();

        let initial = provider.now();
        provider.advance_time(Duration::from_secs(10));
        let after = provider.now();

        assert_eq!(after.duration_since(initial), Duration::from_secs(10));
    }

    #[test]
    fn test_mock_time_provider_ticks_per_reading() {
        let provider = MockTimeProvider::ticking(Duration::from_millis(250));

        let first = provider.now();
        let second = provider.now();
        let third = provider.now();

        assert_eq!(second.duration_since(first), Duration::from_millis(250));
        assert_eq!(third.duration_since(first), Duration::from_millis(500));
    }
}
