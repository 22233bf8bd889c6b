use std::thread;
use std::time::Duration;

/// Sleep seam for the runner's fixed pauses (banner, splash, flash gap).
///
/// The wizard has no other notion of time: presence polling rides on the
/// event channel's receive timeout, so pausing is the only thing a clock is
/// asked to do. Test implementations return immediately.
pub trait Clock {
    fn sleep(&self, d: Duration);
}

/// Real clock backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleep_blocks_for_at_least_the_requested_duration() {
        let clock = MonotonicClock::new();
        let start = Instant::now();
        clock.sleep(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn zero_sleep_returns_immediately() {
        let clock = MonotonicClock::new();
        let start = Instant::now();
        clock.sleep(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
