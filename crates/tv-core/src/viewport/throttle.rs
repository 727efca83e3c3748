use std::time::{Duration, Instant};

/// Leading-edge rate limiter with a single latest-wins slot.
///
/// A value offered after the interval has elapsed is released at once.
/// Anything offered earlier replaces whatever is pending; it is released by
/// [`Throttle::flush`] once the interval has passed. Nothing is queued.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Offer a value; returns it back when it may be forwarded right away
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.ready(now) {
            self.last_fired = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the pending value if the interval has elapsed
    pub fn flush(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.ready(now) {
            self.last_fired = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn discard_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offer_passes() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        assert_eq!(throttle.offer(1, Instant::now()), Some(1));
    }

    #[test]
    fn test_burst_keeps_only_latest() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(50));

        assert_eq!(throttle.offer(1, start), Some(1));
        assert_eq!(throttle.offer(2, start + Duration::from_millis(10)), None);
        assert_eq!(throttle.offer(3, start + Duration::from_millis(20)), None);

        // Too early
        assert_eq!(throttle.flush(start + Duration::from_millis(30)), None);
        assert_eq!(throttle.flush(start + Duration::from_millis(50)), Some(3));
        assert!(!throttle.has_pending());
        assert_eq!(throttle.flush(start + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_offer_after_interval_passes_immediately() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(50));

        throttle.offer("a", start);
        throttle.offer("b", start + Duration::from_millis(5));
        assert_eq!(throttle.offer("c", start + Duration::from_millis(60)), Some("c"));
        // "b" was superseded, not queued
        assert_eq!(throttle.flush(start + Duration::from_millis(500)), None);
    }
}
