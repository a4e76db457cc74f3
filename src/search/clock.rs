use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic millisecond deadline set by the controller before `search()` is entered, plus the
/// one-shot cancellation flag both recursive drivers poll every [`super::NODES_PER_TIME_CHECK`]
/// nodes. The flag only ever transitions false -> true within one search, so a plain relaxed
/// load/store is enough; no other memory ordering is required.
pub struct Clock {
    stop_time: Option<Instant>,
    infinite: bool,
    stopped: Arc<AtomicBool>,
}

impl Clock {
    pub fn infinite(stopped: Arc<AtomicBool>) -> Self {
        Self { stop_time: None, infinite: true, stopped }
    }

    pub fn until(deadline: Instant, stopped: Arc<AtomicBool>) -> Self {
        Self { stop_time: Some(deadline), infinite: false, stopped }
    }

    /// True once the deadline has passed or an external `stop` has been signalled.
    pub fn expired(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        !self.infinite && self.stop_time.is_some_and(|t| Instant::now() >= t)
    }

    pub fn signal_stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn stopped_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }
}

#[cfg(test)]
mod clock_tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn infinite_clock_never_expires_on_its_own() {
        let clock = Clock::infinite(Arc::new(AtomicBool::new(false)));
        assert!(!clock.expired());
    }

    #[test]
    fn expired_deadline_reports_expired() {
        let clock = Clock::until(Instant::now() - Duration::from_millis(1), Arc::new(AtomicBool::new(false)));
        assert!(clock.expired());
    }

    #[test]
    fn signal_stop_forces_expiry_even_before_the_deadline() {
        let clock = Clock::until(Instant::now() + Duration::from_secs(60), Arc::new(AtomicBool::new(false)));
        assert!(!clock.expired());
        clock.signal_stop();
        assert!(clock.expired());
    }
}
