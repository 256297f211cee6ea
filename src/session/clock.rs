use std::time::{Duration, Instant};

/// Source of "now" for session timing.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Wall-clock session timer that excludes paused intervals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl SessionTimer {
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: Some(now),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_duration_since(paused_at);
        }
    }

    pub fn paused_total(&self) -> Duration {
        self.paused_total
    }

    /// Active time up to `now`; an ongoing pause is excluded too. Never
    /// negative.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let ongoing = self
            .paused_at
            .map(|p| now.saturating_duration_since(p))
            .unwrap_or_default();
        now.saturating_duration_since(started_at)
            .saturating_sub(self.paused_total)
            .saturating_sub(ongoing)
    }

    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        self.elapsed(now).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_unstarted_timer_is_zero() {
        let timer = SessionTimer::default();
        assert_eq!(timer.elapsed_ms(Instant::now()), 0);
    }

    #[test]
    fn test_pause_excluded_from_elapsed() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0);
        timer.resume(t0 + ms(5000));
        assert_eq!(timer.paused_total(), ms(5000));
        assert_eq!(timer.elapsed_ms(t0 + ms(6000)), 1000);
    }

    #[test]
    fn test_ongoing_pause_excluded() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0 + ms(2000));
        assert!(timer.is_paused());
        assert_eq!(timer.elapsed_ms(t0 + ms(9000)), 2000);
    }

    #[test]
    fn test_double_pause_keeps_first_timestamp() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0 + ms(1000));
        timer.pause(t0 + ms(3000));
        timer.resume(t0 + ms(4000));
        assert_eq!(timer.paused_total(), ms(3000));
    }

    #[test]
    fn test_clock_going_backwards_clamps_to_zero() {
        let t0 = Instant::now() + ms(10_000);
        let mut timer = SessionTimer::start(t0);
        timer.pause(t0 + ms(100));
        timer.resume(t0);
        assert_eq!(timer.paused_total(), Duration::ZERO);
        assert_eq!(timer.elapsed_ms(t0 - ms(500)), 0);
    }
}
