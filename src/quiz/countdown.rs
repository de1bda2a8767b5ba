use std::time::{Duration, Instant};

/// One-second periodic schedule for the question timer. The event loop
/// polls it; it never fires on its own, so cancelling is just clearing the
/// next deadline.
#[derive(Clone, Debug)]
pub struct Countdown {
    period: Duration,
    next_fire: Option<Instant>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_fire = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Number of whole periods that elapsed up to `now`. Consumes them, so a
    /// second poll at the same instant returns 0.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_fire else {
            return 0;
        };
        let mut fired = 0;
        while now >= next {
            fired += 1;
            next += self.period;
        }
        self.next_fire = Some(next);
        fired
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_countdown_never_fires() {
        let mut countdown = Countdown::default();
        let now = Instant::now();
        assert_eq!(countdown.poll(now + Duration::from_secs(5)), 0);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_poll_counts_elapsed_periods() {
        let mut countdown = Countdown::default();
        let t0 = Instant::now();
        countdown.start(t0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(900)), 0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1000)), 1);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1500)), 0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(3200)), 2);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut countdown = Countdown::default();
        let t0 = Instant::now();
        countdown.start(t0);
        countdown.cancel();
        assert_eq!(countdown.poll(t0 + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut countdown = Countdown::default();
        let t0 = Instant::now();
        countdown.start(t0);
        countdown.start(t0 + Duration::from_millis(800));
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1500)), 0);
        assert_eq!(countdown.poll(t0 + Duration::from_millis(1800)), 1);
    }
}
