use std::time::Duration;

use tokio::time::{self, Instant, Interval};

use crate::app::store::models::RoomStatus;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    /// The clock reached zero, reported once per reset
    Expired,
}

/// Seconds left in the round as seen by this client only
#[derive(Debug, Clone)]
pub struct RoundClock {
    remaining: u32,
    expired: bool,
}

impl RoundClock {
    pub fn new(budget: u32) -> Self {
        Self {
            remaining: budget,
            expired: false,
        }
    }

    pub fn reset(&mut self, budget: u32) {
        self.remaining = budget;
        self.expired = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self, status: RoomStatus) -> bool {
        status == RoomStatus::Playing && self.remaining > 0
    }

    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 && !self.expired {
            self.expired = true;
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining)
        }
    }
}

/// Drives a [`RoundClock`] at one tick per second while a round is being played
pub struct RoundTimer {
    clock: RoundClock,
    interval: Option<Interval>,
}

impl RoundTimer {
    pub fn new(budget: u32) -> Self {
        Self {
            clock: RoundClock::new(budget),
            interval: None,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Restart the countdown; it only ticks again after the next [`RoundTimer::sync`]
    pub fn reset(&mut self, budget: u32) {
        self.clock.reset(budget);
        self.interval = None;
    }

    /// Start ticking when the round is being played, stop otherwise
    pub fn sync(&mut self, status: RoomStatus) {
        if !self.clock.is_running(status) {
            self.cancel();
        } else if self.interval.is_none() {
            self.interval = Some(time::interval_at(Instant::now() + TICK, TICK));
        }
    }

    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            tracing::debug!(remaining = self.clock.remaining(), "Round timer stopped");
        }
    }

    /// Wait for the next tick, never resolves while the timer is stopped
    ///
    /// Cancel safe, the clock only moves once the tick has elapsed
    pub async fn tick(&mut self) -> Tick {
        let Some(interval) = self.interval.as_mut() else {
            return std::future::pending().await;
        };

        interval.tick().await;
        let tick = self.clock.tick();
        if self.clock.remaining() == 0 {
            self.interval = None;
        }
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_expires_exactly_once() {
        let mut clock = RoundClock::new(2);

        assert_eq!(clock.tick(), Tick::Remaining(1));
        assert_eq!(clock.tick(), Tick::Expired);
        assert_eq!(clock.tick(), Tick::Remaining(0));
        assert_eq!(clock.remaining(), 0);

        clock.reset(1);
        assert_eq!(clock.tick(), Tick::Expired);
    }

    #[test]
    fn clock_runs_only_while_playing() {
        let clock = RoundClock::new(5);

        assert!(clock.is_running(RoomStatus::Playing));
        assert!(!clock.is_running(RoomStatus::Waiting));
        assert!(!clock.is_running(RoomStatus::Finished));
        assert!(!RoundClock::new(0).is_running(RoomStatus::Playing));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_counts_down_once_per_second() {
        let mut timer = RoundTimer::new(3);
        timer.sync(RoomStatus::Playing);
        let started = Instant::now();

        assert_eq!(timer.tick().await, Tick::Remaining(2));
        assert_eq!(timer.tick().await, Tick::Remaining(1));
        assert_eq!(timer.tick().await, Tick::Expired);

        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(!timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_never_ticks() {
        let mut timer = RoundTimer::new(3);
        timer.sync(RoomStatus::Playing);
        timer.sync(RoomStatus::Finished);

        let waited = time::timeout(Duration::from_secs(10), timer.tick()).await;
        assert!(waited.is_err());
        assert_eq!(timer.remaining(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_rearms_the_countdown() {
        let mut timer = RoundTimer::new(1);
        timer.sync(RoomStatus::Playing);
        assert_eq!(timer.tick().await, Tick::Expired);

        timer.reset(2);
        timer.sync(RoomStatus::Playing);
        assert_eq!(timer.tick().await, Tick::Remaining(1));
        assert_eq!(timer.tick().await, Tick::Expired);
    }
}
