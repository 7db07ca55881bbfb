//! Fixed-rate tick pacing with a lower bound on the simulated rate.

use std::time::{Duration, Instant};

/// Decides when a field should tick and with which `dt`.
///
/// A tick is due once `1 / target_frame_rate` seconds have passed since the
/// previous one. Long stalls are not replayed: `dt` is capped at
/// `1 / min_frame_rate`.
#[derive(Clone, Debug)]
pub struct FrameClock {
    target_frame_rate: f32,
    min_frame_rate: f32,
    last_tick: Option<Instant>,
}

impl FrameClock {
    /// Clock aiming for `target_frame_rate` ticks per second.
    pub fn new(target_frame_rate: f32, min_frame_rate: f32) -> Self {
        Self {
            target_frame_rate,
            min_frame_rate,
            last_tick: None,
        }
    }

    /// Start measuring from `now` without ticking.
    pub fn reset(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Minimum interval between ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.target_frame_rate)
    }

    /// `Some(dt)` when a tick is due at `now`, recording `now` as the tick
    /// time. The first call only starts the clock.
    pub fn advance(&mut self, now: Instant) -> Option<f32> {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f32();
        if elapsed < 1.0 / self.target_frame_rate {
            return None;
        }
        self.last_tick = Some(now);
        let cap = 1.0 / self.min_frame_rate;
        if elapsed > cap {
            log::warn!("frame took {elapsed:.3}s, clamping dt to {cap:.3}s");
            return Some(cap);
        }
        Some(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_starts_clock() {
        let mut c = FrameClock::new(30.0, 16.0);
        let t0 = Instant::now();
        assert_eq!(c.advance(t0), None);
        assert_eq!(c.advance(t0 + Duration::from_millis(10)), None);
    }

    #[test]
    fn ticks_at_target_interval() {
        let mut c = FrameClock::new(30.0, 16.0);
        let t0 = Instant::now();
        c.reset(t0);
        let dt = c.advance(t0 + Duration::from_millis(40)).unwrap();
        assert!((dt - 0.040).abs() < 1e-4);
        // Interval restarts from the tick.
        assert_eq!(c.advance(t0 + Duration::from_millis(50)), None);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut c = FrameClock::new(30.0, 16.0);
        let t0 = Instant::now();
        c.reset(t0);
        let dt = c.advance(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(dt, 1.0 / 16.0);
    }

    #[test]
    fn interval_matches_target() {
        let c = FrameClock::new(20.0, 10.0);
        assert!((c.interval().as_secs_f64() - 0.05).abs() < 1e-6);
    }
}
