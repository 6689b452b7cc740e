//! Simulation clock
//!
//! Simulated time is a single accumulated day count. Every angle in the
//! system is re-derived from it each frame, so changing the time scale only
//! changes how fast it grows.

use hifitime::{Duration, Epoch};

/// Accumulates simulated days from wall-clock frame deltas
pub struct SimulationClock {
    /// Simulated days since the clock started, never decreases
    accumulated_days: f64,
    /// Simulated days per real second
    time_scale: f64,
    /// Calendar date at `accumulated_days == 0`
    start_epoch: Epoch,
    paused: bool,
    frames: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::at_epoch(j2000())
    }

    /// Create with a calendar anchor for `epoch()`
    pub fn at_epoch(start_epoch: Epoch) -> Self {
        Self {
            accumulated_days: 0.0,
            time_scale: 1.0,
            start_epoch,
            paused: false,
            frames: 0,
        }
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.set_time_scale(time_scale);
        self
    }

    /// Simulated days elapsed
    pub fn days(&self) -> f64 {
        self.accumulated_days
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set simulated days per real second. Takes effect on the next update;
    /// the accumulated day count is left untouched.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        tracing::debug!("Time scale {} -> {}", self.time_scale, time_scale);
        self.time_scale = time_scale;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of updates applied so far (paused frames included)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by one frame of `frame_delta_seconds` real time.
    /// Returns the new day count.
    pub fn update(&mut self, frame_delta_seconds: f64) -> f64 {
        self.frames += 1;
        if self.paused {
            return self.accumulated_days;
        }

        let step = frame_delta_seconds * self.time_scale;
        // Negative or NaN steps would rewind the clock
        if step > 0.0 && step.is_finite() {
            self.accumulated_days += step;
        } else if step != 0.0 {
            tracing::debug!("Ignoring non-advancing clock step {}", step);
        }

        self.accumulated_days
    }

    /// Calendar date corresponding to the current day count
    pub fn epoch(&self) -> Epoch {
        self.start_epoch + Duration::from_days(self.accumulated_days)
    }

    pub fn start_epoch(&self) -> Epoch {
        self.start_epoch
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

/// 2000-01-01T12:00:00 UTC
pub fn j2000() -> Epoch {
    Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0)
}

/// Common time scales (simulated days per real second)
pub mod rates {
    pub const DAY_PER_SEC: f64 = 1.0;
    pub const WEEK_PER_SEC: f64 = 7.0;
    pub const MONTH_PER_SEC: f64 = 30.0;
    /// Upper end of the original time slider
    pub const SLIDER_MAX: f64 = 50.0;
    pub const YEAR_PER_SEC: f64 = 365.25;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_delta_times_scale() {
        let mut clock = SimulationClock::new().with_time_scale(10.0);
        clock.update(0.5);
        clock.update(0.25);
        assert!((clock.days() - 7.5).abs() < 1e-12);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn test_scale_change_is_continuous_and_immediate() {
        let mut clock = SimulationClock::new().with_time_scale(2.0);
        for _ in 0..10 {
            clock.update(0.1);
        }
        let before = clock.days();

        clock.set_time_scale(50.0);
        assert_eq!(clock.days(), before, "changing the scale must not jump");

        let after = clock.update(0.1);
        assert!(after >= before);
        assert!((after - before - 5.0).abs() < 1e-9, "new rate applies on the very next frame");
    }

    #[test]
    fn test_never_decreases() {
        let mut clock = SimulationClock::new().with_time_scale(3.0);
        let mut last = clock.update(1.0);

        for scale in [-5.0, 0.0, f64::NAN, 1e-9, 20.0] {
            clock.set_time_scale(scale);
            let now = clock.update(0.016);
            assert!(now >= last, "scale {scale} rewound the clock");
            last = now;
        }

        let now = clock.update(-1.0);
        assert!(now >= last);
    }

    #[test]
    fn test_pause_freezes_days() {
        let mut clock = SimulationClock::new().with_time_scale(rates::WEEK_PER_SEC);
        clock.update(1.0);
        clock.pause();
        clock.update(1.0);
        assert_eq!(clock.days(), 7.0);
        clock.resume();
        clock.update(1.0);
        assert_eq!(clock.days(), 14.0);
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.update(1.0);
        assert_eq!(clock.days(), 14.0);
    }

    #[test]
    fn test_epoch_tracks_days() {
        let mut clock = SimulationClock::new().with_time_scale(1.0);
        clock.update(2.0);
        let elapsed = clock.epoch() - clock.start_epoch();
        assert!((elapsed.to_seconds() - 2.0 * 86400.0).abs() < 1e-3);
    }
}
