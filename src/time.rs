// src/time.rs
//! Frame timing.

use std::time::Instant;

/// Wall-clock frame timer. Deltas are clamped so a stall (debugger pause,
/// window drag) does not fire one enormous physics step.
pub struct FrameClock {
    last: Instant,
    max_delta: f32,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_delta: 0.25,
            frame: 0,
        }
    }

    /// Seconds since the previous tick, clamped to `max_delta`.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frame += 1;
        dt.min(self.max_delta)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tick_counts_frames_and_stays_non_negative() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(2));
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert!(dt <= 0.25);
        assert_eq!(clock.frame(), 1);
        clock.tick();
        assert_eq!(clock.frame(), 2);
    }
}
