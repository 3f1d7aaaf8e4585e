use std::time::Instant;

use shared::config::DT_CLAMP;

/// Frame timer for the simulation clock: one tick per rendered frame, with
/// the elapsed wall time clamped to the maximum step so a stalled window or
/// a debugger pause cannot produce a huge dt.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick, clamped to [`DT_CLAMP`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(DT_CLAMP)
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
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_reports_elapsed_time() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let dt = clock.tick();
        assert!(dt > 0.0);
        assert!(dt <= DT_CLAMP);
    }

    #[test]
    fn long_stall_is_clamped_to_max_step() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(80));
        let dt = clock.tick();
        assert_eq!(dt, DT_CLAMP);
    }
}
