//! Monotonic timing used by the warm-up and measurement loops.

use std::time::Instant;

/// Source of time marks with sub-millisecond resolution.
pub trait Clock {
    type Mark: Copy;

    fn now(&self) -> Self::Mark;

    /// Milliseconds elapsed since `mark`, with fractional precision.
    fn elapsed_ms(&self, mark: Self::Mark) -> f64;
}

/// Clock backed by `Instant`, unaffected by wall-clock adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Mark = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_ms(&self, mark: Instant) -> f64 {
        mark.elapsed().as_secs_f64() * 1e3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_elapsed_is_non_negative() {
        let clock = MonotonicClock;
        let mark = clock.now();
        assert!(clock.elapsed_ms(mark) >= 0.0);
    }

    #[test]
    fn test_elapsed_tracks_sleep() {
        let clock = MonotonicClock;
        let mark = clock.now();
        thread::sleep(Duration::from_millis(5));
        let elapsed = clock.elapsed_ms(mark);
        assert!(elapsed >= 5.0, "elapsed {} ms", elapsed);
    }
}
