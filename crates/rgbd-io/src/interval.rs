use std::time::{Duration, Instant};

/// Weight given to the running estimate when a new interval arrives.
const SMOOTHING: f32 = 0.9;

/// Exponentially smoothed measurement of the time between capture cycles.
pub struct FrameInterval {
    last: Option<Instant>,
    smoothed: Option<Duration>,
}

impl FrameInterval {
    /// Create an empty measurement.
    pub fn new() -> Self {
        Self {
            last: None,
            smoothed: None,
        }
    }

    /// Record the completion of one cycle.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last {
            let dt = now.duration_since(last);
            self.smoothed = Some(match self.smoothed {
                None => dt,
                Some(s) => s.mul_f32(SMOOTHING) + dt.mul_f32(1.0 - SMOOTHING),
            });
        }
        self.last = Some(now);
    }

    /// Get the smoothed interval, once at least two ticks have happened.
    #[inline]
    pub fn interval(&self) -> Option<Duration> {
        self.smoothed
    }

    /// Get the smoothed rate in cycles per second.
    pub fn rate(&self) -> Option<f32> {
        self.smoothed.and_then(|s| {
            let secs = s.as_secs_f32();
            (secs > 0.0).then(|| 1.0 / secs)
        })
    }
}

impl Default for FrameInterval {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameInterval;

    #[test]
    fn interval_needs_two_ticks() {
        let mut interval = FrameInterval::new();
        assert!(interval.interval().is_none());
        interval.tick();
        assert!(interval.interval().is_none());
        interval.tick();
        assert!(interval.interval().is_some());
    }

    #[test]
    fn rate_follows_interval() {
        let mut interval = FrameInterval::new();
        interval.tick();
        std::thread::sleep(std::time::Duration::from_millis(5));
        interval.tick();
        assert!(interval.rate().is_some_and(|r| r > 0.0));
    }
}
