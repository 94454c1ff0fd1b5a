use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last: Instant,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();

        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the previous tick (or since creation).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn tick_measures_time_between_calls() {
        let mut time = Time::new();

        thread::sleep(Duration::from_millis(10));
        let first = time.tick();
        assert!(first >= 0.01);

        let second = time.tick();
        assert!(second >= 0.0);

        let elapsed = time.elapsed();
        assert!(elapsed >= first);
        assert!(time.elapsed() >= elapsed);
    }
}
