use crate::scene::{PulseConfig, PulseTiming};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseState {
    Idle,
    /// `frame` counts steps taken since the trigger.
    Growing { frame: f32 },
    Shrinking { frame: f32 },
}

/// Scale overshoot that plays once after each trigger and settles back to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    config: PulseConfig,
    state: PulseState,
    scale: f32,
}

impl Pulse {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            state: PulseState::Idle,
            scale: 1.0,
        }
    }

    pub fn state(&self) -> PulseState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_active(&self) -> bool {
        self.state != PulseState::Idle
    }

    /// Starts a pulse and returns `true`, or returns `false` while one is already playing.
    pub fn trigger(&mut self) -> bool {
        if self.is_active() {
            return false;
        }

        self.state = PulseState::Growing { frame: 0.0 };
        true
    }

    /// Advances the pulse by one update and returns the new scale.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = match self.config.timing {
            PulseTiming::Frames => 1.0,
            PulseTiming::WallClock { frames_per_second } => dt * frames_per_second,
        };

        let grow_frames = self.config.grow_frames as f32;
        let total_frames = self.config.total_frames() as f32;

        self.state = match self.state {
            PulseState::Idle => PulseState::Idle,

            PulseState::Growing { frame } | PulseState::Shrinking { frame }
                if frame >= total_frames =>
            {
                self.scale = 1.0;
                log::debug!("squirrel pulse finished");
                PulseState::Idle
            }

            PulseState::Growing { frame } | PulseState::Shrinking { frame } => {
                self.scale = match self.config.timing {
                    PulseTiming::Frames if frame < grow_frames => self.scale * self.config.growth,
                    PulseTiming::Frames => self.scale * self.config.decay,
                    PulseTiming::WallClock { .. } => self.scale_at(frame + step),
                };

                let next = frame + step;
                if next < grow_frames {
                    PulseState::Growing { frame: next }
                } else {
                    PulseState::Shrinking { frame: next }
                }
            }
        };

        self.scale
    }

    fn scale_at(&self, frame: f32) -> f32 {
        let grow_frames = self.config.grow_frames as f32;
        let total_frames = self.config.total_frames() as f32;

        let grown = frame.clamp(0.0, grow_frames);
        let shrunk = (frame.min(total_frames) - grow_frames).max(0.0);

        self.config.growth.powf(grown) * self.config.decay.powf(shrunk)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn idle_pulse_keeps_unit_scale() {
        let mut pulse = Pulse::new(PulseConfig::default());

        for _ in 0..10 {
            assert_eq!(pulse.advance(0.016), 1.0);
        }
        assert_eq!(pulse.state(), PulseState::Idle);
    }

    #[test]
    fn frame_pulse_grows_then_shrinks_then_resets() {
        let mut pulse = Pulse::new(PulseConfig::default());
        assert!(pulse.trigger());

        let mut previous = pulse.scale();
        for frame in 0..100 {
            let scale = pulse.advance(0.016);
            assert!(scale > previous, "frame {frame} did not grow");
            previous = scale;
        }
        assert_eq!(pulse.state(), PulseState::Shrinking { frame: 100.0 });
        assert_relative_eq!(previous, 1.01f32.powi(100), max_relative = 1e-4);

        for frame in 100..200 {
            let scale = pulse.advance(0.016);
            assert!(scale < previous, "frame {frame} did not shrink");
            previous = scale;
        }
        assert!(pulse.is_active());

        assert_eq!(pulse.advance(0.016), 1.0);
        assert_eq!(pulse.state(), PulseState::Idle);

        // settled pulses can be started again
        assert!(pulse.trigger());
    }

    #[test]
    fn frame_pulse_ignores_dt() {
        let mut fast = Pulse::new(PulseConfig::default());
        let mut slow = Pulse::new(PulseConfig::default());
        fast.trigger();
        slow.trigger();

        for _ in 0..50 {
            fast.advance(0.001);
            slow.advance(0.5);
        }
        assert_eq!(fast, slow);
    }

    #[test]
    fn trigger_during_pulse_does_not_restart() {
        let mut pulse = Pulse::new(PulseConfig::default());
        pulse.trigger();

        for _ in 0..30 {
            pulse.advance(0.016);
        }
        assert!(!pulse.trigger());
        assert_eq!(pulse.state(), PulseState::Growing { frame: 30.0 });
    }

    #[test]
    fn wall_clock_pulse_lasts_the_same_time_at_any_frame_rate() {
        let config = PulseConfig {
            timing: PulseTiming::WallClock {
                frames_per_second: 60.0,
            },
            ..PulseConfig::default()
        };

        for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0] {
            let mut pulse = Pulse::new(config);
            pulse.trigger();

            let mut elapsed = 0.0;
            while pulse.is_active() {
                pulse.advance(dt);
                elapsed += dt;
                assert!(elapsed < 4.0, "pulse never finished at dt {dt}");
            }

            // 200 virtual frames at 60 fps, plus the resetting update
            assert!(elapsed >= 200.0 / 60.0);
            assert!(elapsed <= 200.0 / 60.0 + 2.0 * dt + 1e-3);
            assert_eq!(pulse.scale(), 1.0);
        }
    }

    #[test]
    fn wall_clock_scale_peaks_at_grow_frames() {
        let config = PulseConfig {
            timing: PulseTiming::WallClock {
                frames_per_second: 100.0,
            },
            ..PulseConfig::default()
        };
        let mut pulse = Pulse::new(config);
        pulse.trigger();

        assert_relative_eq!(pulse.advance(0.5), 1.01f32.powf(50.0), max_relative = 1e-5);
        assert_relative_eq!(pulse.advance(0.5), 1.01f32.powf(100.0), max_relative = 1e-5);
        assert_relative_eq!(
            pulse.advance(0.5),
            1.01f32.powf(100.0) * 0.99f32.powf(50.0),
            max_relative = 1e-5
        );
    }
}
