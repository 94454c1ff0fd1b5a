use glam::{Vec2, vec2};

/// Every constant the scene animation depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Distance from the origin on the x axis past which a moving entity turns around.
    pub bound: f32,
    /// Units per second, applied to both axes.
    pub speed: f32,
    pub dog_start: Vec2,
    pub dog_scale: f32,
    pub squirrel_start: Vec2,
    /// Degrees per second.
    pub squirrel_spin: f32,
    pub pulse: PulseConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    pub growth: f32,
    pub decay: f32,
    pub grow_frames: u32,
    pub shrink_frames: u32,
    pub timing: PulseTiming,
}

/// What a pulse "frame" is measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseTiming {
    /// One step per update call. The pulse lasts longer on slow machines.
    Frames,
    /// Progress advances by `dt * frames_per_second` virtual frames.
    WallClock { frames_per_second: f32 },
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bound: 4.0,
            speed: 1.0,
            dog_start: vec2(-0.75, -0.75),
            dog_scale: 1.5,
            squirrel_start: vec2(1.0, 1.0),
            squirrel_spin: 90.0,
            pulse: PulseConfig::default(),
        }
    }
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            growth: 1.01,
            decay: 0.99,
            grow_frames: 100,
            shrink_frames: 100,
            timing: PulseTiming::Frames,
        }
    }
}

impl PulseConfig {
    pub fn total_frames(&self) -> u32 {
        self.grow_frames + self.shrink_frames
    }
}
