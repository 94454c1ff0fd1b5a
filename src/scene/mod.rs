mod bounce;
mod config;
mod pulse;
pub use bounce::*;
pub use config::*;
pub use pulse::*;

use glam::{Mat4, Vec3};

/// Both animated sprites and everything needed to move them.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub dog: Dog,
    pub squirrel: Squirrel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dog {
    pub motion: Bounce,
    scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Squirrel {
    pub motion: Bounce,
    /// Degrees.
    pub rotation: f32,
    pub pulse: Pulse,
    spin: f32,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            dog: Dog {
                motion: Bounce::new(config.dog_start, config.bound, config.speed),
                scale: config.dog_scale,
            },
            squirrel: Squirrel {
                motion: Bounce::new(config.squirrel_start, config.bound, config.speed),
                rotation: 0.0,
                pulse: Pulse::new(config.pulse),
                spin: config.squirrel_spin,
            },
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.dog.update(dt);
        self.squirrel.update(dt);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

impl Dog {
    pub fn update(&mut self, dt: f32) {
        if self.motion.step(dt) {
            log::debug!("dog turned {:?} at {}", self.motion.direction, self.motion.position);
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.motion.position.extend(0.0))
            * Mat4::from_scale(Vec3::new(self.scale, self.scale, 1.0))
    }
}

impl Squirrel {
    pub fn update(&mut self, dt: f32) {
        if self.motion.step(dt) {
            log::debug!(
                "squirrel turned {:?} at {}",
                self.motion.direction,
                self.motion.position
            );

            if self.pulse.trigger() {
                log::debug!("squirrel pulse started");
            }
        }

        self.rotation += self.spin * dt;
        self.pulse.advance(dt);
    }

    pub fn model_matrix(&self) -> Mat4 {
        let scale = self.pulse.scale();

        Mat4::from_translation(self.motion.position.extend(0.0))
            * Mat4::from_scale(Vec3::new(scale, scale, 1.0))
            * Mat4::from_rotation_z(self.rotation.to_radians())
    }
}
