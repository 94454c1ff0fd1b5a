use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Diagonal back-and-forth motion between `-bound` and `+bound` on the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub position: Vec2,
    pub direction: Direction,
    bound: f32,
    speed: f32,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl Bounce {
    pub fn new(position: Vec2, bound: f32, speed: f32) -> Self {
        Self {
            position,
            direction: Direction::Up,
            bound,
            speed,
        }
    }

    /// Turns around if the last step crossed the bound, then moves.
    /// Returns whether the direction flipped.
    pub fn step(&mut self, dt: f32) -> bool {
        let flipped = match self.direction {
            Direction::Up => self.position.x > self.bound,
            Direction::Down => self.position.x < -self.bound,
        };

        if flipped {
            self.direction = self.direction.reversed();
        }

        self.position += Vec2::splat(self.speed * self.direction.sign() * dt);

        flipped
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec2;

    use super::*;

    #[test]
    fn step_moves_diagonally_with_direction() {
        let mut bounce = Bounce::new(vec2(-0.75, -0.75), 4.0, 1.0);

        assert!(!bounce.step(0.5));
        assert_relative_eq!(bounce.position.x, -0.25);
        assert_relative_eq!(bounce.position.y, -0.25);

        bounce.direction = Direction::Down;
        assert!(!bounce.step(0.25));
        assert_relative_eq!(bounce.position.x, -0.5);
        assert_relative_eq!(bounce.position.y, -0.5);
    }

    #[test]
    fn flips_only_after_crossing_upper_bound() {
        let mut bounce = Bounce::new(vec2(4.0, 4.0), 4.0, 1.0);

        // exactly on the bound is not past it
        assert!(!bounce.step(0.125));
        assert_eq!(bounce.direction, Direction::Up);
        assert_relative_eq!(bounce.position.x, 4.125);

        assert!(bounce.step(0.125));
        assert_eq!(bounce.direction, Direction::Down);
        assert_relative_eq!(bounce.position.x, 4.0);
        assert_relative_eq!(bounce.position.y, 4.0);
    }

    #[test]
    fn flips_after_crossing_lower_bound() {
        let mut bounce = Bounce::new(vec2(-4.5, -4.5), 4.0, 1.0);
        bounce.direction = Direction::Down;

        assert!(bounce.step(0.25));
        assert_eq!(bounce.direction, Direction::Up);
        assert_relative_eq!(bounce.position.x, -4.25);
    }

    #[test]
    fn flip_is_a_single_toggle() {
        // far past the bound: turns once, then keeps heading back
        let mut bounce = Bounce::new(vec2(10.0, 10.0), 4.0, 1.0);

        assert!(bounce.step(1.0));
        assert!(!bounce.step(1.0));
        assert!(!bounce.step(1.0));
        assert_eq!(bounce.direction, Direction::Down);
        assert_relative_eq!(bounce.position.x, 7.0);
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut bounce = Bounce::new(vec2(1.0, 2.0), 4.0, 1.0);
        bounce.step(0.0);
        assert_eq!(bounce.position, vec2(1.0, 2.0));
    }
}
