use crate::basic::{Point, Seconds};

/// The direction the head is currently facing, turned gradually
/// towards whatever direction the controller asks for
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Heading {
    facing: Point,
}

impl Heading {
    /// Falls back to facing along x when `facing` is degenerate
    pub fn new(facing: Point) -> Self {
        Self {
            facing: facing.normalized().unwrap_or(Point::X),
        }
    }

    pub fn facing(&self) -> Point {
        self.facing
    }

    /// Angular speed in radians per second for a given ground speed
    pub fn angular_speed(speed: f32, turning_radius: f32) -> f32 {
        speed / turning_radius
    }

    /// Rotate towards `target` by at most `(speed / turning_radius) * dt`
    /// radians, never past it. A zero `target` leaves the facing unchanged.
    pub fn rotate_toward(&mut self, target: Point, speed: f32, turning_radius: f32, dt: Seconds) {
        let max_angle = Self::angular_speed(speed, turning_radius) * dt;
        self.facing = self.facing.rotate_towards(target, max_angle);
    }
}
