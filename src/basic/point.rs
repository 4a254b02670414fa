use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// A point (or vector) in world space, y is up
#[derive(Copy, Clone, Debug, Default, PartialEq, Add, AddAssign, Sub, SubAssign, Neg, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

impl Mul<Point> for f32 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        rhs * self
    }
}

impl Div<f32> for Point {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self { x: self.x / rhs, y: self.y / rhs, z: self.z / rhs }
    }
}

impl Point {
    pub const ZERO: Self = Self::new(0., 0., 0.);
    pub const X: Self = Self::new(1., 0., 0.);
    pub const UP: Self = Self::new(0., 1., 0.);
    pub const Z: Self = Self::new(0., 0., 1.);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane
    pub const fn xz(x: f32, z: f32) -> Self {
        Self { x, y: 0., z }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[must_use]
    pub fn magnitude_squared(self) -> f32 {
        self.dot(self)
    }

    #[must_use]
    pub fn magnitude(self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).magnitude()
    }

    /// Unit vector in the same direction, `None` for (near) zero vectors
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let magnitude = self.magnitude();
        if magnitude > f32::EPSILON {
            Some(self / magnitude)
        } else {
            None
        }
    }

    /// Same vector with the vertical component removed
    #[must_use]
    pub fn flattened(self) -> Self {
        Self { y: 0., ..self }
    }

    /// Linear interpolation, `t == 0` gives `self`, `t == 1` gives `other`
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Rodrigues rotation of `self` around a unit `axis`
    #[must_use]
    pub fn rotate_around(self, axis: Self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * axis.dot(self) * (1. - cos)
    }

    /// Rotate `self` towards the direction of `target` by at most
    /// `max_angle` radians, keeping the magnitude of `self`
    #[must_use]
    pub fn rotate_towards(self, target: Self, max_angle: f32) -> Self {
        let (Some(from), Some(to)) = (self.normalized(), target.normalized()) else {
            return self;
        };
        let magnitude = self.magnitude();

        let angle = from.dot(to).clamp(-1., 1.).acos();
        if angle <= max_angle {
            return to * magnitude;
        }

        // antiparallel vectors have no unique rotation plane,
        // all movement happens on the ground so turn around up
        let axis = from.cross(to).normalized().unwrap_or(Self::UP);
        from.rotate_around(axis, max_angle) * magnitude
    }

    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: f32) -> bool {
        self.distance(other) <= tolerance
    }
}

#[test]
fn test_rotate_towards_does_not_overshoot() {
    let from = Point::X;
    let to = Point::Z;

    let partial = from.rotate_towards(to, 0.1);
    let angle = partial.dot(from).clamp(-1., 1.).acos();
    assert!((angle - 0.1).abs() < 1e-5, "{angle}");
    assert!((partial.magnitude() - 1.).abs() < 1e-5);

    let full = from.rotate_towards(to, 10.);
    assert!(full.approx_eq(to, 1e-6), "{:?}", full);
}

#[test]
fn test_rotate_towards_antiparallel_stays_on_ground() {
    let turned = Point::X.rotate_towards(-Point::X, 0.5);
    assert!(turned.y.abs() < 1e-6, "{:?}", turned);
    assert!((turned.magnitude() - 1.).abs() < 1e-5);
}

#[test]
fn test_normalized_zero() {
    assert_eq!(Point::ZERO.normalized(), None);
    assert_eq!(Point::new(0., 3., 0.).normalized(), Some(Point::UP));
}
