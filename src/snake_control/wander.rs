use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::basic::{Point, Seconds};
use crate::snake_control::{Controller, SnakeView};

const WANDER_WEIGHT: f32 = 1.;
const BOUNDARY_PUSH_WEIGHT: f32 = 4.;

/// Aimless steering, nudges a wander direction by a random yaw every tick
/// and steers a tracking velocity towards it
pub struct Wander {
    rng: StdRng,
    erraticness: f32,
    bounds_radius: Option<f32>,
    wander_dir: Point,
    tracking_velocity: Point,
}

impl Wander {
    pub fn new(seed: u64, erraticness: f32, bounds_radius: Option<f32>, facing: Point) -> Self {
        let facing = facing.flattened().normalized().unwrap_or(Point::X);
        Self {
            rng: StdRng::seed_from_u64(seed),
            erraticness: erraticness.abs().min(180.),
            bounds_radius,
            wander_dir: facing,
            tracking_velocity: facing,
        }
    }

    fn wander_force(&mut self, speed: f32) -> Point {
        let yaw = self.rng.gen_range(-self.erraticness..=self.erraticness).to_radians();
        self.wander_dir = self.wander_dir.rotate_around(Point::UP, yaw);
        self.wander_dir * speed - self.tracking_velocity
    }

    // pushes back towards the origin once outside the bounds
    fn boundary_force(&self, head: Point) -> Point {
        let Some(radius) = self.bounds_radius else {
            return Point::ZERO;
        };
        let offset = head.flattened();
        if offset.magnitude() <= radius {
            return Point::ZERO;
        }
        (-offset).normalized().unwrap_or(Point::ZERO)
    }
}

impl Controller for Wander {
    fn target_facing(&mut self, view: &SnakeView, dt: Seconds) -> Point {
        let acceleration = self.wander_force(view.ground_speed) * WANDER_WEIGHT
            + self.boundary_force(view.head) * (BOUNDARY_PUSH_WEIGHT * view.ground_speed);
        self.tracking_velocity += acceleration * dt;
        self.tracking_velocity = self.tracking_velocity.flattened();

        self.tracking_velocity.normalized().unwrap_or(view.facing)
    }

    fn reset(&mut self, facing: Point) {
        let facing = facing.flattened().normalized().unwrap_or(Point::X);
        self.wander_dir = facing;
        self.tracking_velocity = facing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(head: Point) -> SnakeView {
        SnakeView {
            head,
            facing: Point::X,
            ground_speed: 5.,
        }
    }

    #[test]
    fn stays_on_the_ground() {
        let mut wander = Wander::new(3, 30., None, Point::X);
        for _ in 0..100 {
            let target = wander.target_facing(&view(Point::ZERO), 0.05);
            assert!(target.y.abs() < 1e-6);
            assert!((target.magnitude() - 1.).abs() < 1e-4);
        }
    }

    #[test]
    fn calm_wander_goes_straight() {
        let mut wander = Wander::new(3, 0., None, Point::Z);
        for _ in 0..10 {
            assert!(wander.target_facing(&view(Point::ZERO), 0.05).approx_eq(Point::Z, 1e-5));
        }
    }

    #[test]
    fn same_seed_same_path() {
        let mut a = Wander::new(11, 45., None, Point::X);
        let mut b = Wander::new(11, 45., None, Point::X);
        for _ in 0..20 {
            assert_eq!(a.target_facing(&view(Point::ZERO), 0.05), b.target_facing(&view(Point::ZERO), 0.05));
        }
    }

    #[test]
    fn pushed_back_inside_bounds() {
        let mut wander = Wander::new(5, 0., Some(10.), Point::X);
        let outside = Point::xz(50., 0.);
        let mut target = Point::X;
        for _ in 0..200 {
            target = wander.target_facing(&view(outside), 0.05);
        }
        assert!(target.x < 0., "{:?}", target);
    }
}
