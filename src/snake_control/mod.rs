use serde::{Deserialize, Serialize};

use crate::basic::{Point, Seconds};
use programmed::{Move, Programmed};
use wander::Wander;

pub mod programmed;
pub mod wander;

/// What a controller gets to know about the snake it steers
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnakeView {
    pub head: Point,
    /// Where the head is facing right now (before this tick's turn)
    pub facing: Point,
    pub ground_speed: f32,
}

/// Decides where a snake wants to go, the snake itself decides how fast
/// it can turn there
pub trait Controller {
    /// Direction the head should turn towards, does not need to be
    /// normalized but should not be zero
    fn target_facing(&mut self, view: &SnakeView, dt: Seconds) -> Point;

    fn is_sprinting(&self) -> bool {
        false
    }

    /// A stopped snake does not move at all
    fn is_stopped(&self) -> bool {
        false
    }

    /// Forget any progress, the snake now faces `facing`
    fn reset(&mut self, _facing: Point) {}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Template {
    /// Keep going in the starting direction
    Straight,
    /// Never move
    Stopped,
    Programmed(Vec<Move>),
    Wander {
        seed: u64,
        /// Maximum random yaw change per tick, in degrees
        erraticness: f32,
        /// Snakes further than this from the origin get pushed back
        bounds_radius: Option<f32>,
    },
}

impl Template {
    /// Drive along the sides of a regular polygon
    pub fn demo_polygon_pattern(start_facing: Point, sides: usize, ticks_per_side: usize) -> Self {
        let sides = sides.max(3);
        let angle = std::f32::consts::TAU / sides as f32;
        let moves = (0..sides)
            .flat_map(|i| {
                let facing = start_facing.rotate_around(Point::UP, angle * i as f32);
                [Move::Turn(facing), Move::Wait(ticks_per_side)]
            })
            .collect();
        Self::Programmed(moves)
    }

    pub fn into_controller(self, start_facing: Point) -> Box<dyn Controller + Send + Sync> {
        match self {
            Template::Straight => Box::new(Programmed::new(vec![], start_facing)),
            Template::Stopped => {
                let mut programmed = Programmed::new(vec![], start_facing);
                programmed.stopped = true;
                Box::new(programmed)
            }
            Template::Programmed(move_sequence) => Box::new(Programmed::new(move_sequence, start_facing)),
            Template::Wander { seed, erraticness, bounds_radius } => {
                Box::new(Wander::new(seed, erraticness, bounds_radius, start_facing))
            }
        }
    }
}
