use itertools::{Itertools, MinMaxResult};
use rand::Rng;
use tracing::{debug, info};

use crate::basic::{Point, Seconds};
use crate::error::{Error, ErrorConversion, Result};
use crate::snake::{self, GrowthEvent, Snake, SnakeId};
use crate::terrain::Terrain;

/// Length statistics over every snake in a herd
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LengthStats {
    pub count: usize,
    pub shortest: usize,
    pub longest: usize,
    pub total: usize,
}

/// Owns a group of snakes and drives them in spawn order
#[derive(Default)]
pub struct Herd {
    snakes: Vec<Snake>,
    next_id: u32,
}

impl Herd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a snake, the builder's `id` is always overwritten and a
    /// missing facing is picked at random
    pub fn spawn(
        &mut self,
        mut snake_builder: snake::Builder,
        terrain: &(impl Terrain + ?Sized),
        rng: &mut impl Rng,
    ) -> Result<SnakeId> {
        let id = SnakeId(self.next_id);
        snake_builder.id = Some(id);
        snake_builder.facing.get_or_insert_with(|| {
            let angle = rng.gen_range(0. ..std::f32::consts::TAU);
            Point::X.rotate_around(Point::UP, angle)
        });

        let snake = snake_builder
            .build(terrain, rng)
            .map_err(Error::from)
            .with_trace_step("Herd::spawn")?;

        self.next_id += 1;
        self.snakes.push(snake);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.snakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snakes.is_empty()
    }

    pub fn get(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|snake| snake.id() == id)
    }

    pub fn get_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|snake| snake.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snake> + '_ {
        self.snakes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Snake> + '_ {
        self.snakes.iter_mut()
    }

    pub fn tick(&mut self, dt: Seconds, terrain: &(impl Terrain + ?Sized)) {
        for snake in &mut self.snakes {
            snake.tick(dt, terrain);
        }
    }

    /// Route an event to the snake it concerns, returns the positions of
    /// any segments that were cut off
    pub fn apply(&mut self, id: SnakeId, event: GrowthEvent) -> Vec<Point> {
        match self.get_mut(id) {
            Some(snake) => snake.apply(event),
            None => {
                debug!(snake = %id, ?event, "event for an unknown snake");
                vec![]
            }
        }
    }

    /// The snake whose head is closest to `pos` on the ground plane
    pub fn closest_head(&self, pos: Point) -> Option<(SnakeId, f32)> {
        self.snakes
            .iter()
            .map(|snake| (snake.id(), snake.head_position().flattened().distance(pos.flattened())))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    pub fn length_stats(&self) -> LengthStats {
        let lengths = self.snakes.iter().map(Snake::active_len);
        let (shortest, longest) = match lengths.clone().minmax() {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(len) => (len, len),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        LengthStats {
            count: self.snakes.len(),
            shortest,
            longest,
            total: lengths.sum(),
        }
    }

    pub fn log_summary(&self) {
        let stats = self.length_stats();
        info!(
            snakes = stats.count,
            shortest = stats.shortest,
            longest = stats.longest,
            total = stats.total,
            "herd summary"
        );
    }
}
