use rand::Rng;
use std::fmt::{Display, Formatter};
use tracing::{info, warn};

use crate::basic::Point;
use crate::config::Tuning;
use crate::snake::{InitialLength, Snake, SnakeId};
use crate::snake_control::{self, Controller};
use crate::terrain::Terrain;

#[derive(Debug, Error)]
#[must_use]
pub struct BuilderError(pub Box<Builder>, pub &'static str);

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "snake builder error: {}", self.1)?;
        if let Some(Err(err)) = self.0.tuning.as_ref().map(Tuning::validate) {
            writeln!(f, "cause: {}", err)?;
        }
        writeln!(f, "builder: {:?}", self.0)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Builder {
    pub id: Option<SnakeId>,
    /// Spawn position on the ground, the head is lifted above the terrain
    pub pos: Option<Point>,
    pub facing: Option<Point>,
    pub len: Option<InitialLength>,
    pub tuning: Option<Tuning>,
    pub controller: Option<snake_control::Template>,
}

impl Builder {
    #[inline(always)]
    #[must_use]
    pub fn id(mut self, value: SnakeId) -> Self {
        self.id = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn pos(mut self, value: Point) -> Self {
        self.pos = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn facing(mut self, value: Point) -> Self {
        self.facing = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn len(mut self, value: InitialLength) -> Self {
        self.len = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn tuning(mut self, value: Tuning) -> Self {
        self.tuning = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn controller(mut self, value: snake_control::Template) -> Self {
        self.controller = Some(value);
        self
    }

    pub fn build(&self, terrain: &(impl Terrain + ?Sized), rng: &mut impl Rng) -> Result<Snake, BuilderError> {
        let facing = self.checked_facing()?;
        let controller = self
            .controller
            .as_ref()
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `controller`"))?
            .clone()
            .into_controller(facing);
        self.build_with_controller(controller, terrain, rng)
    }

    /// Like `build` but with a controller that has no template
    pub fn build_with_controller(
        &self,
        controller: Box<dyn Controller + Send + Sync>,
        terrain: &(impl Terrain + ?Sized),
        rng: &mut impl Rng,
    ) -> Result<Snake, BuilderError> {
        let id = self
            .id
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `id`"))?;
        let pos = self
            .pos
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `pos`"))?;
        let facing = self.checked_facing()?;
        let len = self
            .len
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `len`"))?;

        let tuning = self.tuning.clone().unwrap_or_default();
        if let Err(err) = tuning.validate() {
            warn!("rejecting snake: {}", err);
            return Err(BuilderError(Box::new(self.clone()), "invalid tuning"));
        }

        let target_len = len.sample(rng);
        info!(snake = %id, ?pos, ?facing, target_len, "spawn snake");

        Ok(Snake::spawn(id, tuning, pos, facing, target_len, controller, terrain))
    }

    // snakes live on the ground plane, a vertical facing has no heading
    fn checked_facing(&self) -> Result<Point, BuilderError> {
        self.facing
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `facing`"))?
            .flattened()
            .normalized()
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "`facing` has no horizontal component"))
    }
}
