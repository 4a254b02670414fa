use static_assertions::assert_impl_all;
use tracing::{debug, warn};

use crate::basic::{Point, Seconds};
use crate::config::Tuning;
use crate::snake_control::{Controller, SnakeView};
use crate::terrain::Terrain;

pub use body::{slot_to_visual, visual_to_slot, Body, Segment, SegmentId};
pub use builder::{Builder, BuilderError};
pub use growth::{GrowthEvent, InitialLength};
pub use heading::Heading;
pub use path::{PathHistory, PathSample};
pub use scale::{target_scale, Scale};

pub mod body;
pub mod builder;
pub mod growth;
pub mod heading;
pub mod path;
pub mod scale;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Display)]
pub struct SnakeId(pub u32);

/// A snake whose body follows the path its head has travelled
pub struct Snake {
    tuning: Tuning,
    body: Body,
    path: PathHistory,
    heading: Heading,
    scale: Scale,
    /// Length of the link between the head and the segment behind it,
    /// grows from 0 to `link_length` before another segment is added
    growth_link_len: f32,
    controller: Box<dyn Controller + Send + Sync>,
}

// a host may keep its snakes behind a lock or move them to another thread,
// ticking itself stays single-threaded
assert_impl_all!(Snake: Send, Sync);

/// Head and tail of a freshly placed snake, the head on the ground at
/// `ground_pos` and the tail one link behind it
fn spawn_pose(
    ground_pos: Point,
    facing: Point,
    scale: f32,
    link_length: f32,
    terrain: &(impl Terrain + ?Sized),
) -> (Segment, Segment) {
    let above_ground = |p: Point| Point {
        y: terrain.height_at(p.x, p.z) + scale * 0.5,
        ..p
    };

    let head_pos = above_ground(ground_pos);
    let tail_pos = above_ground(head_pos - facing * link_length);

    let head = Segment {
        pos: head_pos,
        facing,
        scale,
        active: true,
    };
    let tail = Segment {
        pos: tail_pos,
        facing: (head_pos - tail_pos).normalized().unwrap_or(facing),
        ..head
    };
    (head, tail)
}

impl Snake {
    pub(crate) fn spawn(
        id: SnakeId,
        tuning: Tuning,
        ground_pos: Point,
        facing: Point,
        target_len: usize,
        controller: Box<dyn Controller + Send + Sync>,
        terrain: &(impl Terrain + ?Sized),
    ) -> Self {
        let heading = Heading::new(facing.flattened());
        let scale = Scale::new(tuning.scale_rate, tuning.epsilon);
        let link_length = scale.current() + tuning.link_length_offset;
        let (head, tail) = spawn_pose(ground_pos, heading.facing(), scale.current(), link_length, terrain);

        let mut path = PathHistory::new(&tuning);
        path.restart(tail.pos, head.pos);

        debug!(snake = %id, head_pos = ?head.pos, target_len, "spawned");

        Self {
            body: Body::new(id, head, tail, target_len, tuning.initial_capacity),
            path,
            heading,
            scale,
            growth_link_len: head.pos.distance(tail.pos),
            controller,
            tuning,
        }
    }

    /// Start over at `ground_pos` with only a head and a tail, as if just
    /// spawned. The target length is kept so the body grows back.
    pub fn restart(&mut self, ground_pos: Point, facing: Point, terrain: &(impl Terrain + ?Sized)) {
        self.heading = Heading::new(facing.flattened());
        self.scale = Scale::new(self.tuning.scale_rate, self.tuning.epsilon);
        let (head, tail) = spawn_pose(
            ground_pos,
            self.heading.facing(),
            self.scale.current(),
            self.link_length(),
            terrain,
        );

        self.body.reset(head, tail);
        self.path.restart(tail.pos, head.pos);
        self.growth_link_len = head.pos.distance(tail.pos);
        self.controller.reset(self.heading.facing());

        debug!(snake = %self.id(), head_pos = ?head.pos, target_len = self.body.target_len(), "restarted");
    }

    pub fn id(&self) -> SnakeId {
        self.body.snake()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn path(&self) -> &PathHistory {
        &self.path
    }

    /// Active segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.body.iter_visual()
    }

    pub fn head_position(&self) -> Point {
        self.body.head().pos
    }

    pub fn facing(&self) -> Point {
        self.heading.facing()
    }

    pub fn active_len(&self) -> usize {
        self.body.active_len()
    }

    pub fn target_len(&self) -> usize {
        self.body.target_len()
    }

    pub fn scale(&self) -> f32 {
        self.scale.current()
    }

    pub fn target_scale(&self) -> f32 {
        target_scale(self.body.active_len(), self.tuning.scale_multiplier)
    }

    /// Spacing between segments, grows with girth
    pub fn link_length(&self) -> f32 {
        self.scale.current() + self.tuning.link_length_offset
    }

    pub fn turning_radius(&self) -> f32 {
        self.tuning.turning_radius_factor * self.scale.current()
    }

    pub fn growth_link_len(&self) -> f32 {
        self.growth_link_len
    }

    pub fn ground_speed(&self) -> f32 {
        self.tuning.ground_speed(self.controller.is_sprinting())
    }

    pub fn is_stopped(&self) -> bool {
        self.controller.is_stopped()
    }

    /// Whether the link just behind the head has (nearly) reached full
    /// length, over or under
    pub fn is_neck_complete(&self) -> bool {
        (self.growth_link_len - self.link_length()).abs() < self.tuning.epsilon
    }

    pub fn view(&self) -> SnakeView {
        SnakeView {
            head: self.head_position(),
            facing: self.facing(),
            ground_speed: self.ground_speed(),
        }
    }

    pub fn is_behind(&self, id: SegmentId, n: usize) -> bool {
        self.body.is_behind(id, n)
    }

    pub fn segment_behind_by(&self, id: SegmentId, n: isize) -> Option<SegmentId> {
        self.body.segment_behind_by(id, n)
    }

    pub fn segment_ahead_of(&self, id: SegmentId, n: isize) -> Option<SegmentId> {
        self.body.segment_ahead_of(id, n)
    }

    pub fn increase_target_len(&mut self, n: usize) {
        self.body.increase_target_len(n);
    }

    /// See `Body::cut_behind`
    pub fn cut_behind(&mut self, id: SegmentId) -> Vec<Point> {
        self.body.cut_behind(id)
    }

    /// Returns the positions of any segments that were cut off
    pub fn apply(&mut self, event: GrowthEvent) -> Vec<Point> {
        match event {
            GrowthEvent::AddLength(n) => {
                self.increase_target_len(n);
                vec![]
            }
            GrowthEvent::CutBehind(id) => self.cut_behind(id),
        }
    }

    /// Advance the snake by one frame
    pub fn tick(&mut self, dt: Seconds, terrain: &(impl Terrain + ?Sized)) {
        if self.controller.is_stopped() {
            return;
        }

        let speed = self.ground_speed();
        let view = self.view();
        let target_facing = self.controller.target_facing(&view, dt);
        self.heading.rotate_toward(target_facing, speed, self.turning_radius(), dt);

        let movement_len = self.move_head(speed, dt, terrain);

        let link_length = self.link_length();
        let head = self.head_position();
        self.path.record(head, movement_len, link_length, self.body.target_len());

        // grow the neck from 0 to link_length, then add the next segment
        if self.is_neck_complete() {
            if self.body.is_growing() {
                self.body.grow_one(self.scale.current());
                self.growth_link_len = 0.;
            }
        } else {
            self.growth_link_len =
                (self.growth_link_len + self.tuning.growth_rate * movement_len).min(link_length);
        }

        let target_scale = self.target_scale();
        if self.scale.needs_update(target_scale) {
            let scale = self.scale.tick(target_scale, speed, dt);
            self.body.apply_scale(scale);
        }

        self.resample();
    }

    /// Move the head along its facing and onto the terrain, returns the
    /// distance actually travelled (slopes and growth change it)
    fn move_head(&mut self, speed: f32, dt: Seconds, terrain: &(impl Terrain + ?Sized)) -> f32 {
        let half_scale = self.scale.current() * 0.5;
        let start = self.head_position();

        let mut end = start + self.heading.facing() * (speed * dt);
        end.y = terrain.height_at(end.x, end.z) + half_scale;

        let movement = end - start;
        let head = self.body.head_mut();
        if let Some(direction) = movement.normalized() {
            head.facing = direction;
        }
        head.pos = end;

        movement.magnitude()
    }

    /// Place every segment behind the head along the recorded path, each
    /// one link behind the one ahead of it (the neck may be shorter)
    fn resample(&mut self) {
        let link_length = self.link_length();
        let neck_length = if self.is_neck_complete() {
            link_length
        } else {
            self.growth_link_len
        };

        let Some(mut walk) = self.path.walk_back(self.body.head().pos) else {
            return;
        };

        let mut ahead = self.body.head().pos;
        for visual in 1..self.body.active_len() {
            let spacing = if visual == 1 { neck_length } else { link_length };
            let pos = walk.advance(spacing);

            if let Some(segment) = self.body.at_mut(visual) {
                segment.pos = pos;
                if let Some(facing) = (ahead - pos).normalized() {
                    segment.facing = facing;
                }
            }
            ahead = pos;
        }

        if walk.exhausted() {
            warn!(snake = %self.id(), path_len = self.path.len(), "ran out of path, clamped to oldest sample");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake_control::Template;
    use crate::terrain::Flat;

    fn straight_snake(target_len: usize) -> Snake {
        Snake::spawn(
            SnakeId(1),
            Tuning::default(),
            Point::ZERO,
            Point::X,
            target_len,
            Template::Straight.into_controller(Point::X),
            &Flat(0.),
        )
    }

    #[test]
    fn spawns_head_and_tail_one_link_apart() {
        let snake = straight_snake(2);
        assert_eq!(snake.active_len(), 2);
        assert_eq!(snake.head_position(), Point::new(0., 0.5, 0.));

        let tail = snake.body().at(1).unwrap();
        assert!(tail.pos.approx_eq(Point::new(-1.5, 0.5, 0.), 1e-6));
        assert!(tail.facing.approx_eq(Point::X, 1e-6));
        assert!(snake.is_neck_complete());
        assert_eq!(snake.path().len(), 2);
    }

    #[test]
    fn stopped_snake_does_not_move() {
        let mut snake = Snake::spawn(
            SnakeId(1),
            Tuning::default(),
            Point::ZERO,
            Point::X,
            5,
            Template::Stopped.into_controller(Point::X),
            &Flat(0.),
        );
        let before = snake.body().positions();
        for _ in 0..10 {
            snake.tick(0.1, &Flat(0.));
        }
        assert_eq!(snake.body().positions(), before);
        assert_eq!(snake.active_len(), 2);
    }

    #[test]
    fn head_follows_terrain() {
        let mut snake = straight_snake(2);
        let ramp = |x: f32, _: f32| x * 0.25;
        snake.tick(0.1, &ramp);
        let head = snake.head_position();
        assert!((head.y - (head.x * 0.25 + 0.5)).abs() < 1e-5);
        assert!(snake.body().head().facing.y > 0.);
    }

    #[test]
    fn growth_starts_from_the_head() {
        let mut snake = straight_snake(2);
        snake.increase_target_len(1);
        snake.tick(1. / 60., &Flat(0.));

        assert_eq!(snake.active_len(), 3);
        assert_eq!(snake.growth_link_len(), 0.);
        // the new neck sits on the head, the tail a full link behind
        let positions = snake.body().positions();
        assert!(positions[1].approx_eq(positions[0], 1e-5));
        assert!((positions[2].distance(positions[1]) - snake.link_length()).abs() < 1e-3);
    }

    #[test]
    fn restart_collapses_body_and_keeps_target() {
        let mut snake = Snake::spawn(
            SnakeId(1),
            Tuning::default(),
            Point::ZERO,
            Point::X,
            6,
            Template::demo_polygon_pattern(Point::X, 4, 30).into_controller(Point::X),
            &Flat(0.),
        );
        for _ in 0..1200 {
            snake.tick(1. / 60., &Flat(0.));
        }
        assert_eq!(snake.active_len(), 6);
        assert!(snake.scale() > 1.);

        snake.restart(Point::xz(10., 10.), Point::Z, &Flat(2.));
        assert_eq!(snake.active_len(), 2);
        assert_eq!(snake.target_len(), 6);
        assert_eq!(snake.scale(), 1.);
        assert_eq!(snake.facing(), Point::Z);
        assert_eq!(snake.head_position(), Point::new(10., 2.5, 10.));
        assert!(snake.body().at(1).unwrap().pos.approx_eq(Point::new(10., 2.5, 8.5), 1e-5));
        assert!(snake.is_neck_complete());
        assert_eq!(snake.path().len(), 2);
        assert!(snake.segments().all(|segment| segment.scale == 1.));

        // the controller starts its sequence over from the new facing
        snake.tick(1. / 60., &Flat(2.));
        assert!((snake.facing().x - (1f32 / 12.).sin()).abs() < 1e-4, "{:?}", snake.facing());
        assert_eq!(snake.active_len(), 3);
    }

    #[test]
    fn apply_routes_events() {
        let mut snake = straight_snake(2);
        assert!(snake.apply(GrowthEvent::AddLength(4)).is_empty());
        assert_eq!(snake.target_len(), 6);

        let tail = snake.body().id_at(1).unwrap();
        assert!(snake.apply(GrowthEvent::CutBehind(tail)).is_empty());
        assert_eq!(snake.active_len(), 2);
    }
}
