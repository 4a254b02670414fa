use tracing::{debug, warn};

use crate::basic::Point;
use crate::config::MIN_LENGTH;
use crate::snake::SnakeId;

// Slots are stored in creation order but laid out visually as
//   [0][n-1][n-2]...[2][1]
// head, newest segment just behind the head, ..., original tail.
// Growing activates slot n which then sits right behind the head,
// shrinking deactivates the highest active slot, so the active
// slots are always the prefix 0..n and no slot ever has to move.

/// Storage slot of the segment at `visual` (0 is the head) in a body
/// with `active_len` active segments
pub fn visual_to_slot(visual: usize, active_len: usize) -> Option<usize> {
    match visual {
        0 => Some(0),
        v if v < active_len => Some(active_len - v),
        _ => None,
    }
}

/// Inverse of `visual_to_slot`, `None` for inactive slots
pub fn slot_to_visual(slot: usize, active_len: usize) -> Option<usize> {
    match slot {
        0 => Some(0),
        s if s < active_len => Some(active_len - s),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub pos: Point,
    /// Unit vector the segment is looking along
    pub facing: Point,
    /// Uniform girth
    pub scale: f32,
    pub active: bool,
}

/// Handle to one segment of one snake, stays valid while the segment is
/// active (slots are never reordered)
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SegmentId {
    pub snake: SnakeId,
    pub slot: usize,
}

/// The segments of a snake, active and pooled
#[derive(Clone, Debug)]
pub struct Body {
    snake: SnakeId,
    segments: Vec<Segment>,
    active_len: usize,
    target_len: usize,
}

impl Body {
    pub fn new(snake: SnakeId, head: Segment, tail: Segment, target_len: usize, capacity: usize) -> Self {
        let mut segments = Vec::with_capacity(capacity.max(MIN_LENGTH));
        segments.push(Segment { active: true, ..head });
        segments.push(Segment { active: true, ..tail });
        Self {
            snake,
            segments,
            active_len: MIN_LENGTH,
            target_len: target_len.max(MIN_LENGTH),
        }
    }

    pub fn snake(&self) -> SnakeId {
        self.snake
    }

    /// Number of visible segments, including the head
    pub fn active_len(&self) -> usize {
        debug_assert_eq!(
            self.active_len,
            self.segments.iter().filter(|segment| segment.active).count()
        );
        self.active_len
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Number of slots ever created, active or pooled
    pub fn allocated_len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_growing(&self) -> bool {
        self.active_len < self.target_len
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn head_mut(&mut self) -> &mut Segment {
        &mut self.segments[0]
    }

    pub fn head_id(&self) -> SegmentId {
        SegmentId { snake: self.snake, slot: 0 }
    }

    /// Slot of `id` if it is an active segment of this body
    fn slot_of(&self, id: SegmentId) -> Option<usize> {
        (id.snake == self.snake && id.slot < self.active_len).then_some(id.slot)
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.slot_of(id).is_some()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.slot_of(id).map(|slot| &self.segments[slot])
    }

    pub fn position_of(&self, id: SegmentId) -> Option<Point> {
        self.get(id).map(|segment| segment.pos)
    }

    /// Distance from the head counted in segments
    pub fn visual_index(&self, id: SegmentId) -> Option<usize> {
        slot_to_visual(self.slot_of(id)?, self.active_len)
    }

    pub fn id_at(&self, visual: usize) -> Option<SegmentId> {
        visual_to_slot(visual, self.active_len).map(|slot| SegmentId { snake: self.snake, slot })
    }

    pub fn at(&self, visual: usize) -> Option<&Segment> {
        visual_to_slot(visual, self.active_len).map(|slot| &self.segments[slot])
    }

    pub fn at_mut(&mut self, visual: usize) -> Option<&mut Segment> {
        visual_to_slot(visual, self.active_len).map(move |slot| &mut self.segments[slot])
    }

    /// Active segments from head to tail
    pub fn iter_visual(&self) -> impl Iterator<Item = &Segment> + '_ {
        (0..self.active_len).filter_map(|visual| self.at(visual))
    }

    pub fn positions(&self) -> Vec<Point> {
        self.iter_visual().map(|segment| segment.pos).collect()
    }

    /// Pool every segment except the head and the tail, which are replaced
    pub fn reset(&mut self, head: Segment, tail: Segment) {
        for segment in &mut self.segments[MIN_LENGTH..] {
            segment.active = false;
        }
        self.segments[0] = Segment { active: true, ..head };
        self.segments[1] = Segment { active: true, ..tail };
        self.active_len = MIN_LENGTH;
    }

    /// The snake will grow by `n` as path length becomes available,
    /// this is not an instant length change
    pub fn increase_target_len(&mut self, n: usize) {
        self.target_len = self.target_len.saturating_add(n);
    }

    /// Never goes below `MIN_LENGTH`
    pub fn decrease_target_len(&mut self, n: usize) {
        self.target_len = self.target_len.saturating_sub(n).max(MIN_LENGTH);
    }

    /// Reactivate the pooled slot just past the active prefix, if any.
    /// The reactivated segment becomes the one right behind the head.
    pub fn try_activate_first_inactive(&mut self, pos: Point, facing: Point, scale: f32) -> bool {
        let Some(segment) = self.segments.get_mut(self.active_len) else {
            return false;
        };
        *segment = Segment { pos, facing, scale, active: true };
        self.active_len += 1;
        true
    }

    /// Allocate a brand new segment right behind the head, pooled slots
    /// are reused first so a slot is never duplicated
    pub fn add_segment(&mut self, pos: Point, facing: Point, scale: f32) -> SegmentId {
        if !self.try_activate_first_inactive(pos, facing, scale) {
            self.segments.push(Segment { pos, facing, scale, active: true });
            self.active_len += 1;
        }
        SegmentId {
            snake: self.snake,
            slot: self.active_len - 1,
        }
    }

    /// Add a segment at the head's position, looking the way the head looks
    pub fn grow_one(&mut self, scale: f32) -> SegmentId {
        let Segment { pos, facing, .. } = *self.head();
        let id = self.add_segment(pos, facing, scale);
        debug!(snake = %self.snake, active_len = self.active_len, target_len = self.target_len, "grew");
        id
    }

    /// Deactivate every segment strictly behind `id`, returning the
    /// positions they occupied (tail first) so something can be spawned
    /// there. Cuts of foreign segments are ignored, and so are cuts within
    /// `MIN_LENGTH` of either end: a hit on the head or the neck kills
    /// rather than cuts, and fewer than `MIN_LENGTH` segments behind the
    /// cut point are not worth cutting off.
    pub fn cut_behind(&mut self, id: SegmentId) -> Vec<Point> {
        let Some(visual) = self.visual_index(id) else {
            warn!(snake = %self.snake, ?id, "ignoring cut of a segment not in this body");
            return vec![];
        };
        let old_len = self.active_len;
        let behind = old_len - 1 - visual;
        if visual < MIN_LENGTH || behind < MIN_LENGTH {
            debug!(snake = %self.snake, visual, behind, "ignoring cut too close to an end");
            return vec![];
        }

        let before = self.iter_visual().copied().collect::<Vec<_>>();
        let new_len = old_len - behind;

        // the segments behind the cut are the ones that disappear
        let freed = before[new_len..].iter().rev().map(|segment| segment.pos).collect::<Vec<_>>();

        for segment in &mut self.segments[new_len..old_len] {
            segment.active = false;
        }
        self.active_len = new_len;

        // the remaining slots now map to different visual positions,
        // keep the front of the body where it was
        for (visual, segment) in before.into_iter().enumerate().take(new_len).skip(1) {
            if let Some(remapped) = self.at_mut(visual) {
                *remapped = segment;
            }
        }

        self.decrease_target_len(behind);
        debug!(snake = %self.snake, cut_count = behind, active_len = self.active_len, "cut");
        freed
    }

    /// Segment `n` places further from the head than `id` (closer to the
    /// head for negative `n`), clamped to the ends of the body
    pub fn segment_behind_by(&self, id: SegmentId, n: isize) -> Option<SegmentId> {
        let visual = self.visual_index(id)? as isize;
        let target = (visual + n).clamp(0, self.active_len as isize - 1);
        self.id_at(target as usize)
    }

    pub fn segment_ahead_of(&self, id: SegmentId, n: isize) -> Option<SegmentId> {
        self.segment_behind_by(id, -n)
    }

    /// Whether `id` sits strictly behind visual position `n`, `false` for
    /// `n == 0` and for segments that are not part of this body
    pub fn is_behind(&self, id: SegmentId, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.visual_index(id).map_or(false, |visual| visual > n)
    }

    pub fn apply_scale(&mut self, scale: f32) {
        for segment in self.segments.iter_mut().filter(|segment| segment.active) {
            segment.scale = scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAKE: SnakeId = SnakeId(7);

    fn segment(x: f32) -> Segment {
        Segment {
            pos: Point::xz(x, 0.),
            facing: Point::X,
            scale: 1.,
            active: true,
        }
    }

    /// A body of `len` segments laid out along -x, visual i at x = -i
    fn body(len: usize) -> Body {
        let mut body = Body::new(SNAKE, segment(0.), segment(-1.), len, 16);
        while body.active_len() < len {
            body.grow_one(1.);
        }
        for visual in 0..len {
            body.at_mut(visual).unwrap().pos = Point::xz(-(visual as f32), 0.);
        }
        body
    }

    #[test]
    fn test_visual_slot_mapping() {
        assert_eq!(visual_to_slot(0, 5), Some(0));
        assert_eq!(visual_to_slot(1, 5), Some(4));
        assert_eq!(visual_to_slot(4, 5), Some(1));
        assert_eq!(visual_to_slot(5, 5), None);

        for len in MIN_LENGTH..10 {
            for visual in 0..len {
                let slot = visual_to_slot(visual, len).unwrap();
                assert_eq!(slot_to_visual(slot, len), Some(visual), "len {len}");
            }
            assert_eq!(slot_to_visual(len, len), None);
        }
    }

    #[test]
    fn test_tail_is_always_slot_one() {
        let body = body(6);
        assert_eq!(body.id_at(5).unwrap().slot, 1);
        assert_eq!(body.at(5).unwrap().pos, Point::xz(-5., 0.));
    }

    #[test]
    fn test_growth_reuses_pooled_slots() {
        let mut body = body(6);
        body.cut_behind(body.id_at(2).unwrap());
        assert_eq!(body.active_len(), 3);
        assert_eq!(body.allocated_len(), 6);

        assert!(body.try_activate_first_inactive(Point::ZERO, Point::X, 1.));
        body.add_segment(Point::ZERO, Point::X, 1.);
        assert_eq!(body.active_len(), 5);
        assert_eq!(body.allocated_len(), 6);

        body.add_segment(Point::ZERO, Point::X, 1.);
        assert_eq!(body.allocated_len(), 6);
        body.add_segment(Point::ZERO, Point::X, 1.);
        assert_eq!(body.active_len(), 7);
        assert_eq!(body.allocated_len(), 7);
        assert!(!body.try_activate_first_inactive(Point::ZERO, Point::X, 1.));
    }

    #[test]
    fn test_new_segment_sits_behind_head() {
        let mut body = body(3);
        let id = body.add_segment(Point::xz(0.1, 0.), Point::X, 1.);
        assert_eq!(body.visual_index(id), Some(1));
        assert_eq!(body.at(3).unwrap().pos, Point::xz(-2., 0.));
    }

    #[test]
    fn test_cut_behind() {
        let mut body = body(10);
        let freed = body.cut_behind(body.id_at(5).unwrap());

        assert_eq!(freed.len(), 4);
        assert_eq!(body.active_len(), 6);
        assert_eq!(body.target_len(), 6);
        // tail first
        assert_eq!(freed, vec![
            Point::xz(-9., 0.),
            Point::xz(-8., 0.),
            Point::xz(-7., 0.),
            Point::xz(-6., 0.),
        ]);
        // the front of the body did not move
        for visual in 0..6 {
            assert_eq!(body.at(visual).unwrap().pos, Point::xz(-(visual as f32), 0.));
        }
    }

    #[test]
    fn test_cut_at_the_neck_is_ignored() {
        let mut body = body(10);
        assert!(body.cut_behind(body.id_at(1).unwrap()).is_empty());
        assert_eq!(body.active_len(), 10);
        assert_eq!(body.target_len(), 10);
    }

    #[test]
    fn test_cut_near_the_tail_is_ignored() {
        let mut body = body(10);
        assert!(body.cut_behind(body.id_at(8).unwrap()).is_empty());
        assert_eq!(body.active_len(), 10);

        // exactly MIN_LENGTH behind is the shortest cut
        let freed = body.cut_behind(body.id_at(7).unwrap());
        assert_eq!(freed, vec![Point::xz(-9., 0.), Point::xz(-8., 0.)]);
        assert_eq!(body.active_len(), 8);
    }

    #[test]
    fn test_cut_closest_to_the_head() {
        let mut body = body(10);
        let freed = body.cut_behind(body.id_at(MIN_LENGTH).unwrap());
        assert_eq!(freed.len(), 7);
        assert_eq!(body.active_len(), MIN_LENGTH + 1);
        assert_eq!(body.target_len(), MIN_LENGTH + 1);
    }

    #[test]
    fn test_cut_keeps_front_facings() {
        let mut body = body(6);
        for visual in 0..6 {
            let facing = Point::X.rotate_around(Point::UP, visual as f32 * 0.1);
            body.at_mut(visual).unwrap().facing = facing;
        }
        let before = body.iter_visual().copied().collect::<Vec<_>>();

        body.cut_behind(body.id_at(3).unwrap());
        assert_eq!(body.active_len(), 4);
        assert_eq!(body.iter_visual().copied().collect::<Vec<_>>(), before[..4].to_vec());
    }

    #[test]
    fn test_ignored_cuts() {
        let mut body = body(5);

        assert!(body.cut_behind(body.head_id()).is_empty());
        assert!(body.cut_behind(body.id_at(4).unwrap()).is_empty());
        assert!(body.cut_behind(SegmentId { snake: SnakeId(8), slot: 2 }).is_empty());
        assert!(body.cut_behind(SegmentId { snake: SNAKE, slot: 9 }).is_empty());
        assert_eq!(body.active_len(), 5);
        assert_eq!(body.target_len(), 5);
    }

    #[test]
    fn test_navigation() {
        let body = body(6);
        let third = body.id_at(3).unwrap();

        assert_eq!(body.segment_behind_by(third, 1), body.id_at(4));
        assert_eq!(body.segment_ahead_of(third, 1), body.id_at(2));
        assert_eq!(body.segment_behind_by(third, 0), Some(third));
        // clamped
        assert_eq!(body.segment_behind_by(third, 100), body.id_at(5));
        assert_eq!(body.segment_ahead_of(third, 100), Some(body.head_id()));

        let stranger = SegmentId { snake: SnakeId(1), slot: 3 };
        assert_eq!(body.segment_behind_by(stranger, 1), None);
    }

    #[test]
    fn test_is_behind() {
        let body = body(6);
        let third = body.id_at(3).unwrap();

        assert!(body.is_behind(third, 2));
        assert!(!body.is_behind(third, 3));
        assert!(!body.is_behind(third, 0));
        assert!(!body.is_behind(body.head_id(), 1));
        assert!(!body.is_behind(SegmentId { snake: SNAKE, slot: 40 }, 1));
    }

    #[test]
    fn test_reset_pools_the_middle() {
        let mut body = body(6);
        body.reset(segment(5.), segment(4.));

        assert_eq!(body.active_len(), MIN_LENGTH);
        assert_eq!(body.allocated_len(), 6);
        assert_eq!(body.target_len(), 6);
        assert_eq!(body.positions(), vec![Point::xz(5., 0.), Point::xz(4., 0.)]);

        body.grow_one(1.);
        assert_eq!(body.allocated_len(), 6);
        assert_eq!(body.at(1).unwrap().pos, Point::xz(5., 0.));
    }

    #[test]
    fn test_target_len_clamps() {
        let mut body = body(2);
        body.decrease_target_len(100);
        assert_eq!(body.target_len(), MIN_LENGTH);
        body.increase_target_len(3);
        assert_eq!(body.target_len(), MIN_LENGTH + 3);
    }
}
