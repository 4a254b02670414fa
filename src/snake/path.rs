use std::collections::VecDeque;

use tracing::trace;

use crate::basic::Point;
use crate::config::{Tuning, MIN_LENGTH};

/// A position the head passed through
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathSample {
    pub pos: Point,
    /// Distance travelled by the head since the previous sample
    pub arc_len: f32,
}

/// The recent trail of the head, oldest sample first.
///
/// Samples are recorded by distance travelled, not by time, so the
/// spacing of the trail stays roughly constant regardless of speed.
#[derive(Clone, Debug)]
pub struct PathHistory {
    samples: VecDeque<PathSample>,
    accumulated: f32,
    waypoints_per_link: f32,
    velocity_buffer_factor: f32,
}

impl PathHistory {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            samples: VecDeque::with_capacity(tuning.initial_capacity),
            accumulated: 0.,
            waypoints_per_link: tuning.waypoints_per_link,
            velocity_buffer_factor: tuning.velocity_buffer_factor,
        }
    }

    /// Forget everything and seed the history with the spawn pose,
    /// the tail at the start of the trail and the head at its end
    pub fn restart(&mut self, tail: Point, head: Point) {
        self.samples.clear();
        self.accumulated = 0.;
        self.samples.push_back(PathSample { pos: tail, arc_len: 0. });
        self.samples.push_back(PathSample {
            pos: head,
            arc_len: head.distance(tail),
        });
    }

    /// Most samples kept for a body that wants to be `target_len` long
    pub fn capacity_for(&self, target_len: usize) -> usize {
        let capacity = target_len as f32 * self.waypoints_per_link * self.velocity_buffer_factor;
        (capacity as usize).max(MIN_LENGTH)
    }

    /// Account for `movement` travelled by the head which now sits at
    /// `head`, appending a sample once enough distance has piled up.
    /// Returns whether a sample was appended.
    pub fn record(&mut self, head: Point, movement: f32, link_length: f32, target_len: usize) -> bool {
        let threshold = link_length / self.waypoints_per_link;
        self.accumulated += movement.max(0.);

        let appended = movement > 0. && self.accumulated > threshold;
        if appended {
            trace!(?head, arc_len = self.accumulated, "path sample");
            self.samples.push_back(PathSample {
                pos: head,
                arc_len: self.accumulated,
            });
            self.accumulated = 0.;
        }

        let capacity = self.capacity_for(target_len);
        if self.samples.len() > capacity {
            let excess = self.samples.len() - capacity;
            self.samples.drain(..excess);
        }

        appended
    }

    pub fn samples(&self) -> &VecDeque<PathSample> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&PathSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&PathSample> {
        self.samples.front()
    }

    /// Movement recorded since the newest sample
    pub fn pending(&self) -> f32 {
        self.accumulated
    }

    /// Start walking backwards along the trail from `head`, `None` if
    /// nothing has been recorded yet
    pub fn walk_back(&self, head: Point) -> Option<WalkBack<'_>> {
        let newest = self.samples.back()?;
        let edge_len = head.distance(newest.pos);
        Some(WalkBack {
            samples: &self.samples,
            from: head,
            to_idx: self.samples.len() - 1,
            edge_len,
            remaining: edge_len,
            exhausted: false,
        })
    }
}

/// A point moving backwards along the polyline
/// `head -> newest sample -> ... -> oldest sample`
/// using the recorded arc lengths as edge lengths
pub struct WalkBack<'a> {
    samples: &'a VecDeque<PathSample>,
    /// Start of the current edge (closer to the head)
    from: Point,
    /// Sample at the end of the current edge
    to_idx: usize,
    edge_len: f32,
    /// Arc length left between the current point and the end of the edge
    remaining: f32,
    exhausted: bool,
}

impl WalkBack<'_> {
    /// Move `distance` further back and return the new point. Once the
    /// oldest sample is reached the walk stays there.
    pub fn advance(&mut self, distance: f32) -> Point {
        let mut distance = distance.max(0.);

        while distance > self.remaining {
            distance -= self.remaining;
            if self.to_idx == 0 {
                self.remaining = 0.;
                self.exhausted = true;
                return self.samples[0].pos;
            }

            // the arc length of a sample is measured from the sample before it
            self.from = self.samples[self.to_idx].pos;
            self.edge_len = self.samples[self.to_idx].arc_len;
            self.remaining = self.edge_len;
            self.to_idx -= 1;
        }

        self.remaining -= distance;
        let to = self.samples[self.to_idx].pos;
        if self.edge_len > f32::EPSILON {
            to.lerp(self.from, self.remaining / self.edge_len)
        } else {
            to
        }
    }

    /// Whether the walk ran past the oldest sample
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}
