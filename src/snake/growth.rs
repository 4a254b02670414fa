use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MIN_LENGTH;
use crate::snake::SegmentId;

/// Something that happened to a snake between two ticks
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrowthEvent {
    /// A pickup was consumed
    AddLength(usize),
    /// Something cut through the body, everything behind the segment falls off
    CutBehind(SegmentId),
}

/// How long a freshly spawned snake wants to become
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum InitialLength {
    Fixed(usize),
    /// Uniform in `min..=max`
    Uniform { min: usize, max: usize },
}

impl Default for InitialLength {
    fn default() -> Self {
        Self::Fixed(20)
    }
}

impl InitialLength {
    /// Target length, never less than `MIN_LENGTH`
    pub fn sample(self, rng: &mut impl Rng) -> usize {
        let len = match self {
            Self::Fixed(len) => len,
            Self::Uniform { min, max } if min >= max => min,
            Self::Uniform { min, max } => rng.gen_range(min..=max),
        };
        len.max(MIN_LENGTH)
    }
}
