pub use point::Point;

mod point;

/// Seconds elapsed between two ticks
pub type Seconds = f32;
