#[macro_use]
extern crate derive_more;

pub mod basic;
pub mod config;
pub mod error;
pub mod herd;
pub mod snake;
pub mod snake_control;
pub mod terrain;

pub use basic::{Point, Seconds};
pub use config::{Tuning, MIN_LENGTH};
pub use herd::Herd;
pub use snake::{GrowthEvent, SegmentId, Snake, SnakeId};
