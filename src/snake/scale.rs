use crate::basic::Seconds;
use crate::config::MIN_LENGTH;

/// Girth a body of `active_len` segments grows towards,
/// 1 up to `MIN_LENGTH` segments then logarithmic in length
/// (roughly 1 at 2 segments to 8 at 200 with a multiplier of 1.5)
pub fn target_scale(active_len: usize, multiplier: f32) -> f32 {
    if active_len > MIN_LENGTH {
        multiplier * (active_len as f32 / MIN_LENGTH as f32).ln() + 1.
    } else {
        1.
    }
}

/// Uniform girth of a snake.
///
/// Growing is gradual and proportional to speed, shrinking is instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scale {
    current: f32,
    rate: f32,
    epsilon: f32,
}

impl Scale {
    pub fn new(rate: f32, epsilon: f32) -> Self {
        Self { current: 1., rate, epsilon }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    // once the curve flattens out, adding a segment can move the target
    // by less than epsilon, updates then pause until more segments arrive
    pub fn needs_update(&self, target: f32) -> bool {
        (self.current - target).abs() > self.epsilon
    }

    /// Move towards `target`, returns the new scale
    pub fn tick(&mut self, target: f32, speed: f32, dt: Seconds) -> f32 {
        self.current = (self.current + self.rate * speed * dt).min(target);
        self.current
    }
}
