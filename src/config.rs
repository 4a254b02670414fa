use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Smallest number of active segments a body can have (head and tail)
pub const MIN_LENGTH: usize = 2;

/// Tuning constants for locomotion, growth and scale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Every segment is a uniformly scaled sphere, this adds
    /// space between segments beyond the scale
    pub link_length_offset: f32,
    pub waypoints_per_link: f32,
    /// Extra path history kept beyond what the target length strictly needs
    pub velocity_buffer_factor: f32,
    /// Neck growth per unit of head movement
    pub growth_rate: f32,
    /// Scale growth per unit of speed per second
    pub scale_rate: f32,
    pub scale_multiplier: f32,
    /// Turning radius per unit of scale
    pub turning_radius_factor: f32,
    pub epsilon: f32,

    pub base_speed: f32,
    pub sprint_speed: f32,

    /// Number of segment slots reserved up front
    pub initial_capacity: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            link_length_offset: 0.5,
            waypoints_per_link: 2.,
            velocity_buffer_factor: 1.33,
            growth_rate: 0.33,
            scale_rate: 0.05,
            scale_multiplier: 1.5,
            turning_radius_factor: 1.,
            epsilon: 0.01,

            base_speed: 5.,
            sprint_speed: 7.,

            initial_capacity: 200,
        }
    }
}

// builder
impl Tuning {
    #[must_use]
    pub fn speeds(mut self, base_speed: f32, sprint_speed: f32) -> Self {
        self.base_speed = base_speed;
        self.sprint_speed = sprint_speed;
        self
    }

    #[must_use]
    pub fn link_length_offset(mut self, offset: f32) -> Self {
        self.link_length_offset = offset;
        self
    }

    #[must_use]
    pub fn growth_rate(mut self, growth_rate: f32) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    #[must_use]
    pub fn scale_rate(mut self, scale_rate: f32) -> Self {
        self.scale_rate = scale_rate;
        self
    }

    #[must_use]
    pub fn velocity_buffer_factor(mut self, factor: f32) -> Self {
        self.velocity_buffer_factor = factor;
        self
    }
}

impl Tuning {
    pub fn ground_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.sprint_speed
        } else {
            self.base_speed
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("waypoints_per_link", self.waypoints_per_link),
            ("velocity_buffer_factor", self.velocity_buffer_factor),
            ("growth_rate", self.growth_rate),
            ("scale_rate", self.scale_rate),
            ("turning_radius_factor", self.turning_radius_factor),
            ("epsilon", self.epsilon),
            ("base_speed", self.base_speed),
            ("sprint_speed", self.sprint_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.) {
                return Err(ConfigError { field, reason: "must be positive and finite" });
            }
        }

        let non_negative = [
            ("link_length_offset", self.link_length_offset),
            ("scale_multiplier", self.scale_multiplier),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.) {
                return Err(ConfigError { field, reason: "must be non-negative and finite" });
            }
        }

        // fewer than one waypoint per link makes the history too coarse to
        // guarantee enough samples for the whole body
        if self.waypoints_per_link * self.velocity_buffer_factor < 1. {
            return Err(ConfigError {
                field: "velocity_buffer_factor",
                reason: "waypoints_per_link * velocity_buffer_factor must be at least 1",
            });
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[must_use]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tuning `{}`: {}", self.field, self.reason)
    }
}

impl std::error::Error for ConfigError {}
