//! Model rotation controllers
//!
//! The render pipeline reads one rotation per frame from a
//! [`RotationSource`] and never writes back to it.

use crate::config::RenderConfig;
use crate::math::{self, Mat4, Vec3};

/// Supplies the current model rotation
pub trait RotationSource {
    /// Rotation for the frame about to be drawn
    fn rotation(&self) -> Mat4;

    /// Advance internal state by one frame
    fn advance(&mut self) {}
}

/// A rotation that never changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRotation(pub Mat4);

impl Default for FixedRotation {
    fn default() -> Self {
        Self(math::identity())
    }
}

impl RotationSource for FixedRotation {
    fn rotation(&self) -> Mat4 {
        self.0
    }
}

/// Constant spin around an axis, like a trackball left spinning with no drag
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    axis: Vec3,
    speed: f32,
    angle: f32,
}

impl Spin {
    /// Spin around `axis` at `speed` radians per frame
    pub fn new(axis: Vec3, speed: f32) -> Self {
        Self {
            axis: math::normalize(axis),
            speed,
            angle: 0.0,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.spin_axis, config.spin_speed)
    }

    /// Current angle in radians, wrapped to `[0, 2π)`
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl RotationSource for Spin {
    fn rotation(&self) -> Mat4 {
        math::rotation(self.axis, self.angle)
    }

    fn advance(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(std::f32::consts::TAU);
    }
}
