//! Circular point-mass bodies

use glam::Vec2;
use thiserror::Error;

/// RGB color used only by the renderer
pub type Color = [f32; 3];

/// Reasons a body is rejected before it enters the simulation
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    #[error("body radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("body mass must be positive and finite, got {0}")]
    InvalidMass(f32),
    #[error("body {field} must be finite, got ({x}, {y})")]
    NonFinite { field: &'static str, x: f32, y: f32 },
}

/// A body in the simulation: a circle with mass, position, and velocity.
///
/// Mass and radius are checked once in [`Body::new`]; the physics passes
/// divide by both every frame and never re-validate them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub radius: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Per-frame accumulator, zeroed at the start of every step
    pub acceleration: Vec2,
    pub mass: f32,
    pub color: Color,
}

impl Body {
    pub fn new(
        radius: f32,
        position: Vec2,
        mass: f32,
        velocity: Vec2,
        color: Color,
    ) -> Result<Self, BodyError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        check_finite("position", position)?;
        check_finite("velocity", velocity)?;

        Ok(Self {
            radius,
            position,
            velocity,
            acceleration: Vec2::ZERO,
            mass,
            color,
        })
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

fn check_finite(field: &'static str, v: Vec2) -> Result<(), BodyError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(BodyError::NonFinite { field, x: v.x, y: v.y })
    }
}
