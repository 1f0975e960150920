//! Gravity models
//!
//! Each model only adds into `Body::acceleration`; the orchestrator clears the
//! accumulators before the pass.

use glam::Vec2;

use crate::body::Body;
use crate::config::GravityModel;

/// Something that contributes acceleration to every body
pub trait ForceField {
    fn accumulate(&self, bodies: &mut [Body]);
}

/// Newtonian attraction between every pair of bodies.
///
/// Each body sums the pull of every *other* body independently, using the
/// positions as they were when the pass started. Pairs at exactly zero
/// separation contribute nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutualGravity {
    pub g: f32,
}

impl ForceField for MutualGravity {
    fn accumulate(&self, bodies: &mut [Body]) {
        let sources: Vec<(Vec2, f32)> = bodies.iter().map(|b| (b.position, b.mass)).collect();

        for (i, body) in bodies.iter_mut().enumerate() {
            for (j, &(position, mass)) in sources.iter().enumerate() {
                if i == j {
                    continue;
                }
                body.acceleration += pull(self.g, body, position, mass);
            }
        }
    }
}

/// Acceleration on `body` from a point mass at `position`
fn pull(g: f32, body: &Body, position: Vec2, mass: f32) -> Vec2 {
    let r = position - body.position;
    let distance = r.length();
    if distance == 0.0 {
        return Vec2::ZERO;
    }

    let force = g * body.mass * mass / (distance * distance);
    let direction = r / distance;
    direction * force / body.mass
}

/// Constant downward pull, independent of mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGravity {
    pub g: f32,
}

impl ForceField for UniformGravity {
    fn accumulate(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.acceleration.y -= self.g;
        }
    }
}

impl ForceField for GravityModel {
    fn accumulate(&self, bodies: &mut [Body]) {
        match *self {
            GravityModel::Mutual { g } => MutualGravity { g }.accumulate(bodies),
            GravityModel::Uniform { g } => UniformGravity { g }.accumulate(bodies),
            GravityModel::None => {}
        }
    }
}
