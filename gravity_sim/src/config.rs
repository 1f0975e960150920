//! Simulation tunables
//!
//! Every constant the physics passes read lives in [`SimConfig`]. The struct is
//! built once (defaults, then a scenario file, then CLI flags) and handed to
//! the orchestrator by value; nothing in the core mutates it.
//!
//! A scenario file may override any subset of the fields:
//!
//! ```toml
//! [config]
//! wall_restitution = 0.8
//! max_dt = 0.01
//!
//! [config.gravity]
//! model = "uniform"
//! g = 2.0
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::boundary::Bounds;

/// Gravitational constant used by the default mutual-attraction model
pub const DEFAULT_G: f32 = 0.5;

/// How gravity acts on the bodies each frame
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum GravityModel {
    /// Every body attracts every other body: `F = G·m₁·m₂ / r²`
    Mutual { g: f32 },
    /// Constant downward acceleration of magnitude `g`
    Uniform { g: f32 },
    /// No gravity at all
    None,
}

impl GravityModel {
    pub fn name(&self) -> &'static str {
        match self {
            GravityModel::Mutual { .. } => "mutual",
            GravityModel::Uniform { .. } => "uniform",
            GravityModel::None => "none",
        }
    }

    /// Strength parameter, zero for [`GravityModel::None`]
    pub fn strength(&self) -> f32 {
        match self {
            GravityModel::Mutual { g } | GravityModel::Uniform { g } => *g,
            GravityModel::None => 0.0,
        }
    }

    /// Next model in the order mutual → uniform → none, keeping the strength
    pub fn cycle(&self) -> Self {
        let g = match self {
            GravityModel::None => DEFAULT_G,
            other => other.strength(),
        };
        match self {
            GravityModel::Mutual { .. } => GravityModel::Uniform { g },
            GravityModel::Uniform { .. } => GravityModel::None,
            GravityModel::None => GravityModel::Mutual { g },
        }
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        GravityModel::Mutual { g: DEFAULT_G }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must lie in [0, 1], got {value}")]
    RestitutionOutOfRange { name: &'static str, value: f32 },
    #[error("correction_percent must lie in (0, 1], got {0}")]
    CorrectionOutOfRange(f32),
    #[error("slop must be non-negative, got {0}")]
    NegativeSlop(f32),
    #[error("max_dt must be positive, got {0}")]
    InvalidMaxDt(f32),
    #[error("bounds half extent must be positive, got {0}")]
    InvalidBounds(f32),
    #[error("gravity strength must be finite, got {0}")]
    InvalidGravity(f32),
}

/// Immutable configuration for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub gravity: GravityModel,
    /// Fraction of normal speed kept when bouncing off a wall
    pub wall_restitution: f32,
    /// Restitution coefficient for body-body impulses
    pub collision_restitution: f32,
    /// Share of the penetration (minus slop) removed per resolution
    pub correction_percent: f32,
    /// Penetration tolerated without positional correction
    pub slop: f32,
    /// Upper bound on the timestep fed to the integrator
    pub max_dt: f32,
    pub bounds: Bounds,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GravityModel::default(),
            wall_restitution: 0.95,
            collision_restitution: 0.9,
            correction_percent: 0.98,
            slop: 0.001,
            max_dt: 0.02,
            bounds: Bounds::default(),
        }
    }
}

impl SimConfig {
    pub fn with_gravity(mut self, gravity: GravityModel) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_wall_restitution(mut self, e: f32) -> Self {
        self.wall_restitution = e;
        self
    }

    pub fn with_collision_restitution(mut self, e: f32) -> Self {
        self.collision_restitution = e;
        self
    }

    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("wall_restitution", self.wall_restitution),
            ("collision_restitution", self.collision_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RestitutionOutOfRange { name, value });
            }
        }
        if !(self.correction_percent > 0.0 && self.correction_percent <= 1.0) {
            return Err(ConfigError::CorrectionOutOfRange(self.correction_percent));
        }
        if !(self.slop >= 0.0) {
            return Err(ConfigError::NegativeSlop(self.slop));
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(ConfigError::InvalidMaxDt(self.max_dt));
        }
        if !(self.bounds.half_extent.is_finite() && self.bounds.half_extent > 0.0) {
            return Err(ConfigError::InvalidBounds(self.bounds.half_extent));
        }
        if !self.gravity.strength().is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity.strength()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.gravity, GravityModel::Mutual { g: 0.5 });
        assert_eq!(config.max_dt, 0.02);
    }

    #[test]
    fn rejects_restitution_above_one() {
        let config = SimConfig::default().with_wall_restitution(1.2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::RestitutionOutOfRange {
                name: "wall_restitution",
                value: 1.2
            })
        );
    }

    #[test]
    fn rejects_zero_max_dt() {
        let config = SimConfig::default().with_max_dt(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxDt(0.0)));
    }

    #[test]
    fn gravity_cycle_visits_every_model() {
        let start = GravityModel::Mutual { g: 0.5 };
        let uniform = start.cycle();
        assert_eq!(uniform, GravityModel::Uniform { g: 0.5 });
        assert_eq!(uniform.cycle(), GravityModel::None);
        assert_eq!(GravityModel::None.cycle(), GravityModel::Mutual { g: DEFAULT_G });
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            wall_restitution = 0.8

            [gravity]
            model = "uniform"
            g = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.wall_restitution, 0.8);
        assert_eq!(config.gravity, GravityModel::Uniform { g: 2.0 });
        assert_eq!(config.collision_restitution, 0.9);
        assert_eq!(config.bounds, Bounds::default());
    }

    #[test]
    fn gravity_none_parses_without_strength() {
        let config: SimConfig = toml::from_str("[gravity]\nmodel = \"none\"\n").unwrap();
        assert_eq!(config.gravity, GravityModel::None);
    }
}
