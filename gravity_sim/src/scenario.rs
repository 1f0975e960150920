//! Initial conditions: built-in presets and TOML scenario files
//!
//! A scenario file lists the bodies and optionally overrides the config:
//!
//! ```toml
//! [config.gravity]
//! model = "mutual"
//! g = 0.5
//!
//! [[bodies]]
//! radius = 0.1
//! position = [0.0, 0.5]
//! velocity = [1.0, 0.0]
//! mass = 5.0
//! color = [0.0, 1.0, 1.0]
//! ```

use std::path::Path;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use crate::body::{Body, BodyError, Color};
use crate::config::{ConfigError, GravityModel, SimConfig};

const CYAN: Color = [0.0, 1.0, 1.0];
const RED: Color = [1.0, 0.0, 0.0];
const GREEN: Color = [0.0, 1.0, 0.0];
const WHITE: Color = [1.0, 1.0, 1.0];

/// Mass of the bodies in the orbit presets
const PLANET_MASS: f32 = 5.0;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("body #{index} is invalid: {source}")]
    Body {
        index: usize,
        #[source]
        source: BodyError,
    },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("built-in preset is invalid: {0}")]
    Preset(#[from] BodyError),
    #[error("scenario has no bodies")]
    Empty,
}

/// A ready-to-run set of bodies together with the config they expect
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub config: SimConfig,
    pub bodies: Vec<Body>,
}

/// Built-in starting configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Two bodies circling each other under mutual attraction
    Binary,
    /// The binary pair with a third body resting between them
    ThreeBody,
    /// Two bodies flying straight at each other without gravity
    HeadOn,
    /// Stacks of balls dropped under uniform downward gravity
    Rain,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Binary, Preset::ThreeBody, Preset::HeadOn, Preset::Rain];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Binary => "binary",
            Preset::ThreeBody => "three-body",
            Preset::HeadOn => "head-on",
            Preset::Rain => "rain",
        }
    }

    /// Preset bound to a number key, counting from 1
    pub fn from_index(index: usize) -> Option<Preset> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let config = SimConfig::default();
        let (config, bodies) = match self {
            Preset::Binary => (config, binary_pair()?),
            Preset::ThreeBody => {
                let mut bodies = binary_pair()?;
                bodies.push(Body::new(0.1, Vec2::ZERO, PLANET_MASS, Vec2::ZERO, GREEN)?);
                (config, bodies)
            }
            Preset::HeadOn => (
                config.with_gravity(GravityModel::None),
                vec![
                    Body::new(0.1, Vec2::new(-0.5, 0.0), 5.0, Vec2::new(4.0, 0.0), CYAN)?,
                    Body::new(0.1, Vec2::new(0.5, 0.0), 5.0, Vec2::new(-4.0, 0.0), RED)?,
                ],
            ),
            Preset::Rain => (
                config
                    .with_gravity(GravityModel::Uniform { g: 1.5 })
                    .with_wall_restitution(0.8),
                rain(5, 3, 7)?,
            ),
        };

        Ok(Scenario {
            name: self.name().to_string(),
            config,
            bodies,
        })
    }
}

fn binary_pair() -> Result<Vec<Body>, BodyError> {
    Ok(vec![
        Body::new(0.1, Vec2::new(0.0, 0.5), PLANET_MASS, Vec2::new(1.0, 0.0), CYAN)?,
        Body::new(0.1, Vec2::new(0.0, -0.5), PLANET_MASS, Vec2::new(-1.0, 0.0), RED)?,
    ])
}

/// Columns of balls stacked with gaps, dropped from rest.
///
/// Balls in a column share the same x, so every contact normal is vertical
/// and the stacks only ever move up and down.
fn rain(columns: usize, per_column: usize, seed: u64) -> Result<Vec<Body>, BodyError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bodies = Vec::with_capacity(columns * per_column);
    let spacing = 2.0 / columns as f32;

    for column in 0..columns {
        let x = -1.0 + spacing * (column as f32 + 0.5);
        let mut y: f32 = rng.gen_range(-0.5..0.0);
        let mut previous_radius = 0.0;

        for _ in 0..per_column {
            let radius = rng.gen_range(0.04..0.09);
            if previous_radius > 0.0 {
                y += previous_radius + radius + rng.gen_range(0.05..0.2);
            }
            // Mass scales with area so big balls push small ones around
            let mass = 400.0 * radius * radius;
            let color = [rng.gen_range(0.3..1.0), rng.gen_range(0.3..1.0), rng.gen_range(0.3..1.0)];
            bodies.push(Body::new(radius, Vec2::new(x, y), mass, Vec2::ZERO, color)?);
            previous_radius = radius;
        }
    }

    Ok(bodies)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    name: Option<String>,
    #[serde(default)]
    config: SimConfig,
    #[serde(default)]
    bodies: Vec<BodySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BodySpec {
    radius: f32,
    position: [f32; 2],
    mass: f32,
    #[serde(default)]
    velocity: [f32; 2],
    #[serde(default = "default_color")]
    color: Color,
}

fn default_color() -> Color {
    WHITE
}

impl Scenario {
    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = toml::from_str(text)?;
        file.config.validate()?;

        if file.bodies.is_empty() {
            return Err(ScenarioError::Empty);
        }

        let bodies = file
            .bodies
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                Body::new(
                    spec.radius,
                    Vec2::from(spec.position),
                    spec.mass,
                    Vec2::from(spec.velocity),
                    spec.color,
                )
                .map_err(|source| ScenarioError::Body { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: file.name.unwrap_or_else(|| "custom".to_string()),
            config: file.config,
            bodies,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let scenario = Self::from_toml_str(&text)?;
        log::info!(
            "loaded scenario '{}' from {} ({} bodies)",
            scenario.name,
            path.display(),
            scenario.bodies.len()
        );
        Ok(scenario)
    }
}
