//! 2D N-body gravity simulation
//!
//! A fixed set of circular bodies attract each other, collide with impulse
//! response plus positional correction, and bounce off the walls of the
//! normalized viewport `[-1, 1]²`. The physics core is windowing-free; the
//! `gravity_sim` binary wraps it in a winit/wgpu render loop.
//!
//! ```
//! use gravity_sim::{Preset, Simulation};
//!
//! let scenario = Preset::Binary.build().unwrap();
//! let mut sim = Simulation::new(scenario.bodies, scenario.config);
//! for _ in 0..60 {
//!     sim.step(1.0 / 60.0);
//! }
//! assert_eq!(sim.frame, 60);
//! ```

pub mod body;
pub mod boundary;
pub mod collision;
pub mod config;
pub mod force;
pub mod integrator;
pub mod scenario;
pub mod simulation;

pub use body::{Body, BodyError, Color};
pub use boundary::{resolve_boundary, Bounds, Wall};
pub use collision::CollisionParams;
pub use config::{ConfigError, GravityModel, SimConfig};
pub use force::{ForceField, MutualGravity, UniformGravity};
pub use scenario::{Preset, Scenario, ScenarioError};
pub use simulation::{step, Simulation, StepStats};
