//! Per-frame physics pipeline
//!
//! One call to [`step`] runs the whole frame in a fixed order:
//!
//! 1. clear every body's acceleration
//! 2. accumulate gravity from the configured [`GravityModel`](crate::GravityModel)
//! 3. integrate with the clamped timestep
//! 4. per body: resolve the first wall it touches, then collide it with every
//!    other body
//!
//! Nothing here reads the clock or draws random numbers, so identical inputs
//! give bit-identical trajectories.

use glam::Vec2;

use crate::body::Body;
use crate::boundary::resolve_boundary;
use crate::collision::{collide_with_others, CollisionParams};
use crate::config::SimConfig;
use crate::force::ForceField;
use crate::integrator::integrate_all;

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// Timestep actually used after clamping
    pub dt: f32,
    pub wall_hits: usize,
    /// Ordered pairs that were in contact; a touching pair counts twice
    pub contacts: usize,
}

/// Clamp a frame time to `[0, max_dt]`, mapping NaN and negatives to zero
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Advance `bodies` by one frame
pub fn step(bodies: &mut [Body], config: &SimConfig, dt: f32) -> StepStats {
    let dt = clamp_dt(dt, config.max_dt);
    let mut stats = StepStats {
        dt,
        ..Default::default()
    };
    if dt == 0.0 {
        return stats;
    }

    for body in bodies.iter_mut() {
        body.acceleration = Vec2::ZERO;
    }

    config.gravity.accumulate(bodies);
    integrate_all(bodies, dt);

    let params = CollisionParams::from(config);
    for i in 0..bodies.len() {
        if resolve_boundary(&mut bodies[i], &config.bounds, config.wall_restitution).is_some() {
            stats.wall_hits += 1;
        }
        stats.contacts += collide_with_others(bodies, i, &params);
    }

    stats
}

/// Center of mass of all bodies, or the origin for an empty set
pub fn center_of_mass(bodies: &[Body]) -> Vec2 {
    let mut total_mass = 0.0;
    let mut com = Vec2::ZERO;

    for body in bodies {
        com += body.position * body.mass;
        total_mass += body.mass;
    }

    if total_mass > 0.0 {
        com / total_mass
    } else {
        Vec2::ZERO
    }
}

pub fn total_momentum(bodies: &[Body]) -> Vec2 {
    bodies.iter().map(Body::momentum).sum()
}

pub fn kinetic_energy(bodies: &[Body]) -> f32 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// The physics simulation state: a fixed set of bodies and the config they run under
#[derive(Debug, Clone)]
pub struct Simulation {
    pub bodies: Vec<Body>,
    config: SimConfig,
    /// Simulated seconds, the sum of clamped timesteps
    pub time: f64,
    pub frame: u64,
}

impl Simulation {
    pub fn new(bodies: Vec<Body>, config: SimConfig) -> Self {
        Self {
            bodies,
            config,
            time: 0.0,
            frame: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Swap the configuration for subsequent steps
    pub fn set_config(&mut self, config: SimConfig) {
        self.config = config;
    }

    /// Step the simulation forward by `dt` seconds, clamped to `max_dt`
    pub fn step(&mut self, dt: f32) -> StepStats {
        if dt > self.config.max_dt {
            log::trace!("clamping dt {:.4}s to {:.4}s", dt, self.config.max_dt);
        }
        let stats = step(&mut self.bodies, &self.config, dt);
        self.time += f64::from(stats.dt);
        self.frame += 1;
        stats
    }

    pub fn center_of_mass(&self) -> Vec2 {
        center_of_mass(&self.bodies)
    }

    pub fn total_momentum(&self) -> Vec2 {
        total_momentum(&self.bodies)
    }

    pub fn kinetic_energy(&self) -> f32 {
        kinetic_energy(&self.bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GravityModel;
    use approx::assert_relative_eq;

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body::new(0.1, Vec2::new(x, y), 5.0, Vec2::new(vx, vy), [1.0; 3]).unwrap()
    }

    #[test]
    fn clamp_dt_bounds_spikes() {
        assert_eq!(clamp_dt(0.5, 0.02), 0.02);
        assert_eq!(clamp_dt(0.01, 0.02), 0.01);
        assert_eq!(clamp_dt(-1.0, 0.02), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 0.02), 0.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut bodies = [body(0.0, 0.0, 1.0, 0.0), body(0.5, 0.0, 0.0, 0.0)];
        let before = bodies;
        let stats = step(&mut bodies, &SimConfig::default(), 0.0);
        assert_eq!(stats, StepStats::default());
        assert_eq!(bodies, before);
    }

    #[test]
    fn acceleration_is_recomputed_each_step() {
        let config = SimConfig::default().with_gravity(GravityModel::Uniform { g: 1.0 });
        let mut bodies = [body(0.0, 0.0, 0.0, 0.0)];
        bodies[0].acceleration = Vec2::new(100.0, 100.0);

        step(&mut bodies, &config, 0.01);

        assert_eq!(bodies[0].acceleration, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn large_dt_is_clamped() {
        let config = SimConfig::default().with_gravity(GravityModel::None);
        let mut bodies = [body(0.0, 0.0, 1.0, 0.0)];
        let stats = step(&mut bodies, &config, 1.0);

        assert_eq!(stats.dt, 0.02);
        assert_relative_eq!(bodies[0].position.x, 0.02);
    }

    #[test]
    fn counts_wall_hits_and_contacts() {
        let config = SimConfig::default().with_gravity(GravityModel::None);
        let mut bodies = [
            body(0.0, -0.89, 0.0, -1.0),
            body(-0.5, 0.0, 0.0, 0.0),
            body(-0.35, 0.0, 0.0, 0.0),
        ];
        let stats = step(&mut bodies, &config, 0.02);

        assert_eq!(stats.wall_hits, 1);
        assert!(stats.contacts >= 1);
    }

    #[test]
    fn simulation_tracks_time_and_frames() {
        let mut sim = Simulation::new(
            vec![body(0.0, 0.0, 0.0, 0.0)],
            SimConfig::default().with_gravity(GravityModel::None),
        );
        sim.step(0.01);
        sim.step(0.5);
        assert_eq!(sim.frame, 2);
        assert_relative_eq!(sim.time, 0.03, epsilon = 1e-6);
    }

    #[test]
    fn center_of_mass_weights_by_mass() {
        let mut bodies = [body(-1.0, 0.0, 0.0, 0.0), body(1.0, 0.0, 0.0, 0.0)];
        bodies[1].mass = 15.0;
        assert_relative_eq!(center_of_mass(&bodies).x, 0.5);
        assert_eq!(center_of_mass(&[]), Vec2::ZERO);
    }
}
