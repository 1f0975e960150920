//! 2D N-body Gravity Simulation
//!
//! Circles attract each other, collide, and bounce off the edges of the
//! normalized viewport. Rendered with wgpu.
//!
//! Controls:
//! - Space: Pause/resume simulation
//! - Period: Advance one step while paused
//! - 1/2/3/4: Load binary / three-body / head-on / rain presets
//! - G: Cycle gravity model (mutual → uniform → none)
//! - R: Reset current scenario
//!
//! Set `RUST_LOG=gravity_sim=debug` for per-second energy and momentum logs.

mod renderer;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use common::{Camera2D, GraphicsContext};
use gravity_sim::config::DEFAULT_G;
use gravity_sim::{GravityModel, Preset, Scenario, SimConfig, Simulation};
use renderer::Renderer;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const MAX_BODIES: usize = 256;

/// Frame times above this are reported; the step itself is always clamped
const SPIKE_WARN_SECS: f32 = 0.25;

const STATS_EVERY_FRAMES: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum GravityArg {
    Mutual,
    Uniform,
    None,
}

#[derive(Parser, Debug)]
#[command(version, about = "Real-time 2D N-body simulation with collisions")]
struct Args {
    /// Built-in starting configuration
    #[arg(short, long, value_enum, default_value_t = Preset::Binary)]
    preset: Preset,

    /// TOML scenario file; takes precedence over --preset
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Gravity model
    #[arg(long, value_enum)]
    gravity: Option<GravityArg>,

    /// Gravity strength (G for mutual, g for uniform)
    #[arg(short = 'g', long = "strength")]
    strength: Option<f32>,

    /// Speed kept when bouncing off a wall, in [0, 1]
    #[arg(long)]
    wall_restitution: Option<f32>,

    /// Restitution for body-body collisions, in [0, 1]
    #[arg(long)]
    collision_restitution: Option<f32>,

    /// Largest timestep fed to the integrator, in seconds
    #[arg(long)]
    max_dt: Option<f32>,
}

impl Args {
    /// Layer the command-line overrides on top of a scenario's config
    fn apply(&self, mut config: SimConfig) -> SimConfig {
        let strength = self.strength.unwrap_or(match config.gravity {
            GravityModel::None => DEFAULT_G,
            other => other.strength(),
        });

        config.gravity = match self.gravity {
            Some(GravityArg::Mutual) => GravityModel::Mutual { g: strength },
            Some(GravityArg::Uniform) => GravityModel::Uniform { g: strength },
            Some(GravityArg::None) => GravityModel::None,
            None => match config.gravity {
                GravityModel::Mutual { .. } => GravityModel::Mutual { g: strength },
                GravityModel::Uniform { .. } => GravityModel::Uniform { g: strength },
                GravityModel::None => GravityModel::None,
            },
        };

        if let Some(e) = self.wall_restitution {
            config.wall_restitution = e;
        }
        if let Some(e) = self.collision_restitution {
            config.collision_restitution = e;
        }
        if let Some(max_dt) = self.max_dt {
            config.max_dt = max_dt;
        }
        config
    }

    fn scenario_for(&self, preset: Preset) -> Result<Scenario> {
        let mut scenario = preset
            .build()
            .with_context(|| format!("failed to build preset '{}'", preset.name()))?;
        scenario.config = self.apply(scenario.config);
        scenario.config.validate().context("invalid command-line override")?;
        Ok(scenario)
    }

    fn initial_scenario(&self) -> Result<Scenario> {
        match &self.scenario {
            Some(path) => {
                let mut scenario = Scenario::load(path)?;
                scenario.config = self.apply(scenario.config);
                scenario.config.validate().context("invalid command-line override")?;
                Ok(scenario)
            }
            None => self.scenario_for(self.preset),
        }
    }
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    simulation: Simulation,
    camera: Camera2D,
    args: Args,
    /// What R resets to
    scenario: Scenario,
    paused: bool,
}

impl App {
    fn new(ctx: GraphicsContext, args: Args, scenario: Scenario) -> Self {
        let renderer = Renderer::new(&ctx, MAX_BODIES);
        let camera = Camera2D::new(ctx.aspect_ratio(), scenario.config.bounds.half_extent);
        let simulation = Simulation::new(scenario.bodies.clone(), scenario.config);

        log::info!(
            "running '{}' with {} bodies, {} gravity",
            scenario.name,
            scenario.bodies.len(),
            scenario.config.gravity.name()
        );

        Self {
            ctx,
            renderer,
            simulation,
            camera,
            args,
            scenario,
            paused: false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
    }

    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        if dt > SPIKE_WARN_SECS {
            log::warn!(
                "frame took {:.3}s, stepping only {:.3}s",
                dt,
                self.simulation.config().max_dt
            );
        }
        self.advance(dt);
    }

    fn advance(&mut self, dt: f32) {
        let stats = self.simulation.step(dt);
        if self.simulation.frame % STATS_EVERY_FRAMES == 0 {
            let momentum = self.simulation.total_momentum();
            log::debug!(
                "t={:.2}s frame={} energy={:.4} momentum=({:.4}, {:.4}) walls={} contacts={}",
                self.simulation.time,
                self.simulation.frame,
                self.simulation.kinetic_energy(),
                momentum.x,
                momentum.y,
                stats.wall_hits,
                stats.contacts
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        self.renderer.update_instances(
            &self.ctx.queue,
            &self.simulation.config().bounds,
            &self.simulation.bodies,
        );

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            KeyCode::Period if self.paused => {
                let dt = self.simulation.config().max_dt;
                self.advance(dt);
            }
            KeyCode::KeyR => self.load(self.scenario.clone()),
            KeyCode::KeyG => {
                let config = *self.simulation.config();
                let gravity = config.gravity.cycle();
                self.simulation.set_config(config.with_gravity(gravity));
                log::info!("gravity model: {}", gravity.name());
            }
            KeyCode::Digit1 => self.load_preset(1),
            KeyCode::Digit2 => self.load_preset(2),
            KeyCode::Digit3 => self.load_preset(3),
            KeyCode::Digit4 => self.load_preset(4),
            _ => {}
        }
    }

    fn load_preset(&mut self, index: usize) {
        let Some(preset) = Preset::from_index(index) else {
            return;
        };
        match self.args.scenario_for(preset) {
            Ok(scenario) => {
                self.scenario = scenario.clone();
                self.load(scenario);
            }
            Err(e) => log::error!("{e:#}"),
        }
    }

    fn load(&mut self, scenario: Scenario) {
        log::info!("loading '{}' ({} bodies)", scenario.name, scenario.bodies.len());
        self.camera.extent = scenario.config.bounds.half_extent;
        self.simulation = Simulation::new(scenario.bodies, scenario.config);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let scenario = args.initial_scenario()?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Gravity Simulation - Rust/wgpu",
        800,
        800,
    ))
    .context("failed to initialize graphics")?;

    let mut app = App::new(ctx, args, scenario);
    let mut last_time = Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => app.resize(size),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key),
                            state,
                            ..
                        },
                    ..
                } => app.handle_key(key, state),
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let dt = (now - last_time).as_secs_f32();
                    last_time = now;

                    app.update(dt);
                    match app.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, exiting");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("render error: {e:?}"),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
