//! Attractor Particle System
//!
//! Headless driver for the CPU core: builds an n³ particle grid, injects
//! random impulses the way clicks would, and advances the system in real
//! time while reporting its state.

use attractor_simulation::ParticleSystem;
use glam::Vec3;
use rand::Rng;

const DEFAULT_GRID_SIDE: u32 = 10;
const DEFAULT_FRAMES: u32 = 600;
/// Nominal frame duration fed to the integrator
const FRAME_SECONDS: f32 = 1.0 / 60.0;
/// Elapsed time is slowed by this factor before integration
const TIME_SCALE: f32 = 10.0;
/// Impulse magnitude per grid side unit (the click convention)
const CLICK_FORCE_SCALE: f32 = 100_000.0;
/// Frames between random impulse injections
const IMPULSE_INTERVAL: u32 = 60;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let grid_side: u32 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_GRID_SIDE);
    let frames: u32 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut system = ParticleSystem::new(grid_side, false);
    system.set_gravity(Vec3::new(0.0, -1.0, 0.0));
    system.set_center_of_mass_enabled(true);

    // Prime the instancing data with the untouched grid, like the first
    // frame of the interactive app
    let initial = system.step(0.0);
    log::info!("initial frame: {} instances", initial.len());

    let mut rng = rand::rng();
    let (min_bound, max_bound) = system.bounds();
    let step = FRAME_SECONDS / TIME_SCALE;

    for frame in 0..frames {
        if frame % IMPULSE_INTERVAL == 0 {
            let position = Vec3::new(
                rng.random_range(min_bound.x..=max_bound.x),
                rng.random_range(min_bound.y..=max_bound.y),
                rng.random_range(min_bound.z..=max_bound.z),
            );
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            system.push_force(position, sign * CLICK_FORCE_SCALE * grid_side as f32);
        }

        let positions = system.step(step);

        if (frame + 1) % IMPULSE_INTERVAL == 0 {
            let mean = positions.iter().sum::<Vec3>() / positions.len() as f32;
            let colors = system.velocity_colors();
            let peak = colors
                .iter()
                .map(|c| c.r.max(c.g).max(c.b))
                .fold(0.0f32, f32::max);
            log::info!(
                "frame {:>4}: mean position {:>7.3?}, {} active force(s), peak color {peak:.3}",
                frame + 1,
                mean,
                system.force_sources().count(),
            );
        }
    }
}
