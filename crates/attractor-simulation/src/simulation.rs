//! CPU particle system: per-step force aggregation, integration, containment

use attractor_physics::{
    aggregate, decay_impulses, ForceSource, Particle, BOUNDARY_DAMPING, CAPTURE_DAMPING,
    FIELD_EXTENT_SCALE,
};
use glam::Vec3;

use crate::mesh::{MeshAttractor, MeshEffect};
use crate::params::SystemParams;

/// The particle population plus the force state acting on it.
///
/// The population is fixed at construction: `grid_side³` particles on a
/// centered unit-spacing grid, contained in an axis-aligned box spanning
/// ±2·grid_side per axis. Impulses pushed from outside decay every step;
/// the optional center-of-mass attractor is rebuilt fresh each step.
///
/// `step` is synchronous and deterministic; callers invoke it once per frame
/// with the elapsed seconds and bind the returned positions to their
/// instancing buffer.
pub struct ParticleSystem {
    pub(crate) particles: Vec<Particle>,
    pnum: usize,
    impulses: Vec<ForceSource>,
    comass_force: Option<ForceSource>,
    comass_enabled: bool,
    gravity: Vec3,
    gravity_magnitude: f32,
    min_bound: Vec3,
    max_bound: Vec3,
    mesh: MeshAttractor,
}

impl ParticleSystem {
    pub fn new(grid_side: u32, elastic: bool) -> Self {
        Self::with_params(SystemParams { grid_side, elastic })
    }

    pub fn with_params(params: SystemParams) -> Self {
        let side = params.grid_side;
        let pnum = (side * side * side) as usize;
        let half = side as f32 / 2.0;
        let extent = side as f32 * FIELD_EXTENT_SCALE;

        let mut particles = Vec::with_capacity(pnum);
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    let origin =
                        Vec3::new(x as f32 - half, y as f32 - half, z as f32 - half);
                    particles.push(Particle::new(origin, params.elastic));
                }
            }
        }

        log::info!(
            "Initialized {pnum} particles ({side}x{side}x{side} grid, elastic: {}), field ±{extent}",
            params.elastic
        );

        Self {
            particles,
            pnum,
            impulses: Vec::new(),
            comass_force: None,
            comass_enabled: false,
            gravity: Vec3::new(0.0, -1.0, 0.0),
            gravity_magnitude: 0.0,
            min_bound: Vec3::splat(-extent),
            max_bound: Vec3::splat(extent),
            mesh: MeshAttractor::default(),
        }
    }

    /// Advance the whole system one timestep and return the new positions in
    /// particle order (always `pnum` entries).
    pub fn step(&mut self, step: f32) -> Vec<Vec3> {
        // Reduce all active sources to the one force shared by every particle
        let combined = aggregate(self.comass_force.iter().chain(self.impulses.iter()));

        self.gravity = self.gravity.normalize_or_zero();
        let gravity = self.gravity * self.gravity_magnitude;

        let mut positions = Vec::with_capacity(self.pnum);
        let mut position_sum = Vec3::ZERO;

        for (i, particle) in self.particles.iter_mut().enumerate() {
            let force = if self.mesh.enabled() {
                match self
                    .mesh
                    .apply(i, self.pnum, particle.position, particle.mass, combined)
                {
                    MeshEffect::Captured => {
                        // Held by the target: bleed off speed, keep the
                        // aggregate force as-is
                        particle.velocity *= CAPTURE_DAMPING;
                        combined
                    }
                    MeshEffect::Blended(force) => force,
                }
            } else {
                combined
            };

            let motion = particle.integrate(step, &force, gravity);
            let clamped = motion.position.clamp(self.min_bound, self.max_bound);
            let mut velocity = motion.velocity;
            // Wall hits are detected by comparing vector lengths, not per
            // axis; magnitude cancellation can miss a clamped axis
            if clamped.length() != motion.position.length() {
                velocity *= BOUNDARY_DAMPING;
            }

            particle.position = clamped;
            particle.velocity = velocity;
            positions.push(clamped);
            position_sum += clamped;
        }

        // Rebuild the force state for the next step: a fresh center-of-mass
        // attractor (when enabled) and the surviving decayed impulses
        self.comass_force = self.comass_enabled.then(|| {
            let mass = self.particles[0].mass;
            ForceSource::CenterOfMass {
                position: position_sum / self.pnum as f32,
                magnitude: mass * mass * self.pnum as f32,
            }
        });

        let before = self.impulses.len();
        decay_impulses(&mut self.impulses);
        if self.impulses.len() < before {
            log::debug!(
                "pruned {} spent impulse(s), {} remain",
                before - self.impulses.len(),
                self.impulses.len()
            );
        }

        positions
    }

    /// Queue a decaying impulse. Positive magnitudes attract, negative repel.
    pub fn push_force(&mut self, position: Vec3, magnitude: f32) {
        log::debug!("impulse at {position:?}, magnitude {magnitude}");
        self.impulses.push(ForceSource::Impulse {
            position,
            magnitude,
        });
    }

    /// Set the gravity direction; renormalized on every step.
    pub fn set_gravity(&mut self, direction: Vec3) {
        self.gravity = direction;
    }

    pub fn set_gravity_magnitude(&mut self, magnitude: f32) {
        self.gravity_magnitude = magnitude;
    }

    pub fn set_center_of_mass_enabled(&mut self, enabled: bool) {
        self.comass_enabled = enabled;
    }

    /// Replace the mesh target points from a flat stride-4 position buffer;
    /// an empty buffer disables mesh attraction.
    pub fn set_mesh(&mut self, flat: &[f32]) {
        self.mesh.set_points(flat);
        if self.mesh.enabled() {
            log::info!("mesh attraction enabled ({} target points)", self.mesh.point_count());
        } else {
            log::info!("mesh attraction disabled");
        }
    }

    pub fn particle_count(&self) -> usize {
        self.pnum
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min_bound, self.max_bound)
    }

    /// Active force sources, center-of-mass attractor first when present.
    pub fn force_sources(&self) -> impl Iterator<Item = &ForceSource> {
        self.comass_force.iter().chain(self.impulses.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < 1e-4,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_grid_is_built_x_fastest() {
        let system = ParticleSystem::new(2, false);

        assert_eq!(system.particle_count(), 8);
        let expected = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        for (particle, want) in system.particles().iter().zip(expected) {
            assert_eq!(particle.position, want);
            assert_eq!(particle.origin, want);
        }
    }

    #[test]
    fn test_bounds_scale_with_grid_side() {
        let system = ParticleSystem::new(3, false);
        let (min_bound, max_bound) = system.bounds();
        assert_eq!(min_bound, Vec3::splat(-6.0));
        assert_eq!(max_bound, Vec3::splat(6.0));
    }

    #[test]
    fn test_zero_step_returns_the_untouched_grid() {
        let mut system = ParticleSystem::new(2, false);
        let grid: Vec<Vec3> = system.particles().iter().map(|p| p.origin).collect();

        // Repeated zero steps with no forces and no gravity never move anything
        for _ in 0..3 {
            let positions = system.step(0.0);
            assert_eq!(positions, grid);
        }
    }

    #[test]
    fn test_canceling_impulses_produce_no_motion() {
        let mut system = ParticleSystem::new(2, false);
        system.push_force(Vec3::new(3.0, 0.0, 0.0), 1000.0);
        system.push_force(Vec3::new(3.0, 0.0, 0.0), -1000.0);
        let grid: Vec<Vec3> = system.particles().iter().map(|p| p.origin).collect();

        let positions = system.step(0.5);

        // Zero aggregate magnitude means zero acceleration everywhere
        assert_eq!(positions, grid);
    }

    #[test]
    fn test_impulse_decays_to_nothing_in_three_steps() {
        let mut system = ParticleSystem::new(2, false);
        system.push_force(Vec3::new(100.0, 0.0, 0.0), 1000.0);

        system.step(0.0);
        let magnitudes: Vec<f32> = system.force_sources().map(|f| f.magnitude()).collect();
        assert_eq!(magnitudes, vec![100.0]);

        system.step(0.0);
        let magnitudes: Vec<f32> = system.force_sources().map(|f| f.magnitude()).collect();
        assert_eq!(magnitudes, vec![10.0]);

        system.step(0.0);
        assert_eq!(system.force_sources().count(), 0);
    }

    #[test]
    fn test_wall_hit_clamps_position_and_halves_velocity() {
        let mut system = ParticleSystem::new(2, false);
        system.particles[0].velocity = Vec3::new(100.0, 0.0, 0.0);

        let positions = system.step(1.0);

        // Damping takes the velocity to 99 before the kinematic update, which
        // runs the particle from x = -1 far past the +4 wall
        assert_eq!(positions[0], Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(system.particles[0].position, positions[0]);
        assert_vec3_near(system.particles[0].velocity, Vec3::new(49.5, 0.0, 0.0));
    }

    #[test]
    fn test_comass_attractor_tracks_the_mean_position() {
        let mut system = ParticleSystem::new(2, false);
        system.set_center_of_mass_enabled(true);

        // No attractor exists until a step has measured the population
        assert_eq!(system.force_sources().count(), 0);

        let positions = system.step(0.0);
        let mean = positions.iter().sum::<Vec3>() / positions.len() as f32;

        let comass = system.force_sources().next().expect("comass force");
        assert!(matches!(comass, ForceSource::CenterOfMass { .. }));
        assert_vec3_near(comass.position(), mean);
        // mass₀² · pnum with unit masses
        assert_eq!(comass.magnitude(), 8.0);

        // Disabling drops it on the next step
        system.set_center_of_mass_enabled(false);
        system.step(0.0);
        assert_eq!(system.force_sources().count(), 0);
    }

    #[test]
    fn test_comass_updates_after_motion() {
        let mut system = ParticleSystem::new(2, false);
        system.set_center_of_mass_enabled(true);
        system.push_force(Vec3::new(50.0, 0.0, 0.0), 100_000.0);

        system.step(0.1);
        let positions = system.step(0.1);
        let mean = positions.iter().sum::<Vec3>() / positions.len() as f32;

        let comass = system.force_sources().next().expect("comass force");
        assert_vec3_near(comass.position(), mean);
    }

    #[test]
    fn test_mesh_disable_restores_plain_behavior() {
        let mut meshed = ParticleSystem::new(2, false);
        let mut plain = ParticleSystem::new(2, false);

        meshed.set_mesh(&[1.0, 2.0, 3.0, 1.0, 4.0, 5.0, 6.0, 1.0]);
        meshed.set_mesh(&[]);

        meshed.push_force(Vec3::new(5.0, 1.0, 0.0), 2000.0);
        plain.push_force(Vec3::new(5.0, 1.0, 0.0), 2000.0);

        for _ in 0..4 {
            let a = meshed.step(0.05);
            let b = plain.step(0.05);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_mesh_capture_damps_velocity_in_place() {
        let mut system = ParticleSystem::new(2, false);
        // Every particle targets the first particle's own position
        let target = system.particles[0].position;
        system.set_mesh(&[target.x, target.y, target.z, 1.0]);
        system.particles[0].velocity = Vec3::new(2.0, 0.0, 0.0);

        system.step(0.0);

        // Captured: velocity scaled by 0.9, position untouched at step 0
        assert_vec3_near(system.particles[0].velocity, Vec3::new(1.8, 0.0, 0.0));
        assert_eq!(system.particles[0].position, target);
    }

    #[test]
    fn test_mesh_pulls_distant_particles_toward_targets() {
        let mut system = ParticleSystem::new(2, false);
        system.set_mesh(&[10.0, 0.0, 0.0, 1.0]);

        system.step(0.1);

        // With no other forces every particle accelerates toward the target
        for particle in system.particles() {
            assert!(particle.velocity.x > 0.0);
        }
    }

    #[test]
    fn test_step_output_length_matches_population() {
        let mut system = ParticleSystem::new(3, true);
        assert_eq!(system.step(0.016).len(), 27);
    }
}
