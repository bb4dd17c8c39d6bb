//! Point-mass state and kinematic integration

use glam::Vec3;

use crate::constants::{DEFAULT_MASS, DISTANCE_FLOOR, FORCE_FALLOFF_SCALE};
use crate::force::EffectiveForce;

/// A single point mass.
///
/// `origin` and `mass` are fixed at construction; `position` and `velocity`
/// evolve every step. When `elastic` is set, a spring-like term pulls the
/// particle back toward its origin.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Rest position the elastic term pulls back toward
    pub origin: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub elastic: bool,
}

/// Post-integration kinematic state, applied back to the particle by the
/// system once containment has been resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Particle {
    pub fn new(origin: Vec3, elastic: bool) -> Self {
        Self {
            origin,
            position: origin,
            velocity: Vec3::ZERO,
            mass: DEFAULT_MASS,
            elastic,
        }
    }

    /// Advance this particle one timestep under the combined force and
    /// gravity, returning the new kinematic state without touching `self`.
    ///
    /// Forces act gravitationally: acceleration falls off with the square of
    /// the distance to the force location, floored at [`DISTANCE_FLOOR`] so a
    /// force sitting on top of a particle cannot produce unbounded
    /// acceleration. A force location exactly equal to the position yields a
    /// zero direction rather than NaN.
    pub fn integrate(&self, step: f32, force: &EffectiveForce, gravity: Vec3) -> Motion {
        let offset = force.location - self.position;
        let dist = offset.length().max(DISTANCE_FLOOR);
        let accel = force.magnitude / (self.mass * dist * dist * FORCE_FALLOFF_SCALE);
        let direction = offset.normalize_or_zero();

        let total_accel = direction * accel + gravity;

        let mut velocity = self.velocity;
        if self.elastic {
            velocity += (self.origin - self.position) * step;
        }
        // Constant-rate decay toward zero, per axis; no floor, so a very
        // large step can overshoot the sign and oscillate
        velocity -= step
            * Vec3::new(
                axis_sign(velocity.x),
                axis_sign(velocity.y),
                axis_sign(velocity.z),
            );

        let position = self.position + total_accel * (0.5 * step * step) + velocity * step;
        let velocity = velocity + total_accel * step;

        Motion { position, velocity }
    }
}

/// Like `f32::signum` but maps 0 to 0, so resting particles stay at rest.
fn axis_sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
