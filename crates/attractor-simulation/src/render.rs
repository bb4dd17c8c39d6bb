//! Render extraction: velocity-derived particle colors
//!
//! The rendering layer colors each instance by how fast it is moving; this
//! module projects the simulation state into that buffer without touching it.

use attractor_physics::VELOCITY_COLOR_SCALE;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::simulation::ParticleSystem;

/// Per-particle rgba color, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VelocityColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VelocityColor {
    /// Map a velocity to a color: scale by [`VELOCITY_COLOR_SCALE`], pull
    /// back to unit length once any axis magnitude exceeds 1, then take the
    /// per-axis absolute values with a solid alpha.
    pub fn from_velocity(velocity: Vec3) -> Self {
        let mut v = velocity * VELOCITY_COLOR_SCALE;
        if v.abs().max_element() > 1.0 {
            v = v.normalize();
        }
        Self {
            r: v.x.abs(),
            g: v.y.abs(),
            b: v.z.abs(),
            a: 1.0,
        }
    }
}

impl ParticleSystem {
    /// Color every particle by its velocity, in particle order.
    pub fn velocity_colors(&self) -> Vec<VelocityColor> {
        self.particles()
            .iter()
            .map(|p| VelocityColor::from_velocity(p.velocity))
            .collect()
    }

    /// Flat `[r, g, b, a]` floats per particle, ready for an instanced
    /// color buffer.
    pub fn velocity_magnitudes(&self) -> Vec<f32> {
        bytemuck::cast_slice(&self.velocity_colors()).to_vec()
    }
}
