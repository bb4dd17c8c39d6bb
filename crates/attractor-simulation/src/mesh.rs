//! Mesh attraction: per-particle targets sampled from an external surface

use attractor_physics::{
    EffectiveForce, CAPTURE_RADIUS, MESH_WEIGHT_MIN_DISTANCE, MESH_WEIGHT_SCALE,
};
use glam::Vec3;

/// Distance-weighted attraction toward a sampled target surface.
///
/// Each particle is assigned one target point by index; the attraction is
/// blended into the particle's effective force, except close to the target
/// where the particle is held by damping instead. Disabled while the point
/// list is empty.
#[derive(Debug, Default, Clone)]
pub struct MeshAttractor {
    points: Vec<Vec3>,
}

/// Outcome of mesh attraction for one particle on one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshEffect {
    /// Near the target with no overwhelming global force: damp the velocity
    /// and integrate against the unmodified aggregate
    Captured,
    /// Target blended into the effective force
    Blended(EffectiveForce),
}

impl MeshAttractor {
    /// Replace the target points from a flat position buffer.
    ///
    /// Reads 3 coordinates out of every 4 input slots; the 4th slot is the
    /// geometry buffer's homogeneous component and is ignored. An empty
    /// buffer disables mesh attraction entirely.
    pub fn set_points(&mut self, flat: &[f32]) {
        self.points.clear();
        for chunk in flat.chunks_exact(4) {
            self.points.push(Vec3::new(chunk[0], chunk[1], chunk[2]));
        }
    }

    pub fn enabled(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Target point for particle `index` out of a population of `pnum`.
    ///
    /// Particles are spread evenly over the point list in index order.
    pub fn target(&self, index: usize, pnum: usize) -> Vec3 {
        self.points[index * self.points.len() / pnum]
    }

    /// Resolve the mesh's influence on one particle.
    ///
    /// A particle within [`CAPTURE_RADIUS`] of its target is captured unless
    /// the aggregate magnitude exceeds what the population can hold against
    /// (`pnum · mass`). Otherwise the target is folded into the effective
    /// force with weight `MESH_WEIGHT_SCALE · max(d, MESH_WEIGHT_MIN_DISTANCE)`.
    pub fn apply(
        &self,
        index: usize,
        pnum: usize,
        position: Vec3,
        mass: f32,
        combined: EffectiveForce,
    ) -> MeshEffect {
        let target = self.target(index, pnum);
        let d = position.distance(target);

        if d < CAPTURE_RADIUS && combined.magnitude <= pnum as f32 * mass {
            return MeshEffect::Captured;
        }

        let mesh_weight = MESH_WEIGHT_SCALE * d.max(MESH_WEIGHT_MIN_DISTANCE);
        let magnitude = combined.magnitude + mesh_weight;
        let location = (combined.location * combined.magnitude + target * mesh_weight) / magnitude;
        MeshEffect::Blended(EffectiveForce {
            location,
            magnitude,
        })
    }
}
