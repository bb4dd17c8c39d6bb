//! Force sources and per-step force reduction
//!
//! Every particle integrates against a single aggregated force rather than
//! the full source list; see [`aggregate`].

use glam::Vec3;

use crate::constants::{IMPULSE_DECAY, MIN_IMPULSE_MAGNITUDE};

/// A point force acting on the whole system.
///
/// Positive magnitudes attract, negative repel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceSource {
    /// Externally injected impulse; decays every step until pruned
    Impulse { position: Vec3, magnitude: f32 },
    /// Attractor at the system's center of mass; synthesized fresh each
    /// step, never decayed
    CenterOfMass { position: Vec3, magnitude: f32 },
}

impl ForceSource {
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Impulse { position, .. } | Self::CenterOfMass { position, .. } => *position,
        }
    }

    pub fn magnitude(&self) -> f32 {
        match self {
            Self::Impulse { magnitude, .. } | Self::CenterOfMass { magnitude, .. } => *magnitude,
        }
    }
}

/// The single combined force a particle integrates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveForce {
    pub location: Vec3,
    pub magnitude: f32,
}

/// Reduce all active force sources to one effective force.
///
/// The location is a magnitude-weighted average (weight = |magnitude|); the
/// magnitude is the signed sum. When the signed magnitudes cancel to zero the
/// divide is skipped and the accumulated location is returned as-is, so the
/// result stays finite.
pub fn aggregate<'a>(sources: impl IntoIterator<Item = &'a ForceSource>) -> EffectiveForce {
    let mut magnitude = 0.0;
    let mut location = Vec3::ZERO;
    for source in sources {
        magnitude += source.magnitude();
        location += source.position() * source.magnitude().abs();
    }
    if magnitude != 0.0 {
        location /= magnitude;
    }
    EffectiveForce {
        location,
        magnitude,
    }
}

/// Decay impulses geometrically and drop the ones below the relevance
/// threshold. Center-of-mass entries pass through untouched.
pub fn decay_impulses(sources: &mut Vec<ForceSource>) {
    sources.retain_mut(|source| match source {
        ForceSource::Impulse { magnitude, .. } => {
            *magnitude /= IMPULSE_DECAY;
            magnitude.abs() >= MIN_IMPULSE_MAGNITUDE
        }
        ForceSource::CenterOfMass { .. } => true,
    });
}
