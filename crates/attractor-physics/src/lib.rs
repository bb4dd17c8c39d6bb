//! # Attractor Physics
//!
//! Point-mass kinematics and force-source handling for the attractor
//! particle system: inverse-square impulses, global gravity, elastic
//! restoring forces and geometric force decay.

pub mod constants;
pub mod force;
pub mod particle;

pub use constants::*;
pub use force::*;
pub use particle::*;
