//! Tuning constants for the attractor simulation
//!
//! These are scaled for plausible real-time visuals, not physical accuracy.

/// Floor on the force-to-particle distance; keeps near-field acceleration finite
pub const DISTANCE_FLOOR: f32 = 1.0;

/// Inverse-square denominator scale; 0.25 bakes a 4x boost into every force
pub const FORCE_FALLOFF_SCALE: f32 = 0.25;

/// Geometric divisor applied to impulse magnitudes every step
pub const IMPULSE_DECAY: f32 = 10.0;

/// Impulses weaker than this (in absolute value) are pruned
pub const MIN_IMPULSE_MAGNITUDE: f32 = 10.0;

/// Default particle mass
pub const DEFAULT_MASS: f32 = 1.0;

/// Distance inside which a mesh target captures its particle
pub const CAPTURE_RADIUS: f32 = 1.0;

/// Velocity retained per step while captured by a mesh target
pub const CAPTURE_DAMPING: f32 = 0.9;

/// Scale of the mesh attraction weight
pub const MESH_WEIGHT_SCALE: f32 = 100.0;

/// Lower bound on the distance used for mesh weighting
pub const MESH_WEIGHT_MIN_DISTANCE: f32 = 0.1;

/// Velocity retained when boundary clamping changes a position
pub const BOUNDARY_DAMPING: f32 = 0.5;

/// Containment half-extent per grid side unit: an n³ grid lives in ±2n
pub const FIELD_EXTENT_SCALE: f32 = 2.0;

/// Velocity scale for the color projection handed to the renderer
pub const VELOCITY_COLOR_SCALE: f32 = 0.1;
