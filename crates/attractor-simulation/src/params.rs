//! System construction parameters

/// Options fixed when a [`crate::ParticleSystem`] is built.
#[derive(Debug, Clone, Copy)]
pub struct SystemParams {
    /// Cube root of the particle count; the population is a grid_side³ grid
    pub grid_side: u32,
    /// Whether particles are pulled back toward their rest positions
    pub elastic: bool,
}

impl Default for SystemParams {
    fn default() -> Self {
        Self {
            grid_side: 10, // 1000 particles
            elastic: false,
        }
    }
}
