//! World collaborator seam
//!
//! The game rules never touch a renderer or a rigid-body solver directly;
//! they drive this narrow interface. Block positions are owned by the
//! world, block existence by the board.

use glam::Vec3;

use crate::sim::{BlockColor, BlockId};

#[cfg(feature = "physics")]
pub mod rapier;
#[cfg(feature = "physics")]
pub use rapier::RapierWorld;

/// One ray/block intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub block: BlockId,
    /// Distance from the ray origin along its direction
    pub distance: f32,
}

/// The rendering/physics collaborator.
///
/// Implementations must return ray hits ordered nearest-first, and must
/// tolerate operations on ids they no longer know about (removal is
/// idempotent, queries return `None`).
pub trait World {
    /// Add a dynamic cube body for a block.
    fn add_block(&mut self, id: BlockId, pos: Vec3, size: f32, color: BlockColor);

    /// Dispose a block's body. No-op for unknown ids.
    fn remove_block(&mut self, id: BlockId);

    /// Current position of a block's body, if it still exists.
    fn block_position(&self, id: BlockId) -> Option<Vec3>;

    /// Update the displayed color of a block.
    fn set_block_color(&mut self, id: BlockId, color: BlockColor);

    /// Apply an instantaneous impulse to a block's body.
    fn apply_impulse(&mut self, id: BlockId, impulse: Vec3);

    /// Cast a ray against all block bodies, hits ordered by distance.
    fn cast_ray(&mut self, origin: Vec3, dir: Vec3) -> Vec<RayHit>;

    /// Advance the simulation by one fixed timestep.
    fn step(&mut self);
}
