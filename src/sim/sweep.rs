//! Fallen-block sweep
//!
//! Two-phase by construction: this module only computes the removal set
//! from a snapshot of block heights; the session applies it afterwards.
//! Filtering a collection while iterating it is how the bug class this
//! replaces was born.

use super::board::BlockId;

/// Collect the ids of blocks whose vertical position has dropped below
/// `threshold`. Positions are sampled once, so running the sweep twice
/// without stepping the world in between removes nothing the second time.
pub fn fallen_blocks(
    positions: impl Iterator<Item = (BlockId, f32)>,
    threshold: f32,
) -> Vec<BlockId> {
    positions
        .filter(|&(_, y)| y < threshold)
        .map(|(id, _)| id)
        .collect()
}
