//! Board state: the set of blocks currently in play
//!
//! The board owns the logical existence of every block. The world
//! collaborator owns the visual/physical body and is told to dispose it
//! whenever the board drops a block.

use serde::{Deserialize, Serialize};

/// Opaque handle for a block. Unique within a session, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// A `0xRRGGBB` color value.
///
/// Layout files written by hand carry colors either as integers or as
/// strings like `"0xff0000"`, so deserialization accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockColor(pub u32);

impl BlockColor {
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

impl<'de> Deserialize<'de> for BlockColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ColorVisitor;

        impl serde::de::Visitor<'_> for ColorVisitor {
            type Value = BlockColor;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an RRGGBB integer or a \"0xRRGGBB\" string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<BlockColor, E> {
                u32::try_from(v)
                    .map(BlockColor)
                    .map_err(|_| E::custom("color out of range"))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<BlockColor, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom("negative color"))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: serde::de::Error>(self, s: &str) -> Result<BlockColor, E> {
                let parsed = if let Some(hex) = s.strip_prefix("0x").or(s.strip_prefix("0X")) {
                    u32::from_str_radix(hex, 16)
                } else {
                    s.parse::<u32>()
                };
                parsed
                    .map(BlockColor)
                    .map_err(|_| E::custom(format!("invalid color {s:?}")))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

/// A block entity. Its position lives in the world collaborator and is
/// read-only to the game rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub color: BlockColor,
    /// Edge length of the cube
    pub size: f32,
}

/// Active blocks plus the palette of colors seen so far.
///
/// Iteration order is insertion order. The palette grows as layouts are
/// loaded and intentionally survives reloads, so repaints can draw from
/// every color the player has seen.
#[derive(Debug, Clone, Default)]
pub struct Board {
    blocks: Vec<Block>,
    palette: Vec<BlockColor>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block and record its color in the palette.
    pub fn insert(&mut self, block: Block) {
        debug_assert!(!self.contains(block.id), "duplicate block id");
        if !self.palette.contains(&block.color) {
            self.palette.push(block.color);
        }
        self.blocks.push(block);
    }

    /// Remove a block from the active set. Idempotent: removing an id that
    /// is not present returns `None` and changes nothing.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let idx = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(idx))
    }

    /// Drop every active block, returning them for disposal. The palette
    /// is kept.
    pub fn clear(&mut self) -> Vec<Block> {
        std::mem::take(&mut self.blocks)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    /// Change the logical color of an active block.
    pub fn repaint(&mut self, id: BlockId, color: BlockColor) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            block.color = color;
        }
    }

    /// Active blocks in insertion order.
    pub fn active_blocks(&self) -> impl Iterator<Item = &Block> + Clone {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every color ever seen on this board, in discovery order.
    pub fn palette(&self) -> &[BlockColor] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u32, color: u32) -> Block {
        Block {
            id: BlockId(id),
            color: BlockColor(color),
            size: 4.0,
        }
    }

    #[test]
    fn test_insert_and_iteration_order() {
        let mut board = Board::new();
        board.insert(block(1, 0xff0000));
        board.insert(block(2, 0x00ff00));
        board.insert(block(3, 0xff0000));

        let ids: Vec<u32> = board.active_blocks().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut board = Board::new();
        board.insert(block(1, 0xff0000));

        assert!(board.remove(BlockId(1)).is_some());
        assert!(board.remove(BlockId(1)).is_none());
        assert!(board.is_empty());
    }

    #[test]
    fn test_palette_grows_without_duplicates() {
        let mut board = Board::new();
        board.insert(block(1, 0xff0000));
        board.insert(block(2, 0xff0000));
        board.insert(block(3, 0x0000ff));
        assert_eq!(board.palette(), &[BlockColor(0xff0000), BlockColor(0x0000ff)]);
    }

    #[test]
    fn test_palette_survives_clear() {
        let mut board = Board::new();
        board.insert(block(1, 0xff0000));
        let dropped = board.clear();
        assert_eq!(dropped.len(), 1);
        assert!(board.is_empty());
        assert_eq!(board.palette(), &[BlockColor(0xff0000)]);
    }

    #[test]
    fn test_repaint_changes_color() {
        let mut board = Board::new();
        board.insert(block(1, 0xff0000));
        board.repaint(BlockId(1), BlockColor(0x123456));
        assert_eq!(board.get(BlockId(1)).unwrap().color, BlockColor(0x123456));
        // Repainting a missing block is a no-op
        board.repaint(BlockId(9), BlockColor(0));
    }

    #[test]
    fn test_color_string_deserialization() {
        let c: BlockColor = serde_json::from_str("\"0xff00ff\"").unwrap();
        assert_eq!(c, BlockColor(0xff00ff));
        let c: BlockColor = serde_json::from_str("16711680").unwrap();
        assert_eq!(c, BlockColor(0xff0000));
        assert!(serde_json::from_str::<BlockColor>("\"magenta\"").is_err());
    }
}
