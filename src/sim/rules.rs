//! Selection state machine and the game-over predicate
//!
//! A click arrives here already resolved (by the world collaborator's
//! hit-testing) to at most one block. The rules decide what the click means;
//! applying removals and score changes is the session's job, so a decision
//! never mutates the board it was computed from.

use serde::{Deserialize, Serialize};

use super::board::{Block, BlockColor, BlockId, Board};

/// The armed half of a candidate matching pair, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Idle,
    Armed(BlockId),
}

impl Selection {
    pub fn armed(&self) -> Option<BlockId> {
        match *self {
            Selection::Armed(id) => Some(id),
            Selection::Idle => None,
        }
    }
}

/// What a resolved click means for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click hit nothing; no state change.
    Ignored,
    /// First of a candidate pair selected.
    Armed(BlockId),
    /// The armed block was clicked again; selection cancelled.
    Deselected(BlockId),
    /// Colors matched: both blocks are to be eliminated.
    Matched {
        first: BlockId,
        second: BlockId,
        color: BlockColor,
    },
    /// Colors differed: the selection is consumed, nothing is removed.
    Mismatched { first: BlockId, second: BlockId },
}

/// Advance the selection for one click, already resolved to `hit`.
///
/// If the armed block is no longer on the board (it fell while armed), the
/// stale selection is discarded and the click is treated as a fresh first
/// pick.
pub fn resolve_click(selection: &mut Selection, board: &Board, hit: Option<BlockId>) -> ClickOutcome {
    if let Selection::Armed(armed) = *selection {
        if !board.contains(armed) {
            log::debug!("armed block {armed:?} no longer active, clearing selection");
            *selection = Selection::Idle;
        }
    }

    let Some(hit) = hit else {
        return ClickOutcome::Ignored;
    };
    let Some(clicked) = board.get(hit) else {
        // Hit-test returned a block the board no longer knows about.
        return ClickOutcome::Ignored;
    };

    match *selection {
        Selection::Idle => {
            *selection = Selection::Armed(hit);
            ClickOutcome::Armed(hit)
        }
        Selection::Armed(armed) if armed == hit => {
            // Second click on the same block cancels the selection.
            *selection = Selection::Idle;
            ClickOutcome::Deselected(hit)
        }
        Selection::Armed(armed) => {
            // Any second click consumes the selection, match or not.
            *selection = Selection::Idle;
            let armed_color = board.get(armed).map(|b| b.color);
            if armed_color == Some(clicked.color) {
                ClickOutcome::Matched {
                    first: armed,
                    second: hit,
                    color: clicked.color,
                }
            } else {
                ClickOutcome::Mismatched {
                    first: armed,
                    second: hit,
                }
            }
        }
    }
}

/// True when no eliminable pair remains: fewer than two blocks, or every
/// remaining block's color is unique.
pub fn is_game_over(board: &Board) -> bool {
    if board.len() < 2 {
        return true;
    }
    let blocks: Vec<&Block> = board.active_blocks().collect();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.color == b.color {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board_of(colors: &[u32]) -> Board {
        let mut board = Board::new();
        for (i, &c) in colors.iter().enumerate() {
            board.insert(Block {
                id: BlockId(i as u32 + 1),
                color: BlockColor(c),
                size: 4.0,
            });
        }
        board
    }

    #[test]
    fn test_first_click_arms() {
        let board = board_of(&[0xff0000, 0xff0000]);
        let mut sel = Selection::Idle;
        let outcome = resolve_click(&mut sel, &board, Some(BlockId(1)));
        assert_eq!(outcome, ClickOutcome::Armed(BlockId(1)));
        assert_eq!(sel, Selection::Armed(BlockId(1)));
    }

    #[test]
    fn test_reclick_deselects() {
        let board = board_of(&[0xff0000, 0xff0000]);
        let mut sel = Selection::Armed(BlockId(1));
        let outcome = resolve_click(&mut sel, &board, Some(BlockId(1)));
        assert_eq!(outcome, ClickOutcome::Deselected(BlockId(1)));
        assert_eq!(sel, Selection::Idle);
    }

    #[test]
    fn test_matching_colors() {
        let board = board_of(&[0xff0000, 0xff0000]);
        let mut sel = Selection::Armed(BlockId(1));
        let outcome = resolve_click(&mut sel, &board, Some(BlockId(2)));
        assert_eq!(
            outcome,
            ClickOutcome::Matched {
                first: BlockId(1),
                second: BlockId(2),
                color: BlockColor(0xff0000),
            }
        );
        assert_eq!(sel, Selection::Idle);
    }

    #[test]
    fn test_mismatch_consumes_selection() {
        let board = board_of(&[0xff0000, 0x00ff00]);
        let mut sel = Selection::Armed(BlockId(1));
        let outcome = resolve_click(&mut sel, &board, Some(BlockId(2)));
        assert_eq!(
            outcome,
            ClickOutcome::Mismatched {
                first: BlockId(1),
                second: BlockId(2),
            }
        );
        assert_eq!(sel, Selection::Idle);
    }

    #[test]
    fn test_miss_keeps_selection() {
        let board = board_of(&[0xff0000]);
        let mut sel = Selection::Armed(BlockId(1));
        assert_eq!(resolve_click(&mut sel, &board, None), ClickOutcome::Ignored);
        assert_eq!(sel, Selection::Armed(BlockId(1)));
    }

    #[test]
    fn test_stale_armed_block_rearms() {
        // Armed block fell off the table; the next click is a fresh pick.
        let board = board_of(&[0xff0000, 0xff0000]);
        let mut sel = Selection::Armed(BlockId(99));
        let outcome = resolve_click(&mut sel, &board, Some(BlockId(2)));
        assert_eq!(outcome, ClickOutcome::Armed(BlockId(2)));
    }

    #[test]
    fn test_hit_on_unknown_block_is_ignored() {
        let board = board_of(&[0xff0000]);
        let mut sel = Selection::Idle;
        assert_eq!(
            resolve_click(&mut sel, &board, Some(BlockId(42))),
            ClickOutcome::Ignored
        );
        assert_eq!(sel, Selection::Idle);
    }

    #[test]
    fn test_game_over_small_boards() {
        assert!(is_game_over(&board_of(&[])));
        assert!(is_game_over(&board_of(&[0xff0000])));
        // Two blocks of different colors: no pair can ever match.
        assert!(is_game_over(&board_of(&[0xff0000, 0x00ff00])));
        assert!(!is_game_over(&board_of(&[0xff0000, 0xff0000])));
    }

    #[test]
    fn test_game_over_pair_beyond_first_block() {
        // The pair does not involve block 0; a first-block-only scan would
        // miss it.
        assert!(!is_game_over(&board_of(&[0x111111, 0x222222, 0x222222])));
    }

    proptest! {
        #[test]
        fn prop_duplicate_color_means_not_over(
            mut colors in proptest::collection::vec(0u32..8, 2..20),
            dup_idx in any::<prop::sample::Index>(),
        ) {
            // Force at least one duplicated color.
            let src = dup_idx.index(colors.len());
            let dst = (src + 1) % colors.len();
            let c = colors[src];
            colors[dst] = c;
            prop_assert!(!is_game_over(&board_of(&colors)));
        }

        #[test]
        fn prop_all_distinct_colors_means_over(n in 0usize..20) {
            let colors: Vec<u32> = (0..n as u32).collect();
            prop_assert!(is_game_over(&board_of(&colors)));
        }
    }
}
