//! Game rules module
//!
//! All gameplay logic lives here. This module must be deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order / by block id)
//! - No rendering or platform dependencies; physics only via the
//!   `world::World` seam

pub mod board;
pub mod impulse;
pub mod rules;
pub mod score;
pub mod session;
pub mod sweep;

pub use board::{Block, BlockColor, BlockId, Board};
pub use impulse::ImpulseScheduler;
pub use rules::{is_game_over, resolve_click, ClickOutcome, Selection};
pub use score::Score;
pub use session::{GameEvent, GameSession, LoadTicket};
pub use sweep::fallen_blocks;
