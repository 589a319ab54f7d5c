//! Game session: one playthrough's worth of state and the handlers that
//! drive it
//!
//! Owns the board, score, selection, RNG and impulse scheduler so click and
//! frame handlers take an explicit `&mut GameSession` instead of reaching
//! for globals. All mutation of the world collaborator funnels through
//! here, keeping the board and the world in lockstep.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::board::{Block, BlockColor, BlockId, Board};
use super::impulse::ImpulseScheduler;
use super::rules::{self, ClickOutcome, Selection};
use super::score::Score;
use super::sweep;
use crate::consts::*;
use crate::layout::Layout;
use crate::loader::LoadError;
use crate::world::World;

/// Token tying a layout fetch to the load that requested it. A ticket from
/// a superseded load is rejected when the response finally arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Things that happened this frame, for the host UI to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    LayoutLoaded { blocks: usize },
    BlockArmed(BlockId),
    SelectionCleared,
    BlocksMatched { first: BlockId, second: BlockId },
    Mismatched { first: BlockId, second: BlockId },
    BlockFell(BlockId),
    Repainted,
    GameOver,
}

pub struct GameSession {
    board: Board,
    score: Score,
    selection: Selection,
    rng: Pcg32,
    impulses: ImpulseScheduler,
    impulses_enabled: bool,
    latest_generation: u64,
    next_block_id: u32,
    frame_count: u64,
    events: Vec<GameEvent>,
    game_over_announced: bool,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self {
            board: Board::new(),
            score: Score::default(),
            selection: Selection::Idle,
            rng: Pcg32::seed_from_u64(seed),
            impulses: ImpulseScheduler::new(IMPULSE_INTERVAL_TICKS),
            impulses_enabled: false,
            latest_generation: 0,
            next_block_id: 0,
            frame_count: 0,
            events: Vec::new(),
            game_over_announced: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> i32 {
        self.score.value()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_game_over(&self) -> bool {
        rules::is_game_over(&self.board)
    }

    /// Turn the periodic random kicks on or off.
    pub fn set_impulses_enabled(&mut self, enabled: bool) {
        self.impulses_enabled = enabled;
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn alloc_block_id(&mut self) -> BlockId {
        self.next_block_id += 1;
        BlockId(self.next_block_id)
    }

    /// Start a new load. Any ticket from an earlier `begin_load` becomes
    /// stale and its layout, should it ever arrive, will be refused.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_generation += 1;
        LoadTicket {
            generation: self.latest_generation,
        }
    }

    /// Replace the board with `layout`. Disposes every current block,
    /// clears the selection, zeroes the score and spawns one block per
    /// descriptor, stacking rows vertically. Returns the number of blocks
    /// spawned.
    pub fn apply_layout<W: World>(
        &mut self,
        ticket: LoadTicket,
        layout: &Layout,
        world: &mut W,
    ) -> Result<usize, LoadError> {
        if ticket.generation != self.latest_generation {
            log::warn!(
                "discarding layout from superseded load (generation {} < {})",
                ticket.generation,
                self.latest_generation
            );
            return Err(LoadError::Stale);
        }

        for block in self.board.clear() {
            world.remove_block(block.id);
        }
        self.impulses.clear();
        self.selection = Selection::Idle;
        self.score.reset();
        self.game_over_announced = false;

        for (row, specs) in layout.rows().iter().enumerate() {
            for spec in specs {
                let id = self.alloc_block_id();
                let block = Block {
                    id,
                    color: spec.color,
                    size: spec.size,
                };
                world.add_block(id, layout_position(row, spec), spec.size, spec.color);
                self.board.insert(block);
                self.impulses.register(id, self.frame_count);
            }
        }

        let count = self.board.len();
        log::info!("loaded layout: {count} blocks, {} colors", self.board.palette().len());
        self.events.push(GameEvent::LayoutLoaded { blocks: count });
        Ok(count)
    }

    /// Handle a pointer-down already translated to a world-space ray by the
    /// rendering collaborator. The nearest intersected block wins.
    pub fn handle_click<W: World>(&mut self, world: &mut W, origin: Vec3, dir: Vec3) {
        let hit = world
            .cast_ray(origin, dir)
            .into_iter()
            .map(|h| h.block)
            .find(|id| self.board.contains(*id));

        match rules::resolve_click(&mut self.selection, &self.board, hit) {
            ClickOutcome::Ignored => {}
            ClickOutcome::Armed(id) => {
                self.events.push(GameEvent::BlockArmed(id));
            }
            ClickOutcome::Deselected(_) => {
                self.events.push(GameEvent::SelectionCleared);
            }
            ClickOutcome::Mismatched { first, second } => {
                self.events.push(GameEvent::Mismatched { first, second });
            }
            ClickOutcome::Matched { first, second, .. } => {
                self.eliminate(world, first);
                self.eliminate(world, second);
                self.score.add(MATCH_REWARD);
                self.events.push(GameEvent::BlocksMatched { first, second });

                if self.is_game_over() {
                    self.announce_game_over();
                } else {
                    self.repaint_all(world);
                }
            }
        }
    }

    /// Advance one frame: step the physics world, run due impulses, then
    /// sweep blocks that dropped off the table.
    pub fn frame<W: World>(&mut self, world: &mut W) {
        world.step();
        self.frame_count += 1;

        if self.impulses_enabled {
            self.run_impulses(world);
        }
        self.sweep_fallen(world);
    }

    fn run_impulses<W: World>(&mut self, world: &mut W) {
        for id in self.impulses.due(self.frame_count) {
            let Some(block) = self.board.get(id).copied() else {
                continue;
            };
            let Some(pos) = world.block_position(id) else {
                continue;
            };
            // Only kick blocks resting on the table.
            if pos.y - block.size / 2.0 > TABLE_TOP + REST_EPSILON {
                continue;
            }
            if let Some(color) = self.random_palette_color() {
                self.board.repaint(id, color);
                world.set_block_color(id, color);
            }
            let strength = self.rng.random_range(0.0..IMPULSE_FORCE);
            world.apply_impulse(id, Vec3::new(0.0, strength, 0.0));
        }
    }

    fn sweep_fallen<W: World>(&mut self, world: &mut W) {
        let heights = self
            .board
            .active_blocks()
            .filter_map(|b| world.block_position(b.id).map(|p| (b.id, p.y)))
            .collect::<Vec<_>>();

        let fallen = sweep::fallen_blocks(heights.into_iter(), FALL_THRESHOLD);
        let any_fell = !fallen.is_empty();
        for id in fallen {
            self.eliminate(world, id);
            self.score.add(-FALL_PENALTY);
            self.events.push(GameEvent::BlockFell(id));
            if self.selection == Selection::Armed(id) {
                self.selection = Selection::Idle;
                self.events.push(GameEvent::SelectionCleared);
            }
        }
        if any_fell && self.is_game_over() {
            self.announce_game_over();
        }
    }

    /// Emit `GameOver` at most once per loaded board.
    fn announce_game_over(&mut self) {
        if !self.game_over_announced {
            self.game_over_announced = true;
            log::info!("game over, score {}", self.score.value());
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Remove a block from the board and tell the world to dispose it.
    fn eliminate<W: World>(&mut self, world: &mut W, id: BlockId) {
        if self.board.remove(id).is_some() {
            self.impulses.unregister(id);
            world.remove_block(id);
        }
    }

    /// Repaint every remaining block with a random palette color.
    fn repaint_all<W: World>(&mut self, world: &mut W) {
        let ids: Vec<BlockId> = self.board.active_blocks().map(|b| b.id).collect();
        for id in ids {
            if let Some(color) = self.random_palette_color() {
                self.board.repaint(id, color);
                world.set_block_color(id, color);
            }
        }
        self.events.push(GameEvent::Repainted);
    }

    fn random_palette_color(&mut self) -> Option<BlockColor> {
        let palette = self.board.palette();
        if palette.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..palette.len());
        Some(palette[idx])
    }
}

/// Spawn position for row `row` of a layout: rows stack upward from the
/// table top, each block resting on the previous row.
pub fn layout_position(row: usize, spec: &crate::layout::BlockSpec) -> Vec3 {
    Vec3::new(
        spec.pos_x,
        TABLE_TOP + spec.size / 2.0 + row as f32 * spec.size,
        spec.pos_z,
    )
}
