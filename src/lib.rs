//! Block Match - click pairs of same-colored blocks off a physics table
//!
//! Core modules:
//! - `sim`: Game rules (board, selection, scoring, fall sweep)
//! - `layout`: JSON layout format and spawn placement
//! - `loader`: Layout fetching with stale-response protection
//! - `world`: Rendering/physics collaborator interface (+ rapier backend)
//! - `settings`: User-selectable game file, host and port

pub mod layout;
pub mod loader;
pub mod settings;
pub mod sim;
pub mod world;

pub use settings::Settings;
pub use sim::{GameEvent, GameSession};

/// Browser boot: route `log` to the console and surface panics there.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the physics scene)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Table center height and slab dimensions
    pub const TABLE_Y: f32 = -25.0;
    pub const TABLE_HEIGHT: f32 = 3.75;
    pub const TABLE_LENGTH: f32 = 150.0;
    pub const TABLE_WIDTH: f32 = 50.0;
    /// Top surface of the table, where blocks come to rest
    pub const TABLE_TOP: f32 = TABLE_Y + TABLE_HEIGHT / 2.0;

    /// World gravity (downward)
    pub const GRAVITY_Y: f32 = -30.0;

    /// Block material
    pub const FRICTION: f32 = 0.3;
    pub const RESTITUTION: f32 = 0.7;
    pub const BLOCK_MASS: f32 = 10.0;

    /// Score deltas
    pub const MATCH_REWARD: i32 = 10;
    pub const FALL_PENALTY: i32 = 10;

    /// Blocks below this height are swept off the board
    pub const FALL_MARGIN: f32 = 0.0;
    pub const FALL_THRESHOLD: f32 = TABLE_Y - FALL_MARGIN;

    /// Impulse scheduler: per-block kick cadence and strength
    pub const IMPULSE_INTERVAL_TICKS: u64 = 60;
    pub const IMPULSE_FORCE: f32 = 1000.0;
    /// A block counts as resting if its bottom face is this close to the table
    pub const REST_EPSILON: f32 = 0.1;
}
