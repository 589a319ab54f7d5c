//! Block Match entry point
//!
//! The browser host drives the library through wasm; this binary is a
//! headless harness that loads a layout file, lets the blocks settle on the
//! rapier table, auto-plays one match per color pair and reports the score.

#[cfg(all(not(target_arch = "wasm32"), feature = "physics"))]
fn main() -> anyhow::Result<()> {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use anyhow::Context;
    use glam::Vec3;

    use block_match::loader::read_layout_file;
    use block_match::sim::{BlockColor, BlockId, GameSession};
    use block_match::world::{RapierWorld, World};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/game01.json".to_string())
        .into();
    let layout = read_layout_file(&path)
        .with_context(|| format!("loading layout {}", path.display()))?;
    log::info!("layout {} has {} blocks", path.display(), layout.block_count());

    let mut world = RapierWorld::new();
    let mut session = GameSession::new(0xb10c);
    let ticket = session.begin_load();
    session.apply_layout(ticket, &layout, &mut world)?;

    // Let the blocks drop and settle.
    for _ in 0..300 {
        session.frame(&mut world);
    }

    // Click each same-colored pair from straight above.
    let mut by_color: HashMap<BlockColor, Vec<BlockId>> = HashMap::new();
    for block in session.board().active_blocks() {
        by_color.entry(block.color).or_default().push(block.id);
    }
    for ids in by_color.values() {
        for pair in ids.chunks(2) {
            let [a, b] = pair else { continue };
            for &id in [a, b] {
                if let Some(pos) = world.block_position(id) {
                    let origin = Vec3::new(pos.x, pos.y + 50.0, pos.z);
                    session.handle_click(&mut world, origin, Vec3::NEG_Y);
                }
            }
            session.frame(&mut world);
        }
    }

    for _ in 0..120 {
        session.frame(&mut world);
    }

    for event in session.drain_events() {
        log::debug!("{event:?}");
    }
    log::info!(
        "final score {} with {} blocks left (game over: {})",
        session.score(),
        session.board().len(),
        session.is_game_over()
    );
    Ok(())
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "physics")))]
fn main() {
    eprintln!("the headless demo needs the `physics` feature");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts drive the library directly; nothing to do here.
}
