//! Puzzle Sim entry point
//!
//! Native builds run both games headless and log the outcome. The browser
//! build is driven from JS through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use puzzle_sim::platform;
    use puzzle_sim::sim::{Direction, RowState};
    use puzzle_sim::{MarbleRunSession, PathfindingSession, Settings};

    platform::init_logging();
    log::info!("Puzzle Sim (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Bad settings file {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut game = match PathfindingSession::new(settings, platform::time_seed()) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot build level: {}", e);
            std::process::exit(1);
        }
    };

    // Greedy walk toward the goal: horizontal first, then vertical
    let world = game.world().clone();
    let dx = world.end.x - world.start.x;
    let dy = world.end.y - world.start.y;
    let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
    let vertical = if dy > 0 { Direction::Down } else { Direction::Up };
    for _ in 0..dx.unsigned_abs() {
        game.append_instruction(horizontal);
    }
    for _ in 0..dy.unsigned_abs() {
        game.append_instruction(vertical);
    }

    if game.start_execution() {
        let status = game.run_to_completion();
        let snapshot = game.snapshot();
        log::info!(
            "Run finished: {:?} at ({}, {}) after {} ms, reason {:?}",
            status,
            snapshot.position.x,
            snapshot.position.y,
            game.clock_ms(),
            snapshot.loss_reason
        );
    } else {
        log::info!("Start and end coincide, nothing to run");
    }

    let mut marble = MarbleRunSession::new();
    let rows = RowState::from_bin((platform::time_seed() % 16) as u8);
    for (level, on) in rows.rows().into_iter().enumerate() {
        if let Err(e) = marble.set_row_state(level, on) {
            log::error!("{}", e);
        }
    }
    if let Some(route) = marble.start_routing() {
        log::info!(
            "Marble lands in bin {} via {} waypoints",
            route.bin_index,
            route.waypoints.len()
        );
    }
    marble.finish_routing();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
