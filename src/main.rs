/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use tracing::{info, warn};

use config::GameConfig;
use sim::level;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

fn main() {
    let (config, config_err) = GameConfig::load();

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Warning: could not open log file: {e}");
    }
    if let Some(e) = config_err {
        warn!("{e}; using default settings");
    }

    let levels = level::load_levels(&config);
    let mut world = match WorldState::new(levels) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Could not start: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }

    info!(level = world.current_level + 1, "session ended");
    println!();
    println!("Thanks for playing Trophy Sokoban!");
    println!("Reached level {} of {}.", world.current_level + 1, world.total_levels());
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }

    let mut dirty = true;

    loop {
        kb.drain_events()?;
        gp.update();

        if kb.resized {
            dirty = true;
        }

        for &cmd in kb.commands().iter().chain(gp.commands()) {
            dirty |= world.handle(cmd)?;
            if world.quit {
                return Ok(());
            }
        }

        if dirty {
            renderer.render(world)?;
            dirty = false;
        }
        std::thread::sleep(config.frame);
    }
}
