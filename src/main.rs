use std::path::PathBuf;

use ar_tictactoe::game::ArGame;
use ar_tictactoe::resources::gameconfig::GameConfig;
use ar_tictactoe::script::{ReplayOptions, SessionScript, replay};
use clap::Parser;

#[derive(Parser)]
#[command(
    version,
    about = "AR tic-tac-toe: replays a scripted AR session headless and reports the board"
)]
struct Cli {
    /// INI configuration; defaults are used for anything missing.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Session script (JSON) to replay.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,

    /// Random offset, in meters, added to every reported marker position.
    #[arg(long, default_value_t = 0.0)]
    jitter: f32,

    /// Seed for the jitter generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }
    config.sanitize();

    if let Some(path) = cli.dump_config {
        config.config_path = path;
        match config.save_to_file() {
            Ok(()) => println!("Configuration written to {}", config.config_path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let Some(script_path) = cli.script else {
        eprintln!("Error: nothing to do, pass --script <PATH> or --dump-config <PATH>");
        std::process::exit(2);
    };
    let script = match SessionScript::load(&script_path) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error loading {}: {e}", script_path.display());
            std::process::exit(1);
        }
    };

    let mut game = ArGame::new(config);
    game.activate();
    let summary = replay(
        &mut game,
        &script,
        ReplayOptions {
            jitter: cli.jitter,
            seed: cli.seed,
        },
    );
    game.deactivate();

    match &summary.board {
        Some(board) => {
            log::info!(
                "Board at {:?}, rotation {:?}, scale {:?}",
                board.position,
                board.rotation,
                board.scale
            );
            for row in &board.rows {
                log::info!("  {}", row);
            }
        }
        None => log::info!("No board placed after {} ticks", summary.ticks),
    }
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
