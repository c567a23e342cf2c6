mod clock;
mod config;
mod constants;
mod entities;
mod game;
mod input;
mod physics;
mod rendering;
mod spawner;
mod terminal_io;
mod types;

use std::env;
use std::io::{self, Write};
use crossterm::terminal::size;
use log::{error, info};

use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::constants::*;
use crate::game::Game;
use crate::rendering::{GameGrid, OutputTarget, ScreenBuffer};
use crate::terminal_io::{InputSource, SimulatedInput, TerminalGuard, TerminalInput};

fn main() -> io::Result<()> {
    simple_logging::log_to_file(LOG_FILE, log::LevelFilter::Info)?;
    info!("Starting star-dodge.");

    let args: Vec<String> = env::args().collect();
    let config = GameConfig::from_args(&args);

    let summary = if config.debug_mode_active {
        info!("Debug mode enabled.");
        let (width, height) = config.size.unwrap_or((DEFAULT_DEBUG_COLS, DEFAULT_DEBUG_ROWS));
        let mut game = Game::new(
            width,
            height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)),
            InputSource::Simulated(SimulatedInput::demo()),
            FrameClock::simulated(TARGET_FPS),
            &config,
        );
        game.run()?
    } else {
        let terminal = TerminalGuard::acquire()?;
        let (width, height) = match config.size {
            Some(size) => size,
            None => size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?,
        };
        info!("Terminal size: {}x{}", width, height);

        let mut stdout_target = OutputTarget::Stdout(io::stdout());
        GameGrid::new(width, height)
            .clear_screen_manual(&mut stdout_target, width, height)
            .map_err(|e| { error!("Failed to clear screen manually: {}", e); e })?;
        stdout_target.flush()?;

        let mut game = Game::new(
            width,
            height,
            stdout_target,
            InputSource::Terminal(TerminalInput::new(terminal.reports_key_release())),
            FrameClock::realtime(TARGET_FPS),
            &config,
        );
        let summary = game.run()?;
        game.stdout_target.execute_move_to(crossterm::cursor::MoveTo(0, height.saturating_sub(1)))?;
        game.stdout_target.flush()?;
        summary
    };

    info!(
        "Exiting: {:?} after {} frames, survived {:.1}s, spawn interval {} ms.",
        summary.outcome, summary.frames, summary.survived_secs, summary.spawn_interval_ms
    );
    Ok(())
}
