use log::info;

use crate::constants::{DEFAULT_DEBUG_COLS, DEFAULT_DEBUG_ROWS};

/// How a session is wired up. Built once from the command line and handed to
/// the game loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub debug_mode_active: bool,
    /// Terminal size override; the real terminal size is used when absent.
    pub size: Option<(u16, u16)>,
    pub max_frames: Option<u64>,
    pub seed: Option<u64>,
}

impl GameConfig {
    /// `star-dodge [--debug [COLS ROWS [FRAMES [SEED]]]]`
    ///
    /// Numbers that fail to parse fall back to their defaults.
    pub fn from_args(args: &[String]) -> Self {
        let debug_mode_active = args.get(1).is_some_and(|a| a == "--debug");
        if !debug_mode_active {
            return GameConfig::default();
        }

        let size = if args.len() >= 4 {
            Some((
                args[2].parse::<u16>().unwrap_or(DEFAULT_DEBUG_COLS),
                args[3].parse::<u16>().unwrap_or(DEFAULT_DEBUG_ROWS),
            ))
        } else {
            Some((DEFAULT_DEBUG_COLS, DEFAULT_DEBUG_ROWS))
        };
        let max_frames = args.get(4).and_then(|a| a.parse::<u64>().ok());
        let seed = args.get(5).and_then(|a| a.parse::<u64>().ok());

        let config = GameConfig { debug_mode_active, size, max_frames, seed };
        info!("Debug configuration: {:?}", config);
        config
    }
}
