// --- World ---
pub const WIDTH: i32 = 1000;
pub const HEIGHT: i32 = 700;

// --- Player ---
pub const PLAYER_WIDTH: i32 = 40;
pub const PLAYER_HEIGHT: i32 = 60;
pub const PLAYER_START_X: i32 = 200;
pub const PLAYER_VELOCITY: i32 = 5;

// --- Stars ---
pub const STAR_WIDTH: i32 = 10;
pub const STAR_HEIGHT: i32 = 20;
pub const STAR_VELOCITY: i32 = 3;
pub const STARS_PER_SPAWN: usize = 3;

// --- Difficulty ---
pub const INITIAL_SPAWN_INTERVAL_MS: u64 = 2000;
pub const SPAWN_INTERVAL_DECREMENT_MS: u64 = 50;
pub const MIN_SPAWN_INTERVAL_MS: u64 = 200;

// --- Timing ---
pub const TARGET_FPS: u64 = 60;
pub const LOST_SCREEN_HOLD_MS: u64 = 4000;
// Held windows when the terminal never reports releases
pub const KEY_FIRST_PRESS_GRACE_MS: u64 = 500; // Covers the OS auto-repeat delay
pub const KEY_REPEAT_GRACE_MS: u64 = 150;

// --- Presentation ---
pub const WINDOW_TITLE: &str = "Space Dodge";
pub const LOG_FILE: &str = "star-dodge.log";
pub const DEFAULT_DEBUG_COLS: u16 = 80;
pub const DEFAULT_DEBUG_ROWS: u16 = 24;
pub const PLAYER_CHAR: char = '#';
pub const STAR_CHAR: char = '*';
