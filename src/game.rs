use std::io::{self, Write};
use crossterm::cursor::MoveTo;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::constants::*;
use crate::entities::{Player, Star};
use crate::input::move_player;
use crate::physics;
use crate::rendering::{centered_x, GameGrid, OutputTarget};
use crate::spawner::Spawner;
use crate::terminal_io::InputSource;

/// Session lifecycle. `Lost` holds the end screen before becoming `Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Lost,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Lost,
    FrameLimit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSummary {
    pub outcome: Outcome,
    pub frames: u64,
    pub survived_secs: f64,
    pub spawn_interval_ms: u64,
}

pub struct Game {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    input: InputSource,
    clock: FrameClock,
    rng: StdRng,
    debug_mode_active: bool,
    max_frames: Option<u64>,

    game_grid: GameGrid,
    player: Player,
    stars: Vec<Star>,
    spawner: Spawner,
    elapsed_secs: f64,
    frame_count: u64,
    hit: bool,
    state: SessionState,
    quit_requested: bool,
}

impl Game {
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        input: InputSource,
        clock: FrameClock,
        config: &GameConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            input,
            clock,
            rng,
            debug_mode_active: config.debug_mode_active,
            max_frames: config.max_frames,
            game_grid: GameGrid::new(terminal_width, terminal_height),
            player: Player::default(),
            stars: Vec::new(),
            spawner: Spawner::new(WIDTH),
            elapsed_secs: 0.0,
            frame_count: 0,
            hit: false,
            state: SessionState::Running,
            quit_requested: false,
        }
    }

    /// Puts every piece of session state back to its starting value.
    pub fn reset_session(&mut self) {
        self.player = Player::default();
        self.stars.clear();
        self.spawner = Spawner::new(WIDTH);
        self.elapsed_secs = 0.0;
        self.frame_count = 0;
        self.hit = false;
        self.quit_requested = false;
        self.state = SessionState::Running;
        self.clock.restart();
    }

    /// Plays one session to its end and reports how it went.
    pub fn run(&mut self) -> io::Result<SessionSummary> {
        self.reset_session();
        info!("Session started.");

        while self.state != SessionState::Stopped {
            let at_limit = self.max_frames.is_some_and(|max| self.frame_count >= max);
            if self.state == SessionState::Running && at_limit {
                info!("Frame limit of {} reached.", self.frame_count);
                self.state = SessionState::Stopped;
                break;
            }
            self.step()?;
        }

        let outcome = if self.hit {
            Outcome::Lost
        } else if self.quit_requested {
            Outcome::Quit
        } else {
            Outcome::FrameLimit
        };
        let summary = SessionSummary {
            outcome,
            frames: self.frame_count,
            survived_secs: self.elapsed_secs,
            spawn_interval_ms: self.spawner.interval_ms,
        };
        info!("Session over: {:?}", summary);
        Ok(summary)
    }

    /// One frame of the loop. A collision frame shows the end screen and
    /// returns `Lost`; the following call holds that screen and stops.
    pub fn step(&mut self) -> io::Result<SessionState> {
        match self.state {
            SessionState::Running => {}
            SessionState::Lost => {
                self.clock.hold(LOST_SCREEN_HOLD_MS);
                self.state = SessionState::Stopped;
                return Ok(self.state);
            }
            SessionState::Stopped => return Ok(self.state),
        }

        let delta_ms = self.clock.tick();
        self.spawner.accumulate(delta_ms);
        self.elapsed_secs = self.clock.elapsed_secs();
        let spawned = self.spawner.maybe_spawn(&mut self.rng);
        self.stars.extend(spawned);

        let keys = self.input.poll(self.frame_count)?;
        if keys.quit {
            info!("Quit requested at frame {}.", self.frame_count);
            self.quit_requested = true;
            self.state = SessionState::Stopped;
            return Ok(self.state);
        }
        self.player = move_player(self.player, &keys);

        let (stars, hit) = physics::advance(std::mem::take(&mut self.stars), &self.player);
        self.stars = stars;
        self.frame_count += 1;

        if hit {
            self.hit = true;
            self.state = SessionState::Lost;
            info!("Player hit after {:.1}s.", self.elapsed_secs);
            self.show_lost_screen()?;
        } else {
            self.render()?;
        }
        Ok(self.state)
    }

    fn render(&mut self) -> io::Result<()> {
        self.game_grid.clear();
        self.player.draw(&mut self.game_grid);
        for star in &self.stars {
            star.draw(&mut self.game_grid);
        }

        if let OutputTarget::ScreenBuffer(ref mut sb) = self.stdout_target {
            self.game_grid.copy_into(sb);
        } else {
            self.game_grid.render(&mut self.stdout_target)
                .map_err(|e| { error!("Failed to draw frame: {}", e); e })?;
        }

        self.stdout_target.execute_move_to(MoveTo(0, 0))?;
        write!(self.stdout_target, "Time: {}s", display_secs(self.elapsed_secs))?;
        self.stdout_target.flush().map_err(|e| { error!("Failed to flush frame: {}", e); e })?;

        if self.debug_mode_active {
            if let Some(sb) = self.stdout_target.screen_buffer() {
                sb.print_to_log();
            }
        }
        Ok(())
    }

    fn show_lost_screen(&mut self) -> io::Result<()> {
        let lost_msg = "You Lost!";
        let time_msg = format!("You survived for {}s", display_secs(self.elapsed_secs));

        let lost_y = self.terminal_height / 2;
        let time_y = lost_y.saturating_add(1);

        self.stdout_target.execute_move_to(MoveTo(centered_x(self.terminal_width, lost_msg), lost_y))?;
        write!(self.stdout_target, "{}", lost_msg)?;

        self.stdout_target.execute_move_to(MoveTo(centered_x(self.terminal_width, &time_msg), time_y))?;
        write!(self.stdout_target, "{}", time_msg)?;
        self.stdout_target.flush().map_err(|e| { error!("Failed to flush lost screen: {}", e); e })?;

        if self.debug_mode_active {
            if let Some(sb) = self.stdout_target.screen_buffer() {
                sb.print_to_log();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Game {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

/// Whole seconds shown to the player.
fn display_secs(secs: f64) -> u64 {
    secs.round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::input::InputSnapshot;
    use crate::rendering::ScreenBuffer;
    use crate::terminal_io::SimulatedInput;

    fn headless(input: SimulatedInput, max_frames: Option<u64>) -> Game {
        let config = GameConfig {
            debug_mode_active: false,
            size: Some((80, 24)),
            max_frames,
            seed: Some(11),
        };
        Game::new(
            80,
            24,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            InputSource::Simulated(input),
            FrameClock::simulated(TARGET_FPS),
            &config,
        )
    }

    fn idle() -> SimulatedInput {
        SimulatedInput::new(HashMap::new())
    }

    fn buffer(game: &Game) -> &ScreenBuffer {
        game.stdout_target.screen_buffer().unwrap()
    }

    #[test]
    fn quit_on_first_frame_stops_without_rendering() {
        let input = idle().hold(0..1, InputSnapshot::quit());
        let mut game = headless(input, None);
        let summary = game.run().unwrap();
        assert_eq!(summary.outcome, Outcome::Quit);
        assert_eq!(summary.frames, 0);
        assert_eq!(game.state(), SessionState::Stopped);
        assert!(!buffer(&game).contains("Time:"));
    }

    #[test]
    fn frame_shows_time_and_player() {
        let mut game = headless(idle(), Some(1));
        let summary = game.run().unwrap();
        assert_eq!(summary.outcome, Outcome::FrameLimit);
        let sb = buffer(&game);
        assert!(sb.line(0).starts_with("Time: 0s"));
        assert!(sb.count_char(PLAYER_CHAR) > 0);
    }

    #[test]
    fn first_batch_arrives_once_two_seconds_pass() {
        let mut game = headless(idle(), None);
        for _ in 0..120 {
            game.step().unwrap();
        }
        assert!(game.stars().is_empty());
        assert_eq!(game.spawner.interval_ms, INITIAL_SPAWN_INTERVAL_MS);

        game.step().unwrap();
        assert_eq!(game.stars().len(), STARS_PER_SPAWN);
        assert_eq!(game.spawner.interval_ms, 1950);
        assert_eq!(game.spawner.accumulator_ms, 0);
        // Spawned above the field and already moved one step.
        for star in game.stars() {
            assert_eq!(star.rect.y, -STAR_HEIGHT + STAR_VELOCITY);
        }
    }

    #[test]
    fn held_left_walks_player_to_the_wall_and_stops() {
        let input = idle().hold(0..100, InputSnapshot::left());
        let mut game = headless(input, Some(100));
        game.run().unwrap();
        assert_eq!(game.player().x(), 0);
    }

    #[test]
    fn collision_ends_session_with_lost_screen() {
        let mut game = headless(idle(), None);
        game.reset_session();
        let player_top = game.player.rect.y;
        let px = game.player.x();
        game.stars = vec![
            Star::at(px + 5, player_top - STAR_HEIGHT - 2 * STAR_VELOCITY + 1),
            Star::at(900, 100),
        ];

        assert_eq!(game.step().unwrap(), SessionState::Running);
        assert_eq!(game.step().unwrap(), SessionState::Lost);

        assert!(game.hit);
        assert_eq!(game.stars(), &[Star::at(900, 100 + STAR_VELOCITY)]);
        let sb = buffer(&game);
        assert!(sb.contains("You Lost!"));
        assert!(sb.contains("You survived for 0s"));
        assert!(game.clock.elapsed_secs() < 1.0);

        // The end screen is held for four seconds, then the session stops.
        assert_eq!(game.step().unwrap(), SessionState::Stopped);
        assert!(game.clock.elapsed_secs() >= 4.0);
        assert_eq!(game.frame_count, 2);
        assert_eq!(game.step().unwrap(), SessionState::Stopped);
    }

    #[test]
    fn run_holds_the_lost_screen_before_stopping() {
        let mut game = headless(idle(), None);
        game.reset_session();
        let px = game.player.x();
        let top = game.player.rect.y;
        game.stars = vec![Star::at(px + 5, top - STAR_HEIGHT - STAR_VELOCITY + 1)];

        assert_eq!(game.step().unwrap(), SessionState::Lost);
        // A frame limit already reached must not skip the hold.
        game.max_frames = Some(1);
        let mut held = 0;
        while game.state() != SessionState::Stopped {
            game.step().unwrap();
            held += 1;
        }
        assert_eq!(held, 1);
        assert!(game.clock.elapsed_secs() >= 4.0);
    }

    #[test]
    fn run_starts_from_a_fresh_session() {
        let input = idle().hold(0..50, InputSnapshot::right());
        let mut game = headless(input, Some(50));
        game.run().unwrap();
        assert_eq!(game.player().x(), PLAYER_START_X + 50 * PLAYER_VELOCITY);

        game.run().unwrap();
        assert_eq!(game.player().x(), PLAYER_START_X);
        assert_eq!(game.frame_count, 50);
    }

    #[test]
    fn stepping_a_finished_session_changes_nothing() {
        let input = idle().hold(0..1, InputSnapshot::quit());
        let mut game = headless(input, None);
        game.run().unwrap();
        assert_eq!(game.step().unwrap(), SessionState::Stopped);
        assert_eq!(game.frame_count, 0);
    }

    #[test]
    fn displayed_seconds_round_to_nearest() {
        assert_eq!(display_secs(0.4), 0);
        assert_eq!(display_secs(2.6), 3);
        assert_eq!(display_secs(-1.0), 0);
    }
}
