use std::collections::HashMap;
use std::io;
use std::ops::Range;
use std::time::{Duration, Instant};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, SetTitle},
};
use log::{error, info};

use crate::constants::{KEY_FIRST_PRESS_GRACE_MS, KEY_REPEAT_GRACE_MS, WINDOW_TITLE};
use crate::input::InputSnapshot;

// --- TerminalGuard: raw mode for the lifetime of the value ---
pub struct TerminalGuard {
    enhanced_keys: bool,
}

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        info!("Attempting to enable raw mode.");
        enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
        let mut stdout = io::stdout();
        execute!(stdout, Hide, SetTitle(WINDOW_TITLE), EnableFocusChange)
            .map_err(|e| { error!("Failed to prepare terminal: {}", e); e })?;

        // Release events make held keys exact where the terminal supports them.
        let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
                .map_err(|e| { error!("Failed to enable key release events: {}", e); e })?;
        }
        info!("Terminal ready, key release events: {}", enhanced_keys);
        Ok(TerminalGuard { enhanced_keys })
    }

    pub fn reports_key_release(&self) -> bool {
        self.enhanced_keys
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            if let Err(e) = execute!(stdout, PopKeyboardEnhancementFlags) {
                error!("Failed to restore keyboard mode: {}", e);
            }
        }
        if let Err(e) = execute!(stdout, DisableFocusChange, Show) {
            error!("Failed to show cursor: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        info!("Terminal restored.");
    }
}

// --- KeyState: held directions rebuilt from key events ---
#[derive(Clone, Copy, Debug)]
struct HeldKey {
    last_press: Instant,
    repeating: bool,
}

#[derive(Debug, Default)]
pub struct KeyState {
    left: Option<HeldKey>,
    right: Option<HeldKey>,
    reports_release: bool,
    quit: bool,
}

impl KeyState {
    /// `reports_release` is true when the terminal sends key release events,
    /// so a key stays held until its release arrives.
    pub fn new(reports_release: bool) -> Self {
        KeyState { reports_release, ..KeyState::default() }
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        match event {
            Event::Key(KeyEvent { code, modifiers, kind, .. }) => {
                let is_press = *kind == KeyEventKind::Press || *kind == KeyEventKind::Repeat;
                let is_release = *kind == KeyEventKind::Release;
                if is_release {
                    self.reports_release = true;
                }

                match code {
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                        self.left = self.next_hold(self.left, *kind, now);
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                        self.right = self.next_hold(self.right, *kind, now);
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc if is_press => self.quit = true,
                    KeyCode::Char('c') if is_press && modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    _ => {}
                }
            }
            Event::FocusLost => {
                self.left = None;
                self.right = None;
            }
            _ => {}
        }
    }

    pub fn snapshot(&self, now: Instant) -> InputSnapshot {
        InputSnapshot {
            left: self.is_held(self.left, now),
            right: self.is_held(self.right, now),
            quit: self.quit,
        }
    }

    // A press landing while the key still counts as held is an auto-repeat.
    fn next_hold(&self, current: Option<HeldKey>, kind: KeyEventKind, now: Instant) -> Option<HeldKey> {
        match kind {
            KeyEventKind::Release => None,
            KeyEventKind::Repeat => Some(HeldKey { last_press: now, repeating: true }),
            KeyEventKind::Press => Some(HeldKey {
                last_press: now,
                repeating: self.is_held(current, now),
            }),
        }
    }

    // Without release events a key is held for a window after its last
    // press: long enough to bridge the OS repeat delay after the first press,
    // short once repeats are flowing so letting go stops the player quickly.
    fn is_held(&self, key: Option<HeldKey>, now: Instant) -> bool {
        match key {
            Some(_) if self.reports_release => true,
            Some(held) => {
                let window = if held.repeating { KEY_REPEAT_GRACE_MS } else { KEY_FIRST_PRESS_GRACE_MS };
                now.saturating_duration_since(held.last_press) < Duration::from_millis(window)
            }
            None => false,
        }
    }
}

// --- TerminalInput: drains crossterm events without blocking ---
#[derive(Debug)]
pub struct TerminalInput {
    keys: KeyState,
}

impl TerminalInput {
    pub fn new(reports_release: bool) -> Self {
        TerminalInput { keys: KeyState::new(reports_release) }
    }

    pub fn poll(&mut self) -> io::Result<InputSnapshot> {
        while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
            let event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
            self.keys.handle_event(&event, Instant::now());
        }
        Ok(self.keys.snapshot(Instant::now()))
    }
}

// --- SimulatedInput for headless runs ---
pub struct SimulatedInput {
    frames: HashMap<u64, InputSnapshot>,
}

impl SimulatedInput {
    pub fn new(frames: HashMap<u64, InputSnapshot>) -> Self {
        SimulatedInput { frames }
    }

    /// Holds `keys` for every frame in `frames`.
    pub fn hold(mut self, frames: Range<u64>, keys: InputSnapshot) -> Self {
        for frame in frames {
            self.frames.insert(frame, keys);
        }
        self
    }

    /// Scripted controls for `frame_count`; frames without a script are idle.
    pub fn poll(&mut self, frame_count: u64) -> io::Result<InputSnapshot> {
        Ok(self.frames.remove(&frame_count).unwrap_or_default())
    }

    /// Demo script for `--debug`: sweep left, then right across the field.
    pub fn demo() -> Self {
        info!("Using scripted demo input.");
        SimulatedInput::new(HashMap::new())
            .hold(30..70, InputSnapshot::left())
            .hold(90..250, InputSnapshot::right())
            .hold(300..400, InputSnapshot::left())
            .hold(3600..3601, InputSnapshot::quit())
    }
}

pub enum InputSource {
    Terminal(TerminalInput),
    Simulated(SimulatedInput),
}

impl InputSource {
    pub fn poll(&mut self, frame_count: u64) -> io::Result<InputSnapshot> {
        match self {
            InputSource::Terminal(terminal) => terminal.poll(),
            InputSource::Simulated(simulated) => simulated.poll(frame_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn frame() -> Duration {
        Duration::from_nanos(1_000_000_000 / 60)
    }

    #[test]
    fn first_press_stays_held_until_auto_repeat_starts() {
        let mut keys = KeyState::new(false);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Right, KeyEventKind::Press), t0);

        // No repeat yet: typical OS repeat delays are 250-500 ms.
        let mut dropped_frames = 0;
        for i in 0..30 {
            if !keys.snapshot(t0 + frame() * i).right {
                dropped_frames += 1;
            }
        }
        assert_eq!(dropped_frames, 0);

        // First repeat arrives after the delay; movement continues without a gap.
        let first_repeat = t0 + Duration::from_millis(KEY_FIRST_PRESS_GRACE_MS - 20);
        keys.handle_event(&key(KeyCode::Right, KeyEventKind::Press), first_repeat);
        for i in 0..5 {
            assert!(keys.snapshot(first_repeat + frame() * i).right);
        }
    }

    #[test]
    fn single_tap_expires_after_first_press_window() {
        let mut keys = KeyState::new(false);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Left, KeyEventKind::Press), t0);
        assert!(keys.snapshot(t0).left);
        let later = t0 + Duration::from_millis(KEY_FIRST_PRESS_GRACE_MS + 1);
        assert!(!keys.snapshot(later).left);
    }

    #[test]
    fn repeating_key_uses_short_window_once_let_go() {
        let mut keys = KeyState::new(false);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Right, KeyEventKind::Press), t0);
        let t1 = t0 + Duration::from_millis(300);
        keys.handle_event(&key(KeyCode::Right, KeyEventKind::Press), t1);
        assert!(keys.snapshot(t1 + Duration::from_millis(KEY_REPEAT_GRACE_MS - 10)).right);
        assert!(!keys.snapshot(t1 + Duration::from_millis(KEY_REPEAT_GRACE_MS + 1)).right);
    }

    #[test]
    fn repeat_event_kind_counts_as_repeating() {
        let mut keys = KeyState::new(false);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Right, KeyEventKind::Repeat), t0);
        assert!(!keys.snapshot(t0 + Duration::from_millis(KEY_REPEAT_GRACE_MS + 1)).right);
    }

    #[test]
    fn release_reporting_terminal_holds_from_the_first_press() {
        let mut keys = KeyState::new(true);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Char('a'), KeyEventKind::Press), t0);
        let much_later = t0 + Duration::from_secs(10);
        assert!(keys.snapshot(much_later).left);
        keys.handle_event(&key(KeyCode::Char('a'), KeyEventKind::Release), much_later);
        assert!(!keys.snapshot(much_later).left);
    }

    #[test]
    fn release_event_switches_to_release_tracking() {
        let mut keys = KeyState::new(false);
        let t0 = Instant::now();
        keys.handle_event(&key(KeyCode::Char('d'), KeyEventKind::Release), t0);
        keys.handle_event(&key(KeyCode::Char('d'), KeyEventKind::Press), t0);
        assert!(keys.snapshot(t0 + Duration::from_secs(5)).right);
    }

    #[test]
    fn quit_keys_request_quit() {
        let now = Instant::now();
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut keys = KeyState::new(false);
            keys.handle_event(&key(code, KeyEventKind::Press), now);
            assert!(keys.snapshot(now).quit);
        }

        let mut keys = KeyState::new(false);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        keys.handle_event(&ctrl_c, now);
        assert!(keys.snapshot(now).quit);
    }

    #[test]
    fn losing_focus_drops_held_keys() {
        let mut keys = KeyState::new(false);
        let now = Instant::now();
        keys.handle_event(&key(KeyCode::Left, KeyEventKind::Press), now);
        keys.handle_event(&Event::FocusLost, now);
        assert!(!keys.snapshot(now).left);
    }

    #[test]
    fn simulated_input_plays_back_per_frame() {
        let mut input = SimulatedInput::new(HashMap::new())
            .hold(2..4, InputSnapshot::left())
            .hold(5..6, InputSnapshot::quit());
        assert_eq!(input.poll(0).unwrap(), InputSnapshot::default());
        assert!(input.poll(2).unwrap().left);
        assert!(input.poll(3).unwrap().left);
        assert!(!input.poll(4).unwrap().left);
        assert!(input.poll(5).unwrap().quit);
    }
}
