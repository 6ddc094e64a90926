/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Edge-triggered toggles (fire only on the initial press)
///   - Press-then-repeat moves (fire on press, then every few frames)
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.
///
/// Key map:
///   Q quit · V view · C cheat · L light · S solution · R reset · arrows move

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use crate::config::InputConfig;
use crate::domain::cell::MoveVector;
use crate::sim::event::InputEvent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Hold timeout for edge-triggered keys. Must outlast the OS autorepeat
/// delay so a held toggle is not seen as a second press.
const TOGGLE_HOLD_TIMEOUT: Duration = Duration::from_millis(800);

/// Edge-triggered keys, in polling order.
const TOGGLE_KEYS: [(char, InputEvent); 6] = [
    ('q', InputEvent::Quit),
    ('v', InputEvent::ToggleView),
    ('c', InputEvent::ToggleCheat),
    ('l', InputEvent::CycleLight),
    ('s', InputEvent::ToggleSolution),
    ('r', InputEvent::Reset),
];

pub fn move_key(mv: MoveVector) -> KeyCode {
    match mv {
        MoveVector::Up => KeyCode::Up,
        MoveVector::Down => KeyCode::Down,
        MoveVector::Left => KeyCode::Left,
        MoveVector::Right => KeyCode::Right,
    }
}

/// Press-then-repeat rule. `held` counts frames since the press (0 on
/// the press frame). Fires on the press, then once `delay` frames have
/// passed, every `interval` frames.
pub fn repeat_fires(held: u32, delay: u32, interval: u32) -> bool {
    if held == 0 {
        return true;
    }
    let interval = interval.max(1);
    held >= delay && (held - delay) % interval == 0
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Frames each active key has been held; 0 on the press frame.
    held_frames: HashMap<KeyCode, u32>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            held_frames: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Ask the terminal for Release events. Falls back to the hold
    /// timeout when the terminal can't provide them.
    pub fn enable_release_events(&mut self) {
        if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            log::debug!("keyboard enhancement unsupported; using hold timeout");
            return;
        }
        let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
        self.honor_release = execute!(io::stdout(), PushKeyboardEnhancementFlags(flags)).is_ok();
    }

    pub fn restore(&mut self) {
        if self.honor_release {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            self.honor_release = false;
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.begin_frame();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key, Instant::now());
            }
        }

        self.end_frame(Instant::now());
    }

    /// Events for this frame: toggles first, then moves (down, up, right, left).
    pub fn events(&self, repeat: InputConfig) -> Vec<InputEvent> {
        let mut out = Vec::new();
        if self.ctrl_c_pressed() {
            out.push(InputEvent::Quit);
        }
        for (ch, ev) in TOGGLE_KEYS {
            if self.was_pressed(KeyCode::Char(ch)) {
                out.push(ev);
            }
        }
        for mv in MoveVector::POLL_ORDER {
            if self.repeat_pressed(move_key(mv), repeat) {
                out.push(InputEvent::Move(mv));
            }
        }
        out
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Fresh press, or held long enough to auto-repeat this frame.
    pub fn repeat_pressed(&self, code: KeyCode, repeat: InputConfig) -> bool {
        if self.was_pressed(code) {
            return true;
        }
        match self.held_frames.get(&code) {
            Some(&n) if n > 0 => repeat_fires(n, repeat.repeat_delay, repeat.repeat_interval),
            _ => false,
        }
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        let code = normalize(key.code);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&code);
            }
            KeyEventKind::Release => {
                // Enhancement not confirmed; rely on timeout-based expiry
            }
            _ => {
                let was_held = self.is_held(code, now);
                self.last_active.insert(code, now);
                if !was_held && !self.fresh_presses.contains(&code) {
                    self.fresh_presses.push(code);
                }
            }
        }
    }

    /// Expire timed-out keys and advance hold counters.
    fn end_frame(&mut self, now: Instant) {
        self.last_active.retain(|k, t| now.saturating_duration_since(*t) < hold_timeout(*k));

        self.held_frames.retain(|k, _| self.last_active.contains_key(k));
        for code in self.last_active.keys() {
            if self.fresh_presses.contains(code) {
                self.held_frames.insert(*code, 0);
            } else {
                *self.held_frames.entry(*code).or_insert(0) += 1;
            }
        }
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.saturating_duration_since(*t) < hold_timeout(code))
            .unwrap_or(false)
    }
}

fn hold_timeout(code: KeyCode) -> Duration {
    let toggle = TOGGLE_KEYS.iter().any(|&(ch, _)| code == KeyCode::Char(ch));
    if toggle { TOGGLE_HOLD_TIMEOUT } else { HOLD_TIMEOUT }
}

/// Letter keys match regardless of shift / caps lock.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
