/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (press-then-repeat, like the arrow keys)
///   A                     →  Toggle view
///   Y                     →  Toggle cheat
///   X                     →  Cycle light
///   B                     →  Toggle solution
///   Start                 →  New maze
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::{GamepadConfig, InputConfig};
use crate::domain::cell::MoveVector;
use crate::sim::event::InputEvent;
use super::input::repeat_fires;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Action-to-button mapping, in polling order.
struct ActionMap {
    bindings: Vec<(InputEvent, Vec<Btn>)>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            bindings: vec![
                (InputEvent::Quit, vec![Btn::Select]),
                (InputEvent::ToggleView, vec![Btn::A]),
                (InputEvent::ToggleCheat, vec![Btn::Y]),
                (InputEvent::CycleLight, vec![Btn::X]),
                (InputEvent::ToggleSolution, vec![Btn::B]),
                (InputEvent::Reset, vec![Btn::Start]),
            ],
        }
    }
}

/// Direction slot (d-pad or stick), indexed like `MoveVector::POLL_ORDER`.
fn dir_index(mv: MoveVector) -> usize {
    match mv {
        MoveVector::Down => 0,
        MoveVector::Up => 1,
        MoveVector::Right => 2,
        MoveVector::Left => 3,
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; BTN_COUNT],

    dpad: [bool; 4],
    stick: [bool; 4],
    stick_x: f32,
    stick_y: f32,

    /// Frames each direction has been held; `None` when released.
    dir_frames: [Option<u32>; 4],

    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::debug!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [false; 4],
            stick: [false; 4],
            stick_x: 0.0,
            stick_y: 0.0,
            dir_frames: [None; 4],
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Unknown names are ignored; an
    /// action left with no valid button keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let lists = [
            (InputEvent::Quit, &cfg.quit),
            (InputEvent::ToggleView, &cfg.view),
            (InputEvent::ToggleCheat, &cfg.cheat),
            (InputEvent::CycleLight, &cfg.light),
            (InputEvent::ToggleSolution, &cfg.solution),
            (InputEvent::Reset, &cfg.reset),
        ];
        for (action, names) in lists {
            let btns = parse_list(names);
            if btns.is_empty() {
                log::warn!("gamepad: no usable button for {action:?}, keeping default");
                continue;
            }
            if let Some(slot) = self.action_map.bindings.iter_mut().find(|(a, _)| *a == action) {
                slot.1 = btns;
            }
        }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        self.advance_dir_frames();
    }

    /// Events for this frame, in the same order as the keyboard's.
    pub fn events(&self, repeat: InputConfig) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for (action, btns) in &self.action_map.bindings {
            if self.any_just_pressed(btns) {
                out.push(*action);
            }
        }
        for mv in MoveVector::POLL_ORDER {
            let fires = self.dir_frames[dir_index(mv)]
                .is_some_and(|n| repeat_fires(n, repeat.repeat_delay, repeat.repeat_interval));
            if fires {
                out.push(InputEvent::Move(mv));
            }
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        // Derive stick digital states
        self.stick[dir_index(MoveVector::Left)] = self.stick_x < -STICK_DEADZONE;
        self.stick[dir_index(MoveVector::Right)] = self.stick_x > STICK_DEADZONE;
        self.stick[dir_index(MoveVector::Up)] = self.stick_y > STICK_DEADZONE;
        self.stick[dir_index(MoveVector::Down)] = self.stick_y < -STICK_DEADZONE;
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(MoveVector::Up),
            Button::DPadDown  => Some(MoveVector::Down),
            Button::DPadLeft  => Some(MoveVector::Left),
            Button::DPadRight => Some(MoveVector::Right),
            _ => None,
        };
        if let Some(mv) = dir {
            self.dpad[dir_index(mv)] = held;
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            let state = &mut self.buttons[btn_index(btn)];
            state.held = held;
            if held {
                state.just_pressed = true;
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    // ── Internal ──

    fn advance_dir_frames(&mut self) {
        for i in 0..4 {
            let held = self.dpad[i] || self.stick[i];
            self.dir_frames[i] = match (held, self.dir_frames[i]) {
                (false, _) => None,
                (true, None) => Some(0),
                (true, Some(n)) => Some(n.saturating_add(1)),
            };
        }
    }

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons { *b = BtnState::default(); }
        self.dpad = [false; 4];
        self.stick = [false; 4];
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPEAT: InputConfig = InputConfig { repeat_delay: 5, repeat_interval: 2 };

    fn pad() -> GamepadState {
        let mut p = GamepadState::new();
        p.release_all();
        p.dir_frames = [None; 4];
        p
    }

    fn press(p: &mut GamepadState, btn: Btn) {
        p.buttons[btn_index(btn)] = BtnState { held: true, just_pressed: true };
    }

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("lb"), Some(Btn::L1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn default_buttons_map_to_actions() {
        let mut p = pad();
        press(&mut p, Btn::X);
        press(&mut p, Btn::Select);
        assert_eq!(p.events(REPEAT), vec![InputEvent::Quit, InputEvent::CycleLight]);
    }

    #[test]
    fn config_remaps_and_ignores_unknown_names() {
        let mut p = pad();
        let mut cfg = GamepadConfig {
            view: vec!["R1".into()],
            cheat: vec!["nope".into()],
            light: vec!["X".into()],
            solution: vec!["B".into()],
            reset: vec!["Start".into()],
            quit: vec!["Select".into()],
        };
        p.load_button_config(&cfg);
        press(&mut p, Btn::R1);
        press(&mut p, Btn::Y);
        assert_eq!(p.events(REPEAT), vec![InputEvent::ToggleView, InputEvent::ToggleCheat]);

        cfg.view = vec![];
        p.load_button_config(&cfg);
        p.clear_just_pressed();
        press(&mut p, Btn::R1);
        assert_eq!(p.events(REPEAT), vec![InputEvent::ToggleView]);
    }

    #[test]
    fn held_dpad_repeats_like_keyboard() {
        let mut p = pad();
        p.dpad[dir_index(MoveVector::Right)] = true;
        let mut fired = vec![];
        for f in 0..10 {
            p.advance_dir_frames();
            if p.events(REPEAT) == vec![InputEvent::Move(MoveVector::Right)] {
                fired.push(f);
            }
        }
        assert_eq!(fired, vec![0, 5, 7, 9]);

        p.dpad[dir_index(MoveVector::Right)] = false;
        p.advance_dir_frames();
        assert!(p.events(REPEAT).is_empty());
    }

    #[test]
    fn stick_and_dpad_share_a_direction() {
        let mut p = pad();
        p.stick[dir_index(MoveVector::Down)] = true;
        p.advance_dir_frames();
        p.dpad[dir_index(MoveVector::Down)] = true;
        p.advance_dir_frames();
        // still one continuous hold, not a second press
        assert!(p.events(REPEAT).is_empty());
    }
}
