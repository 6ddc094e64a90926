/// Input events consumed by the state machine, and game events it emits.
/// The run loop turns game events into audio calls.

use crate::domain::cell::MoveVector;

/// One discrete player intent, already edge/repeat filtered.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    ToggleView,
    ToggleCheat,
    CycleLight,
    ToggleSolution,
    Reset,
    Move(MoveVector),
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// Background loop (re)started for a fresh maze.
    MusicStarted,
    MusicStopped,
    /// One-shot victory cue.
    Victory,
    QuitRequested,
}
