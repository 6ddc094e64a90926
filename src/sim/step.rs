/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Input events, in the order the run loop polled them
///   2. Win check (once, after all moves)
///
/// Nothing here touches the terminal or audio. Side effects the run loop
/// must carry out come back as `GameEvent`s.

use crate::domain::cell::MoveVector;
use crate::domain::rules;
use super::event::{GameEvent, InputEvent};
use super::generator::MazeSource;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<S: MazeSource + ?Sized>(
    world: &mut WorldState,
    inputs: &[InputEvent],
    source: &mut S,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for &input in inputs {
        apply(world, input, source, &mut events);
        if input == InputEvent::Quit {
            return events;
        }
    }
    resolve_win(world, &mut events);

    events
}

/// Apply one input event.
pub fn apply<S: MazeSource + ?Sized>(
    world: &mut WorldState,
    input: InputEvent,
    source: &mut S,
    events: &mut Vec<GameEvent>,
) {
    match input {
        InputEvent::ToggleView => world.flags.player_centric = !world.flags.player_centric,
        InputEvent::ToggleCheat => world.flags.cheat_mode = !world.flags.cheat_mode,
        InputEvent::ToggleSolution => {
            world.flags.solution_visible = !world.flags.solution_visible;
        }
        InputEvent::CycleLight => world.light = world.light.next(world.light_levels),
        InputEvent::Reset => restart(world, source, events),
        InputEvent::Move(mv) => resolve_move(world, mv),
        InputEvent::Quit => events.push(GameEvent::QuitRequested),
    }
}

/// Fresh maze from `source`, everything else back to initial values.
pub fn restart<S: MazeSource + ?Sized>(
    world: &mut WorldState,
    source: &mut S,
    events: &mut Vec<GameEvent>,
) {
    let maze = source.generate();
    world.reset(maze);
    log::info!("{}", world.summary());
    events.push(GameEvent::MusicStarted);
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_move(world: &mut WorldState, mv: MoveVector) {
    if world.phase() == Phase::Won {
        return;
    }

    let here = world.player.cell;
    let allowed = if world.flags.cheat_mode {
        rules::can_phase(here, mv, &world.maze.grid)
    } else {
        rules::is_legal(here, mv, &world.maze.grid, world.maze.end)
    };

    if allowed {
        world.player.cell = here.translate(mv);
        world.player.last_move = mv;
    }
}

// ══════════════════════════════════════════════════════════════
// Win
// ══════════════════════════════════════════════════════════════

/// Latch the win the first frame the player stands on the exit.
fn resolve_win(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.at_exit() && world.phase() == Phase::Playing {
        world.flags.won = true;
        log::info!("maze #{} solved", world.maze_count);
        events.push(GameEvent::MusicStopped);
        events.push(GameEvent::Victory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;
    use crate::domain::light::LightLevel;
    use crate::sim::generator::FixedMazes;
    use crate::sim::world::fixtures::maze_from;
    use crate::sim::world::SessionFlags;
    use proptest::prelude::*;

    fn corridor() -> WorldState {
        WorldState::new(maze_from(&[
            "S  E",
        ]), 4)
    }

    fn walled() -> WorldState {
        WorldState::new(maze_from(&[
            "S# ",
            " # ",
            "  E",
        ]), 4)
    }

    fn no_source() -> FixedMazes {
        FixedMazes::new(vec![maze_from(&["SE"])])
    }

    fn run(world: &mut WorldState, inputs: &[InputEvent]) -> Vec<GameEvent> {
        step(world, inputs, &mut no_source())
    }

    // ── Toggles ──

    #[test]
    fn toggles_flip_only_their_flag() {
        let mut w = corridor();
        run(&mut w, &[InputEvent::ToggleView]);
        assert_eq!(w.flags, SessionFlags { player_centric: true, ..SessionFlags::default() });
        run(&mut w, &[InputEvent::ToggleCheat]);
        assert!(w.flags.cheat_mode);
        run(&mut w, &[InputEvent::ToggleSolution]);
        assert!(w.flags.solution_visible);
        run(&mut w, &[InputEvent::ToggleView, InputEvent::ToggleCheat, InputEvent::ToggleSolution]);
        assert_eq!(w.flags, SessionFlags::default());
        assert_eq!(w.player.cell, Cell::new(0, 0));
    }

    #[test]
    fn light_cycles_and_wraps() {
        let mut w = corridor();
        for expected in [1, 2, 3, 0, 1] {
            run(&mut w, &[InputEvent::CycleLight]);
            assert_eq!(w.light, LightLevel(expected));
        }
    }

    // ── Movement ──

    #[test]
    fn corridor_move_updates_position_and_facing() {
        let mut w = corridor();
        run(&mut w, &[InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.player.cell, Cell::new(0, 1));
        assert_eq!(w.player.last_move, MoveVector::Right);
    }

    #[test]
    fn bump_into_wall_changes_nothing() {
        let mut w = walled();
        let before = w.player;
        let events = run(&mut w, &[InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.player, before);
        assert!(events.is_empty());
    }

    #[test]
    fn bump_into_edge_changes_nothing() {
        let mut w = walled();
        run(&mut w, &[InputEvent::Move(MoveVector::Up), InputEvent::Move(MoveVector::Left)]);
        assert_eq!(w.player.cell, Cell::new(0, 0));
        assert_eq!(w.player.last_move, MoveVector::Down);
    }

    #[test]
    fn cheat_mode_walks_through_walls() {
        let mut w = walled();
        run(&mut w, &[InputEvent::ToggleCheat, InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.player.cell, Cell::new(0, 1));
    }

    #[test]
    fn cheat_mode_still_stops_at_the_edge() {
        let mut w = walled();
        run(&mut w, &[InputEvent::ToggleCheat, InputEvent::Move(MoveVector::Up)]);
        assert_eq!(w.player.cell, Cell::new(0, 0));
    }

    #[test]
    fn several_moves_in_one_frame_apply_in_order() {
        let mut w = walled();
        run(&mut w, &[InputEvent::Move(MoveVector::Down), InputEvent::Move(MoveVector::Down)]);
        assert_eq!(w.player.cell, Cell::new(2, 0));
    }

    // ── Win ──

    #[test]
    fn reaching_end_wins_once() {
        let mut w = corridor();
        run(&mut w, &[InputEvent::Move(MoveVector::Right), InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.phase(), Phase::Playing);

        let events = run(&mut w, &[InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.phase(), Phase::Won);
        assert!(w.flags.won);
        assert_eq!(events, vec![GameEvent::MusicStopped, GameEvent::Victory]);

        for _ in 0..5 {
            assert!(run(&mut w, &[]).is_empty());
        }
    }

    #[test]
    fn no_moves_after_win() {
        let mut w = corridor();
        run(&mut w, &[
            InputEvent::Move(MoveVector::Right),
            InputEvent::Move(MoveVector::Right),
            InputEvent::Move(MoveVector::Right),
        ]);
        assert_eq!(w.phase(), Phase::Won);
        run(&mut w, &[InputEvent::Move(MoveVector::Left)]);
        assert_eq!(w.player.cell, Cell::new(0, 3));
    }

    #[test]
    fn win_is_checked_after_the_frame_moves() {
        // Passing over the exit within one frame does not win.
        let mut w = WorldState::new(maze_from(&["SE  "]), 4);
        w.flags.cheat_mode = true;
        run(&mut w, &[InputEvent::Move(MoveVector::Right), InputEvent::Move(MoveVector::Right)]);
        assert_eq!(w.phase(), Phase::Playing);
    }

    // ── Reset ──

    #[test]
    fn reset_loads_next_maze_and_restarts_music() {
        let mut w = corridor();
        run(&mut w, &[
            InputEvent::ToggleView,
            InputEvent::ToggleCheat,
            InputEvent::ToggleSolution,
            InputEvent::CycleLight,
            InputEvent::Move(MoveVector::Right),
        ]);
        let mut src = FixedMazes::new(vec![maze_from(&[
            "E",
            " ",
            "S",
        ])]);
        let events = step(&mut w, &[InputEvent::Reset], &mut src);
        assert_eq!(events, vec![GameEvent::MusicStarted]);
        assert_eq!(w.player.cell, Cell::new(2, 0));
        assert_eq!(w.player.last_move, MoveVector::Down);
        assert_eq!(w.flags, SessionFlags::default());
        assert_eq!(w.light, LightLevel(0));
        assert_eq!(w.phase(), Phase::Playing);
    }

    #[test]
    fn reset_after_win_allows_winning_again() {
        let mut w = WorldState::new(maze_from(&["SE"]), 4);
        let first = run(&mut w, &[InputEvent::Move(MoveVector::Right)]);
        assert!(first.contains(&GameEvent::Victory));
        let again = run(&mut w, &[InputEvent::Reset, InputEvent::Move(MoveVector::Right)]);
        assert_eq!(again, vec![
            GameEvent::MusicStarted,
            GameEvent::MusicStopped,
            GameEvent::Victory,
        ]);
    }

    #[test]
    fn quit_stops_processing_the_frame() {
        let mut w = corridor();
        let events = run(&mut w, &[InputEvent::Quit, InputEvent::Move(MoveVector::Right)]);
        assert_eq!(events, vec![GameEvent::QuitRequested]);
        assert_eq!(w.player.cell, Cell::new(0, 0));
    }

    fn any_input() -> impl Strategy<Value = InputEvent> {
        prop_oneof![
            Just(InputEvent::ToggleView),
            Just(InputEvent::ToggleCheat),
            Just(InputEvent::CycleLight),
            Just(InputEvent::ToggleSolution),
            prop::sample::select(MoveVector::POLL_ORDER.to_vec()).prop_map(InputEvent::Move),
        ]
    }

    proptest! {
        #[test]
        fn player_never_leaves_grid_or_enters_wall_without_cheat(
            inputs in prop::collection::vec(any_input(), 0..60),
        ) {
            let mut w = walled();
            for input in inputs {
                let was_open = w.maze.grid.is_corridor(w.player.cell);
                run(&mut w, &[input]);
                prop_assert!(w.maze.grid.contains(w.player.cell));
                if was_open && !w.flags.cheat_mode {
                    prop_assert!(w.maze.grid.is_corridor(w.player.cell));
                }
            }
        }

        #[test]
        fn cycling_light_n_times_is_identity(start in 0usize..4) {
            let mut w = corridor();
            w.light = LightLevel(start);
            let n = w.light_levels;
            for _ in 0..n {
                run(&mut w, &[InputEvent::CycleLight]);
            }
            prop_assert_eq!(w.light, LightLevel(start));
        }

        #[test]
        fn victory_fires_at_most_once_per_maze(
            inputs in prop::collection::vec(any_input(), 0..80),
        ) {
            let mut w = corridor();
            let mut victories = 0;
            for input in inputs {
                victories += run(&mut w, &[input])
                    .iter()
                    .filter(|e| **e == GameEvent::Victory)
                    .count();
            }
            prop_assert!(victories <= 1);
        }
    }
}
