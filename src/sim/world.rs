/// WorldState: everything that changes while a maze is being played.
///
/// ## Ownership
///
/// The `Maze` (grid, entrances, solutions) is owned here and only read
/// after construction. It is swapped out wholesale on reset, together with
/// the player and the session flags, so a frame never sees a mix of old
/// and new maze data.
///
/// ## Phase
///
/// `Playing` until the player stands on the end cell, then `Won` until
/// the next reset. The `won` flag doubles as the latch that keeps the
/// victory cue to one per maze.

use crate::domain::cell::{Cell, MoveVector};
use crate::domain::grid::Maze;
use crate::domain::light::LightLevel;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Won,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerState {
    pub cell: Cell,
    /// Last accepted move; drives the sprite facing.
    pub last_move: MoveVector,
}

impl PlayerState {
    pub fn at(cell: Cell) -> Self {
        PlayerState { cell, last_move: MoveVector::Down }
    }
}

/// Per-session toggles. All start (and reset) to false.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SessionFlags {
    pub player_centric: bool,
    pub cheat_mode: bool,
    pub solution_visible: bool,
    pub won: bool,
}

pub struct WorldState {
    pub maze: Maze,
    pub player: PlayerState,
    pub light: LightLevel,
    pub flags: SessionFlags,
    /// Number of light levels; `CycleLight` wraps at this count.
    pub light_levels: usize,
    /// Mazes played this session, including the current one.
    pub maze_count: u32,
}

impl WorldState {
    pub fn new(maze: Maze, light_levels: usize) -> Self {
        WorldState {
            player: PlayerState::at(maze.start),
            maze,
            light: LightLevel::default(),
            flags: SessionFlags::default(),
            light_levels,
            maze_count: 1,
        }
    }

    /// Replace the maze and reinitialise everything derived from it.
    pub fn reset(&mut self, maze: Maze) {
        self.player = PlayerState::at(maze.start);
        self.maze = maze;
        self.light = LightLevel::default();
        self.flags = SessionFlags::default();
        self.maze_count += 1;
    }

    pub fn phase(&self) -> Phase {
        if self.flags.won { Phase::Won } else { Phase::Playing }
    }

    /// One-line description of the current maze, for the log.
    pub fn summary(&self) -> String {
        format!(
            "maze #{} ready: {}x{}, solution length {}",
            self.maze_count,
            self.maze.grid.rows(),
            self.maze.grid.cols(),
            self.maze.solution().len(),
        )
    }

    /// Is the player standing on the exit?
    pub fn at_exit(&self) -> bool {
        self.player.cell == self.maze.end
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::cell::Cell;
    use crate::domain::grid::{Maze, WallGrid};

    /// Maze from a diagram: `S` start, `E` end, `#` wall.
    pub fn maze_from(rows: &[&str]) -> Maze {
        let grid = WallGrid::from_diagram(rows);
        let mut start = Cell::default();
        let mut end = Cell::default();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                match ch {
                    'S' => start = Cell::new(r as i32, c as i32),
                    'E' => end = Cell::new(r as i32, c as i32),
                    _ => {}
                }
            }
        }
        let solutions = crate::domain::solver::shortest_path(&grid, start, end)
            .into_iter()
            .collect();
        Maze { grid, start, end, solutions }
    }
}
