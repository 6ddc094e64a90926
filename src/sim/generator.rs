/// Maze source: the generator the state machine calls on reset.
///
/// ## Layout
///
/// A logical `rows × cols` lattice of rooms becomes a
/// `(2·rows + 1) × (2·cols + 1)` wall grid. Rooms sit on odd coordinates;
/// the cells between two rooms are carved to join them.
///
/// ## Algorithm (hunt-and-kill)
///
///   1. Carve a random room and walk: step to a random unvisited
///      neighbour room, carving the wall between, until stuck.
///   2. Hunt: scan rows for an unvisited room touching a visited one,
///      carve the link, and walk again from there.
///   3. Stop when the hunt finds nothing.
///
/// ## Entrances
///
/// Start sits on a random border side, end on the opposite side, both
/// at odd offsets (never corners) and carved open.
///
/// ## Difficulty
///
/// `repeat` lattices × `entrances` entrance pairs are solved and ordered
/// by solution length; `difficulty` picks the quantile (0 easiest,
/// 1 hardest).

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::MazeConfig;
use crate::domain::cell::Cell;
use crate::domain::grid::{Maze, WallGrid};
use crate::domain::solver;

pub trait MazeSource {
    fn generate(&mut self) -> Maze;
}

pub struct HuntAndKill<R: Rng> {
    rows: usize,
    cols: usize,
    repeat: usize,
    entrances: usize,
    difficulty: f64,
    rng: R,
}

impl HuntAndKill<StdRng> {
    /// Generator from config. `seed` makes the maze sequence reproducible.
    pub fn from_config(cfg: &MazeConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        HuntAndKill::with_rng(cfg, rng)
    }
}

impl<R: Rng> HuntAndKill<R> {
    pub fn with_rng(cfg: &MazeConfig, rng: R) -> Self {
        HuntAndKill {
            rows: cfg.rows.max(1),
            cols: cfg.cols.max(1),
            repeat: cfg.repeat.max(1),
            entrances: cfg.entrances.max(1),
            difficulty: cfg.difficulty.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Carve one perfect maze (all walls except the room lattice links).
    fn carve(&mut self) -> WallGrid {
        let mut grid = WallGrid::filled(2 * self.rows + 1, 2 * self.cols + 1, true);

        let mut current = room(
            self.rng.random_range(0..self.rows),
            self.rng.random_range(0..self.cols),
        );
        grid.set(current, false);

        loop {
            current = self.walk(&mut grid, current);
            match self.hunt(&mut grid) {
                Some(next) => current = next,
                None => break,
            }
        }
        grid
    }

    /// Random walk through unvisited rooms until stuck. Returns the last room.
    fn walk(&mut self, grid: &mut WallGrid, mut current: Cell) -> Cell {
        loop {
            let options: Vec<Cell> = room_neighbours(grid, current)
                .filter(|&n| grid.is_wall(n) == Some(true))
                .collect();
            let Some(&next) = options.choose(&mut self.rng) else {
                return current;
            };
            grid.set(between(current, next), false);
            grid.set(next, false);
            current = next;
        }
    }

    /// First unvisited room (row scan) with a visited neighbour, linked in.
    fn hunt(&mut self, grid: &mut WallGrid) -> Option<Cell> {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let cell = room(r, c);
                if grid.is_wall(cell) != Some(true) {
                    continue;
                }
                let visited: Vec<Cell> = room_neighbours(grid, cell)
                    .filter(|&n| grid.is_corridor(n))
                    .collect();
                if let Some(&link) = visited.choose(&mut self.rng) {
                    grid.set(between(cell, link), false);
                    grid.set(cell, false);
                    return Some(cell);
                }
            }
        }
        None
    }

    /// Start on a random border side, end on the opposite one.
    fn pick_entrances(&mut self, grid: &WallGrid) -> (Cell, Cell) {
        let (rows, cols) = (self.rows, self.cols);
        let last_row = grid.rows() as i32 - 1;
        let last_col = grid.cols() as i32 - 1;
        let rng = &mut self.rng;
        let side = rng.random_range(0..4);
        if side < 2 {
            let (from, to) = if side == 0 { (0, last_row) } else { (last_row, 0) };
            let a = Cell::new(from, odd(rng.random_range(0..cols)));
            let b = Cell::new(to, odd(rng.random_range(0..cols)));
            (a, b)
        } else {
            let (from, to) = if side == 2 { (0, last_col) } else { (last_col, 0) };
            let a = Cell::new(odd(rng.random_range(0..rows)), from);
            let b = Cell::new(odd(rng.random_range(0..rows)), to);
            (a, b)
        }
    }
}

impl<R: Rng> MazeSource for HuntAndKill<R> {
    fn generate(&mut self) -> Maze {
        let mut candidates: Vec<Maze> = Vec::with_capacity(self.repeat * self.entrances);

        for _ in 0..self.repeat {
            let carved = self.carve();
            for _ in 0..self.entrances {
                let (start, end) = self.pick_entrances(&carved);
                let mut grid = carved.clone();
                grid.set(start, false);
                grid.set(end, false);
                let solutions: Vec<Vec<Cell>> =
                    solver::shortest_path(&grid, start, end).into_iter().collect();
                candidates.push(Maze { grid, start, end, solutions });
            }
        }

        candidates.sort_by_key(|m| m.solution().len());
        let pick = ((candidates.len() - 1) as f64 * self.difficulty) as usize;
        let maze = candidates.swap_remove(pick);
        log::debug!(
            "maze {}x{} start={:?} end={:?} solution={} ({} candidates)",
            maze.grid.rows(),
            maze.grid.cols(),
            maze.start,
            maze.end,
            maze.solution().len(),
            self.repeat * self.entrances,
        );
        maze
    }
}

/// Grid coordinates of lattice room (r, c).
fn room(r: usize, c: usize) -> Cell {
    Cell::new(odd(r), odd(c))
}

/// Lattice index → grid coordinate.
fn odd(i: usize) -> i32 {
    2 * i as i32 + 1
}

/// In-bounds rooms two steps away (up, down, left, right), excluding the
/// outer border ring.
fn room_neighbours(grid: &WallGrid, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
    [(-2, 0), (2, 0), (0, -2), (0, 2)]
        .into_iter()
        .map(move |(dr, dc)| cell.offset(dr, dc))
        .filter(move |n| {
            n.row > 0
                && n.col > 0
                && (n.row as usize) < grid.rows() - 1
                && (n.col as usize) < grid.cols() - 1
        })
}

fn between(a: Cell, b: Cell) -> Cell {
    Cell::new((a.row + b.row) / 2, (a.col + b.col) / 2)
}

/// Hands out clones of prepared mazes in turn. Used by tests.
#[cfg(test)]
pub struct FixedMazes {
    mazes: Vec<Maze>,
    next: usize,
}

#[cfg(test)]
impl FixedMazes {
    pub fn new(mazes: Vec<Maze>) -> Self {
        FixedMazes { mazes, next: 0 }
    }
}

#[cfg(test)]
impl MazeSource for FixedMazes {
    fn generate(&mut self) -> Maze {
        let m = self.mazes[self.next % self.mazes.len()].clone();
        self.next += 1;
        m
    }
}
