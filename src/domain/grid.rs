/// Wall grid and the maze bundle handed out by the generator.
///
/// `true` = wall, `false` = corridor. The grid is filled in by the
/// generator and only read afterwards; game code never holds a `&mut`.

use super::cell::Cell;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct WallGrid {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl WallGrid {
    /// A `rows × cols` grid with every cell set to `wall`.
    pub fn filled(rows: usize, cols: usize, wall: bool) -> Self {
        WallGrid { rows, cols, walls: vec![wall; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Is `cell` inside `[0, rows) × [0, cols)`?
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// Wall flag at `cell`, or `None` if out of bounds.
    #[inline]
    pub fn is_wall(&self, cell: Cell) -> Option<bool> {
        self.index(cell).map(|i| self.walls[i])
    }

    /// Is `cell` an in-bounds corridor?
    #[inline]
    pub fn is_corridor(&self, cell: Cell) -> bool {
        self.is_wall(cell) == Some(false)
    }

    /// Set a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: Cell, wall: bool) {
        if let Some(i) = self.index(cell) {
            self.walls[i] = wall;
        }
    }

    /// All cells in row-major order with their wall flag.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.walls.iter().enumerate().map(move |(i, &wall)| {
            let cell = Cell::new((i / self.cols) as i32, (i % self.cols) as i32);
            (cell, wall)
        })
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row as usize * self.cols + cell.col as usize)
        } else {
            None
        }
    }

    /// Build a grid from a diagram. `#` = wall, anything else = corridor.
    #[cfg(test)]
    pub fn from_diagram(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = WallGrid::filled(height, width, false);
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                grid.set(Cell::new(r as i32, c as i32), ch == '#');
            }
        }
        grid
    }
}

/// One maze instance: the grid, its entrances and the solver's paths.
#[derive(Clone, Debug)]
pub struct Maze {
    pub grid: WallGrid,
    pub start: Cell,
    pub end: Cell,
    pub solutions: Vec<Vec<Cell>>,
}

impl Maze {
    /// First solution path, or an empty slice if the solver found none.
    pub fn solution(&self) -> &[Cell] {
        self.solutions.first().map(Vec::as_slice).unwrap_or(&[])
    }
}
