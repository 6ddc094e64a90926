/// Grid coordinates and the four unit moves.
///
/// A `Cell` is a plain value: moving produces a new cell via `translate`,
/// nothing is mutated in place. Coordinates are signed so that a step off
/// the edge of the grid is representable (and then rejected by the rules).

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The neighbouring cell one step along `mv`.
    pub fn translate(self, mv: MoveVector) -> Cell {
        let (dr, dc) = mv.delta();
        Cell::new(self.row + dr, self.col + dc)
    }

    /// Offset by an arbitrary (row, col) delta. Used for window walks.
    pub fn offset(self, dr: i32, dc: i32) -> Cell {
        Cell::new(self.row + dr, self.col + dc)
    }

    /// Squared Euclidean distance in grid units.
    /// Kept squared so threshold comparisons stay exact integers.
    pub fn distance_sq(self, other: Cell) -> i64 {
        let dr = i64::from(self.row) - i64::from(other.row);
        let dc = i64::from(self.col) - i64::from(other.col);
        dr * dr + dc * dc
    }
}

/// Unit move: exactly one component is ±1, the other 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MoveVector {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl MoveVector {
    /// Polling order used by the run loop (down, up, right, left).
    pub const POLL_ORDER: [MoveVector; 4] = [
        MoveVector::Down,
        MoveVector::Up,
        MoveVector::Right,
        MoveVector::Left,
    ];

    /// (Δrow, Δcol)
    pub const fn delta(self) -> (i32, i32) {
        match self {
            MoveVector::Up => (-1, 0),
            MoveVector::Down => (1, 0),
            MoveVector::Left => (0, -1),
            MoveVector::Right => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_returns_new_value() {
        let c = Cell::new(3, 4);
        assert_eq!(c.translate(MoveVector::Up), Cell::new(2, 4));
        assert_eq!(c.translate(MoveVector::Down), Cell::new(4, 4));
        assert_eq!(c.translate(MoveVector::Left), Cell::new(3, 3));
        assert_eq!(c.translate(MoveVector::Right), Cell::new(3, 5));
        assert_eq!(c, Cell::new(3, 4));
    }

    #[test]
    fn translate_can_leave_the_grid() {
        assert_eq!(Cell::new(0, 0).translate(MoveVector::Up), Cell::new(-1, 0));
    }

    #[test]
    fn every_move_is_a_unit_vector() {
        for mv in MoveVector::POLL_ORDER {
            let (dr, dc) = mv.delta();
            assert_eq!(dr.abs() + dc.abs(), 1, "{mv:?}");
        }
    }

    #[test]
    fn default_move_faces_down() {
        assert_eq!(MoveVector::default(), MoveVector::Down);
    }

    #[test]
    fn distance_is_squared_euclidean() {
        assert_eq!(Cell::new(0, 0).distance_sq(Cell::new(3, 3)), 18);
        assert_eq!(Cell::new(5, 1).distance_sq(Cell::new(2, 5)), 25);
        assert_eq!(Cell::new(2, 2).distance_sq(Cell::new(2, 2)), 0);
    }
}
