/// Shortest-path solver over corridor cells (breadth-first).

use std::collections::VecDeque;

use super::cell::{Cell, MoveVector};
use super::grid::WallGrid;

/// Shortest path from `start` to `end`, both included.
/// `end` counts as open even if the grid marks it as a wall, matching
/// the movement rules. Returns `None` when no path exists.
pub fn shortest_path(grid: &WallGrid, start: Cell, end: Cell) -> Option<Vec<Cell>> {
    if !grid.contains(start) || !grid.contains(end) {
        return None;
    }

    let cols = grid.cols();
    let idx = |c: Cell| c.row as usize * cols + c.col as usize;
    let mut came_from: Vec<Option<Cell>> = vec![None; grid.rows() * cols];
    let mut seen = vec![false; grid.rows() * cols];
    let mut queue = VecDeque::new();

    seen[idx(start)] = true;
    queue.push_back(start);

    while let Some(here) = queue.pop_front() {
        if here == end {
            return Some(walk_back(&came_from, idx, start, end));
        }
        for mv in MoveVector::POLL_ORDER {
            let next = here.translate(mv);
            let open = next == end || grid.is_corridor(next);
            if open && !seen[idx(next)] {
                seen[idx(next)] = true;
                came_from[idx(next)] = Some(here);
                queue.push_back(next);
            }
        }
    }
    None
}

fn walk_back(
    came_from: &[Option<Cell>],
    idx: impl Fn(Cell) -> usize,
    start: Cell,
    end: Cell,
) -> Vec<Cell> {
    let mut path = vec![end];
    let mut cur = end;
    while cur != start {
        match came_from[idx(cur)] {
            Some(prev) => {
                path.push(prev);
                cur = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor() {
        let g = WallGrid::from_diagram(&["    "]);
        let p = shortest_path(&g, Cell::new(0, 0), Cell::new(0, 3)).unwrap();
        assert_eq!(p, vec![
            Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2), Cell::new(0, 3),
        ]);
    }

    #[test]
    fn winds_around_walls() {
        let g = WallGrid::from_diagram(&[
            " # ",
            " # ",
            "   ",
        ]);
        let p = shortest_path(&g, Cell::new(0, 0), Cell::new(0, 2)).unwrap();
        assert_eq!(p.len(), 7);
        assert_eq!(p.first(), Some(&Cell::new(0, 0)));
        assert_eq!(p.last(), Some(&Cell::new(0, 2)));
        for pair in p.windows(2) {
            assert_eq!(pair[0].distance_sq(pair[1]), 1);
        }
    }

    #[test]
    fn walled_off_end_has_no_path() {
        let g = WallGrid::from_diagram(&[" # "]);
        assert!(shortest_path(&g, Cell::new(0, 0), Cell::new(0, 2)).is_none());
    }

    #[test]
    fn end_on_wall_is_reachable() {
        let g = WallGrid::from_diagram(&["  #"]);
        let p = shortest_path(&g, Cell::new(0, 0), Cell::new(0, 2)).unwrap();
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn start_equals_end() {
        let g = WallGrid::from_diagram(&[" "]);
        let p = shortest_path(&g, Cell::new(0, 0), Cell::new(0, 0)).unwrap();
        assert_eq!(p, vec![Cell::new(0, 0)]);
    }
}
