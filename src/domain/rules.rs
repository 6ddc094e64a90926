/// Movement rules: pure legality checks, no side effects.
///
/// ## Movement Truth Table
///
/// ┌───────────────────────────┬──────────┬────────────────────────┐
/// │ Condition (in order)      │ Allow?   │ Notes                  │
/// ├───────────────────────────┼──────────┼────────────────────────┤
/// │ target out of bounds      │ DENY     │ map edge, not an error │
/// │ target == end             │ ALLOW    │ exit is always open    │
/// │ target is corridor        │ ALLOW    │                        │
/// │ target is wall            │ DENY     │ bump                   │
/// └───────────────────────────┴──────────┴────────────────────────┘
///
/// Cheat mode skips the wall rows but never the bounds row; see
/// `can_phase`.

use super::cell::{Cell, MoveVector};
use super::grid::WallGrid;

/// May the player step from `current` along `mv`?
pub fn is_legal(current: Cell, mv: MoveVector, grid: &WallGrid, end: Cell) -> bool {
    let target = current.translate(mv);
    match grid.is_wall(target) {
        None => false,
        Some(wall) => !wall || target == end,
    }
}

/// Cheat-mode check: walls are ignored, the grid edge still holds.
pub fn can_phase(current: Cell, mv: MoveVector, grid: &WallGrid) -> bool {
    grid.contains(current.translate(mv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(row: i32, col: i32) -> Cell {
        Cell::new(row, col)
    }

    #[test]
    fn corridor_step_is_legal() {
        let g = WallGrid::from_diagram(&[
            "   ",
            " # ",
            "   ",
        ]);
        assert!(is_legal(c(0, 0), MoveVector::Right, &g, c(2, 2)));
        assert!(is_legal(c(0, 0), MoveVector::Down, &g, c(2, 2)));
    }

    #[test]
    fn wall_step_is_rejected() {
        let g = WallGrid::from_diagram(&[
            "   ",
            " # ",
            "   ",
        ]);
        assert!(!is_legal(c(0, 1), MoveVector::Down, &g, c(2, 2)));
        assert!(!is_legal(c(1, 0), MoveVector::Right, &g, c(2, 2)));
    }

    #[test]
    fn edge_step_is_rejected() {
        let g = WallGrid::from_diagram(&["  ", "  "]);
        assert!(!is_legal(c(0, 0), MoveVector::Up, &g, c(1, 1)));
        assert!(!is_legal(c(0, 0), MoveVector::Left, &g, c(1, 1)));
        assert!(!is_legal(c(1, 1), MoveVector::Down, &g, c(1, 1)));
        assert!(!is_legal(c(1, 1), MoveVector::Right, &g, c(1, 1)));
    }

    #[test]
    fn end_is_enterable_even_on_a_wall() {
        let g = WallGrid::from_diagram(&[
            "###",
            "  #",
            "###",
        ]);
        assert!(is_legal(c(1, 1), MoveVector::Right, &g, c(1, 2)));
        assert!(!is_legal(c(1, 1), MoveVector::Right, &g, c(0, 0)));
    }

    #[test]
    fn phase_ignores_walls_but_not_edges() {
        let g = WallGrid::from_diagram(&[" #", "##"]);
        assert!(can_phase(c(0, 0), MoveVector::Right, &g));
        assert!(can_phase(c(0, 0), MoveVector::Down, &g));
        assert!(!can_phase(c(0, 0), MoveVector::Up, &g));
        assert!(!can_phase(c(1, 1), MoveVector::Right, &g));
    }

    fn any_move() -> impl Strategy<Value = MoveVector> {
        prop::sample::select(MoveVector::POLL_ORDER.to_vec())
    }

    proptest! {
        #[test]
        fn moving_onto_end_is_always_legal(
            walls in prop::collection::vec(any::<bool>(), 25),
            row in 0i32..5, col in 0i32..5, mv in any_move(),
        ) {
            let mut g = WallGrid::filled(5, 5, false);
            for (i, w) in walls.iter().enumerate() {
                g.set(c(i as i32 / 5, i as i32 % 5), *w);
            }
            let here = c(row, col);
            let end = here.translate(mv);
            prop_assume!(g.contains(end));
            prop_assert!(is_legal(here, mv, &g, end));
        }

        #[test]
        fn wall_not_at_end_is_never_enterable(
            row in 0i32..5, col in 0i32..5, mv in any_move(),
        ) {
            let g = WallGrid::filled(5, 5, true);
            let end = c(-10, -10);
            prop_assert!(!is_legal(c(row, col), mv, &g, end));
        }
    }
}
