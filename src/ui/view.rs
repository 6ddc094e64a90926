/// Projection from world state to canvas pixels.
///
/// Two camera modes:
///
///   Maze-centric    every grid cell at `(col·cw, row·cw)`; start and end
///                   always lit; player sprite at its cell; optional
///                   solution markers on top.
///   Player-centric  a `(2r+1)²` window of cells around the player, each
///                   placed at `(centre + offset)·cw`; window cells that
///                   fall off the grid are skipped; the player sprite sits
///                   at the centre. Walls stay dark and there are no
///                   start/end or solution overlays.
///
/// The centre is the middle cell of the grid, so both modes share one
/// canvas size.

use crate::config::{ColorScheme, GameConfig};
use crate::domain::cell::Cell;
use crate::domain::grid::WallGrid;
use crate::domain::light::Lighting;
use crate::domain::sprite::{self, Animation};
use crate::sim::world::WorldState;
use super::canvas::{Canvas, SpriteSheet};

pub struct View {
    lighting: Lighting,
    colors: ColorScheme,
    cell_width: i32,
    marker_size: i32,
    window_radius: i32,
    animation: Animation,
    sheet: SpriteSheet,
}

impl View {
    pub fn new(cfg: &GameConfig) -> Self {
        let cell_width = cfg.display.cell_width.max(1);
        View {
            lighting: Lighting::new(cfg.light_powers.clone()),
            colors: cfg.colors.clone(),
            cell_width,
            marker_size: cfg.display.marker_size.clamp(1, cell_width),
            window_radius: cfg.display.window_radius.max(0),
            animation: cfg.animation,
            sheet: SpriteSheet::player(cell_width),
        }
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Canvas size in pixels needed for `grid`.
    pub fn canvas_size(&self, grid: &WallGrid) -> (i32, i32) {
        let side = |cells: usize| {
            i32::try_from(cells)
                .ok()
                .and_then(|n| n.checked_mul(self.cell_width))
                .unwrap_or(i32::MAX)
        };
        (side(grid.cols()), side(grid.rows()))
    }

    pub fn render(&self, world: &WorldState, frame_count: u64, canvas: &mut dyn Canvas) {
        canvas.cls(self.colors.background);
        if world.flags.player_centric {
            self.draw_player_centric(world, frame_count, canvas);
        } else {
            self.draw_maze_centric(world, frame_count, canvas);
        }
    }

    // ── Maze-centric ──

    fn draw_maze_centric(&self, world: &WorldState, frame_count: u64, canvas: &mut dyn Canvas) {
        let maze = &world.maze;
        let player = world.player.cell;

        for (cell, wall) in maze.grid.cells() {
            let color = if wall {
                self.wall_color(cell, world)
            } else {
                self.corridor_color(cell, world, false)
            };
            self.fill_cell(canvas, cell, color);
        }

        for cell in [maze.start, maze.end] {
            self.fill_cell(canvas, cell, self.corridor_color(cell, world, true));
        }

        self.draw_player(canvas, world, frame_count, self.pixel(player));

        if world.flags.solution_visible {
            let inset = (self.cell_width - self.marker_size) / 2;
            for &cell in maze.solution() {
                let (x, y) = self.pixel(cell);
                canvas.fill_rect(
                    x + inset,
                    y + inset,
                    self.marker_size,
                    self.marker_size,
                    self.colors.solution,
                );
            }
        }
    }

    // ── Player-centric ──

    fn draw_player_centric(&self, world: &WorldState, frame_count: u64, canvas: &mut dyn Canvas) {
        let grid = &world.maze.grid;
        let centre = screen_centre(grid);

        for (cell, offset) in window_cells(grid, world.player.cell, self.window_radius) {
            let color = if grid.is_wall(cell) == Some(true) {
                self.colors.wall_hidden
            } else {
                self.corridor_color(cell, world, false)
            };
            let screen = Cell::new(centre.row + offset.row, centre.col + offset.col);
            self.fill_cell(canvas, screen, color);
        }

        self.draw_player(canvas, world, frame_count, self.pixel(centre));
    }

    // ── Helpers ──

    fn corridor_color(&self, cell: Cell, world: &WorldState, force: bool) -> u8 {
        let tier = self.lighting.classify(cell, world.player.cell, world.light, force);
        self.colors.corridor[tier.index()]
    }

    fn wall_color(&self, cell: Cell, world: &WorldState) -> u8 {
        if self.lighting.classify_wall(cell, world.player.cell, world.light) {
            self.colors.wall_near
        } else {
            self.colors.wall_hidden
        }
    }

    fn draw_player(&self, canvas: &mut dyn Canvas, world: &WorldState, frame_count: u64, at: (i32, i32)) {
        let blit = sprite::player_blit(
            world.player.last_move,
            frame_count,
            self.animation,
            self.sheet.tile(),
            Some(self.colors.sprite_key),
        );
        canvas.blit_sprite(at.0, at.1, &self.sheet, blit);
    }

    fn fill_cell(&self, canvas: &mut dyn Canvas, cell: Cell, color: u8) {
        let (x, y) = self.pixel(cell);
        canvas.fill_rect(x, y, self.cell_width, self.cell_width, color);
    }

    /// Top-left pixel of a cell.
    fn pixel(&self, cell: Cell) -> (i32, i32) {
        (cell.col * self.cell_width, cell.row * self.cell_width)
    }
}

/// Middle cell of the grid; the player-centric camera pins the player here.
pub fn screen_centre(grid: &WallGrid) -> Cell {
    Cell::new(grid.rows() as i32 / 2, grid.cols() as i32 / 2)
}

/// In-bounds cells of the `(2r+1)²` window around `player`, row-major,
/// each paired with its `(row, col)` offset from the player.
pub fn window_cells(grid: &WallGrid, player: Cell, radius: i32) -> impl Iterator<Item = (Cell, Cell)> + '_ {
    (-radius..=radius)
        .flat_map(move |dr| (-radius..=radius).map(move |dc| (dr, dc)))
        .filter_map(move |(dr, dc)| {
            let cell = player.offset(dr, dc);
            grid.contains(cell).then_some((cell, Cell::new(dr, dc)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::MoveVector;
    use crate::domain::light::LightLevel;
    use crate::sim::world::fixtures::maze_from;
    use crate::ui::canvas::{DrawOp, PixelBuffer, Recorder};

    const CW: i32 = 8;

    fn view() -> View {
        let mut cfg = GameConfig::default();
        cfg.display.cell_width = CW;
        cfg.display.marker_size = 2;
        View::new(&cfg)
    }

    fn open_grid(n: usize) -> WorldState {
        let line = " ".repeat(n);
        let rows: Vec<&str> = (0..n).map(|_| line.as_str()).collect();
        let mut m = maze_from(&rows);
        m.start = Cell::new(0, 0);
        m.end = Cell::new(n as i32 - 1, n as i32 - 1);
        WorldState::new(m, 4)
    }

    fn four_by_four() -> WorldState {
        WorldState::new(maze_from(&[
            "S#  ",
            " # #",
            "    ",
            "## E",
        ]), 4)
    }

    #[test]
    fn maze_centric_draws_every_cell_then_overlays() {
        let w = four_by_four();
        let mut rec = Recorder::default();
        view().render(&w, 0, &mut rec);

        assert_eq!(rec.ops[0], DrawOp::Cls(0));
        let rects: Vec<_> = rec.rects().collect();
        // 16 cells + start + end
        assert_eq!(rects.len(), 18);
        assert_eq!(rects[0], (0, 0, CW, CW, 7));
        // (3,3) at d = √18 with p = 1 is tier 2
        assert_eq!(rects[15], (3 * CW, 3 * CW, CW, CW, 9));
        // then forced bright at the end
        assert_eq!(rects[17], (3 * CW, 3 * CW, CW, CW, 7));
        assert_eq!(rec.sprites().len(), 1);
        assert!(matches!(rec.ops.last(), Some(DrawOp::Sprite { .. })));
    }

    #[test]
    fn walls_near_are_lit_and_far_are_hidden() {
        let w = WorldState::new(maze_from(&["S#####"]), 4);
        let mut rec = Recorder::default();
        view().render(&w, 0, &mut rec);
        let rects: Vec<_> = rec.rects().collect();
        // p = 1: walls at d < 5 visible, d = 5 hidden
        assert_eq!(rects[4].4, 1);
        assert_eq!(rects[5].4, 0);
    }

    #[test]
    fn solution_markers_are_centred_after_sprite() {
        let mut w = WorldState::new(maze_from(&["S E"]), 4);
        w.flags.solution_visible = true;
        let mut rec = Recorder::default();
        view().render(&w, 0, &mut rec);

        let tail: Vec<_> = rec.rects().skip(3 + 2).collect();
        assert_eq!(tail, vec![
            (3, 3, 2, 2, 11),
            (CW + 3, 3, 2, 2, 11),
            (2 * CW + 3, 3, 2, 2, 11),
        ]);
        let sprite_pos = rec.ops.iter().position(|op| matches!(op, DrawOp::Sprite { .. }));
        let first_marker = rec.ops.iter().position(|op| matches!(op, DrawOp::Rect { color: 11, .. }));
        assert!(sprite_pos < first_marker);
    }

    #[test]
    fn sprite_follows_player_and_facing() {
        let mut w = four_by_four();
        w.player.cell = Cell::new(2, 1);
        w.player.last_move = MoveVector::Left;
        let mut rec = Recorder::default();
        view().render(&w, 20, &mut rec);
        let (x, y, blit) = rec.sprites()[0];
        assert_eq!((x, y), (CW, 2 * CW));
        assert_eq!(blit.w, -CW);
        // frame 20 % 32 > 16 → walk frame 0 of the side group
        assert_eq!(blit.src_x, 5 * CW);
        assert_eq!(blit.colorkey, Some(0));
    }

    #[test]
    fn player_centric_corner_draws_in_bounds_quadrant() {
        let w = {
            let mut w = open_grid(40);
            w.flags.player_centric = true;
            w
        };
        let mut rec = Recorder::default();
        view().render(&w, 0, &mut rec);

        let rects: Vec<_> = rec.rects().collect();
        assert_eq!(rects.len(), 17 * 17);

        // player at (0,0) pinned to the grid centre (20,20)
        let (x, y, _) = rec.sprites()[0];
        assert_eq!((x, y), (20 * CW, 20 * CW));
        // first drawn cell is the player's own, at the centre
        assert_eq!(rects[0], (20 * CW, 20 * CW, CW, CW, 7));
        // last is offset (16,16)
        assert_eq!(rects[rects.len() - 1].0, 36 * CW);
    }

    #[test]
    fn player_centric_has_no_overlays_and_dark_walls() {
        let mut w = four_by_four();
        w.flags.player_centric = true;
        w.flags.solution_visible = true;
        let mut rec = Recorder::default();
        view().render(&w, 0, &mut rec);
        let rects: Vec<_> = rec.rects().collect();
        assert_eq!(rects.len(), 16);
        assert!(!rects.iter().any(|r| r.4 == 11));
        // (0,1) is a wall right next to the player: still drawn dark
        let centre = screen_centre(&w.maze.grid);
        let wall_px = ((centre.col + 1) * CW, centre.row * CW, CW, CW, 0);
        assert!(rects.contains(&wall_px));
    }

    #[test]
    fn window_clips_at_grid_edges() {
        let g = WallGrid::filled(5, 5, false);
        assert_eq!(window_cells(&g, Cell::new(0, 0), 16).count(), 25);
        assert_eq!(window_cells(&g, Cell::new(2, 2), 1).count(), 9);
        assert_eq!(window_cells(&g, Cell::new(0, 4), 1).count(), 4);
        let first = window_cells(&g, Cell::new(0, 0), 2).next();
        assert_eq!(first, Some((Cell::new(0, 0), Cell::new(0, 0))));
    }

    #[test]
    fn brighter_light_lights_farther_cells() {
        let mut w = open_grid(12);
        let v = view();
        let colour_at = |w: &WorldState| {
            let mut buf = PixelBuffer::new(12 * CW, 12 * CW);
            v.render(w, 0, &mut buf);
            buf.get(6 * CW, 6 * CW)
        };
        // (6,6) from (0,0): d² = 72
        assert_eq!(colour_at(&w), Some(0));
        w.light = LightLevel(1);
        assert_eq!(colour_at(&w), Some(9));
        w.light = LightLevel(3);
        assert_eq!(colour_at(&w), Some(10));
    }

    #[test]
    fn canvas_fits_grid() {
        let w = four_by_four();
        assert_eq!(view().canvas_size(&w.maze.grid), (4 * CW, 4 * CW));
    }
}
