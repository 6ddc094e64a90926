/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// The view draws into an indexed `PixelBuffer`; this module turns it into
/// terminal cells. Each terminal cell shows two stacked pixels with the
/// upper-half block glyph: foreground = top pixel, background = bottom.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of TermCell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Layout: HUD row, map, then a help row below the map.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::world::{Phase, WorldState};
use super::canvas::PixelBuffer;
use super::palette::Palette;

const UPPER_HALF: char = '▀';

// ── TermCell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct TermCell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl TermCell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// gaps between rows match on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: TermCell = TermCell { ch: ' ', fg: Color::White, bg: TermCell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: TermCell = TermCell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of TermCells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<TermCell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![TermCell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![TermCell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(TermCell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: TermCell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> TermCell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            TermCell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, TermCell { ch, fg, bg });
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, TermCell { ch: ' ', fg: Color::White, bg });
        }
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WIN_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const HELP: &str = " ←↑↓→ Move  V View  L Light  S Solution  C Cheat  R New maze  Q Quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    palette: Palette,
    last_phase: Option<(u32, Phase)>,
}

impl Renderer {
    pub fn new(palette: Palette) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            palette,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(TermCell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn present(&mut self, pixels: &PixelBuffer, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(TermCell::BASE_BG), Clear(ClearType::All))?;
        }

        // New maze or win → clean repaint
        let phase = (world.maze_count, world.phase());
        if self.last_phase != Some(phase) {
            self.back.cells.fill(TermCell::INVALID);
            self.last_phase = Some(phase);
        }

        self.compose(pixels, world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(TermCell::INVALID);
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, pixels: &PixelBuffer, world: &WorldState) {
        self.front.clear();

        let map_cols = pixels.width().max(0) as usize;
        let map_rows = (pixels.height().max(0) as usize).div_ceil(2);
        let x0 = self.front.width.saturating_sub(map_cols) / 2;

        self.compose_hud(world);

        for row in 0..map_rows {
            let ty = MAP_ROW + row;
            if ty >= self.front.height { break; }
            for col in 0..map_cols {
                let (x, y) = (col as i32, 2 * row as i32);
                let top = pixels.get(x, y).map_or(TermCell::BASE_BG, |c| self.palette.color(c));
                let bottom = pixels.get(x, y + 1).map_or(TermCell::BASE_BG, |c| self.palette.color(c));
                self.front.set(x0 + col, ty, TermCell { ch: UPPER_HALF, fg: top, bg: bottom });
            }
        }

        let help_row = MAP_ROW + map_rows;
        if help_row < self.front.height {
            self.front.put_str(0, help_row, HELP, Color::DarkGrey, TermCell::BASE_BG);
        }
    }

    fn compose_hud(&mut self, w: &WorldState) {
        let on = |b: bool| if b { "on " } else { "off" };
        let view = if w.flags.player_centric { "player" } else { "maze  " };
        let hud = format!(
            " aMAZEing #{:<3}  Light {}/{}  View {}  Solution {}  Cheat {} ",
            w.maze_count,
            w.light.0 + 1,
            w.light_levels,
            view,
            on(w.flags.solution_visible),
            on(w.flags.cheat_mode),
        );

        if w.phase() == Phase::Won {
            self.front.fill_row(HUD_ROW, WIN_BG);
            self.front.put_str(0, HUD_ROW, " ★ You found the exit!  R for a new maze, Q to quit ", Color::Black, WIN_BG);
        } else {
            self.front.fill_row(HUD_ROW, HUD_BG);
            self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = TermCell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default and leave line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(TermCell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
