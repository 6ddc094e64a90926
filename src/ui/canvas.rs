/// Drawing surface the view draws into.
///
/// Coordinates are canvas pixels, colours are palette indices. The
/// terminal presenter turns a finished `PixelBuffer` into glyphs; tests
/// use a recording canvas instead.

use crate::domain::sprite::SpriteBlit;

pub trait Canvas {
    /// Fill the whole surface with `color`.
    fn cls(&mut self, color: u8);

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8);

    /// Copy `blit`'s source rectangle of `sheet` to `(x, y)`.
    /// A negative width mirrors horizontally, a negative height vertically.
    /// Pixels equal to the colour key are left untouched.
    fn blit_sprite(&mut self, x: i32, y: i32, sheet: &SpriteSheet, blit: SpriteBlit);
}

// ── Pixel buffer ──

/// Indexed-colour framebuffer. Writes outside the surface are clipped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let len = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|&n| n <= i32::MAX as usize)
            .unwrap_or(0);
        if len == 0 {
            return PixelBuffer { width: 0, height: 0, pixels: Vec::new() };
        }
        PixelBuffer { width, height, pixels: vec![0; len] }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Colour at `(x, y)`, or `None` outside the surface.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn set(&mut self, x: i32, y: i32, color: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Canvas for PixelBuffer {
    fn cls(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px, py, color);
            }
        }
    }

    fn blit_sprite(&mut self, x: i32, y: i32, sheet: &SpriteSheet, blit: SpriteBlit) {
        let (w, h) = (blit.w.abs(), blit.h.abs());
        for dy in 0..h {
            let sy = if blit.h < 0 { blit.src_y + h - 1 - dy } else { blit.src_y + dy };
            for dx in 0..w {
                let sx = if blit.w < 0 { blit.src_x + w - 1 - dx } else { blit.src_x + dx };
                let Some(color) = sheet.get(sx, sy) else { continue };
                if Some(color) == blit.colorkey {
                    continue;
                }
                self.set(x + dx, y + dy, color);
            }
        }
    }
}

// ── Sprite sheet ──

/// Player art at 2×2 per tile: blank, down ×2, up ×2, side ×2.
/// Hex digits are palette indices, `.` is transparent (index 0).
const PLAYER_ART: [&str; 2] = [
    "..ffff44444f4f",
    "..8..88..88..8",
];
const ART_TILE: i32 = 2;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SpriteSheet {
    tile: i32,
    pixels: PixelBuffer,
}

impl SpriteSheet {
    /// Built-in player sheet scaled so each tile is `tile` pixels square.
    pub fn player(tile: i32) -> Self {
        let tile = tile.max(1);
        let tiles = PLAYER_ART[0].len() as i32 / ART_TILE;
        let mut pixels = PixelBuffer::new(tiles * tile, tile);

        for y in 0..tile {
            let art_row = PLAYER_ART[(y * ART_TILE / tile) as usize].as_bytes();
            for x in 0..tiles * tile {
                let (t, local) = (x / tile, x % tile);
                let art_x = t * ART_TILE + local * ART_TILE / tile;
                let color = (art_row[art_x as usize] as char).to_digit(16).unwrap_or(0);
                pixels.set(x, y, color as u8);
            }
        }
        SpriteSheet { tile, pixels }
    }

    pub fn tile(&self) -> i32 {
        self.tile
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.pixels.get(x, y)
    }
}

// ── Recording canvas (tests) ──

#[cfg(test)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrawOp {
    Cls(u8),
    Rect { x: i32, y: i32, w: i32, h: i32, color: u8 },
    Sprite { x: i32, y: i32, blit: SpriteBlit },
}

/// Remembers every call in order.
#[cfg(test)]
#[derive(Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Recorder {
    pub fn rects(&self) -> impl Iterator<Item = (i32, i32, i32, i32, u8)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::Rect { x, y, w, h, color } => Some((x, y, w, h, color)),
            _ => None,
        })
    }

    pub fn sprites(&self) -> Vec<(i32, i32, SpriteBlit)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                DrawOp::Sprite { x, y, blit } => Some((x, y, blit)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl Canvas for Recorder {
    fn cls(&mut self, color: u8) {
        self.ops.push(DrawOp::Cls(color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn blit_sprite(&mut self, x: i32, y: i32, _sheet: &SpriteSheet, blit: SpriteBlit) {
        self.ops.push(DrawOp::Sprite { x, y, blit });
    }
}
