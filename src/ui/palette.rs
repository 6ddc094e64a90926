/// 16-entry indexed palette. Everything on the canvas is a palette index;
/// only the presenter turns indices into terminal colours.

use crossterm::style::Color;

pub const PALETTE_SIZE: usize = 16;

/// Default colours, `0xRRGGBB`.
pub const DEFAULT_RGB: [u32; PALETTE_SIZE] = [
    0x000000, 0x2B335F, 0x7E2072, 0x19959C,
    0x8B4852, 0x395C98, 0xA9C1FF, 0xEEEEEE,
    0xD4186C, 0xD38441, 0xE9C35B, 0x70C6A9,
    0x7696DE, 0xA3A3A3, 0xFF9798, 0xEDC7B0,
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    rgb: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Palette { rgb: DEFAULT_RGB }
    }
}

impl Palette {
    pub fn new(rgb: [u32; PALETTE_SIZE]) -> Self {
        Palette { rgb }
    }

    /// Terminal colour for `index`. Out-of-range indices wrap.
    pub fn color(&self, index: u8) -> Color {
        let rgb = self.rgb[index as usize % PALETTE_SIZE];
        Color::Rgb {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into `0xRRGGBB`.
pub fn parse_hex(s: &str) -> Option<u32> {
    let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
