/// Fog-of-war lighting: distance → brightness tier.
///
/// With `p = powers[level]` and `d` the Euclidean distance to the player:
///
/// ┌────────────────┬──────────┐   ┌────────────────┬──────────┐
/// │ Corridor       │ Tier     │   │ Wall           │ Shown?   │
/// ├────────────────┼──────────┤   ├────────────────┼──────────┤
/// │ d ≤ 2p         │ Bright   │   │ d < 5p         │ yes      │
/// │ d ≤ 4p         │ Dim      │   │ d ≥ 5p         │ no       │
/// │ d ≤ 5p         │ Faint    │   └────────────────┴──────────┘
/// │ otherwise      │ Dark     │
/// └────────────────┴──────────┘
///
/// At exactly `d = 5p` a corridor is still Faint while a wall is hidden.
/// All comparisons are done on squared integer distances, so the
/// boundaries are exact.

use super::cell::Cell;

/// Brightness bucket for a corridor cell, brightest first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Tier {
    Bright,
    Dim,
    Faint,
    Dark,
}

impl Tier {
    /// Position in the corridor palette (0 = brightest).
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Index into the light-power sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LightLevel(pub usize);

impl LightLevel {
    /// Next level, wrapping to 0 after `count - 1`.
    pub fn next(self, count: usize) -> LightLevel {
        if count == 0 {
            return LightLevel(0);
        }
        LightLevel((self.0 + 1) % count)
    }
}

/// Corridor thresholds as multiples of the light power.
const BRIGHT_MUL: i64 = 2;
const DIM_MUL: i64 = 4;
const FAINT_MUL: i64 = 5;

#[derive(Clone, Debug)]
pub struct Lighting {
    powers: Vec<u32>,
}

impl Lighting {
    /// `powers` must be non-empty; an empty list degrades to `[1]`.
    pub fn new(powers: Vec<u32>) -> Self {
        let powers = if powers.is_empty() { vec![1] } else { powers };
        Lighting { powers }
    }

    /// Number of selectable levels.
    pub fn levels(&self) -> usize {
        self.powers.len()
    }

    /// Light power for `level`. Out-of-range levels wrap.
    pub fn power(&self, level: LightLevel) -> i64 {
        i64::from(self.powers[level.0 % self.powers.len()])
    }

    /// Tier of a corridor cell. `force` skips the distance test and
    /// always answers `Bright` (start and end markers).
    pub fn classify(&self, cell: Cell, player: Cell, level: LightLevel, force: bool) -> Tier {
        if force {
            return Tier::Bright;
        }
        let d2 = cell.distance_sq(player);
        let p = self.power(level);
        if d2 <= sq(BRIGHT_MUL * p) {
            Tier::Bright
        } else if d2 <= sq(DIM_MUL * p) {
            Tier::Dim
        } else if d2 <= sq(FAINT_MUL * p) {
            Tier::Faint
        } else {
            Tier::Dark
        }
    }

    /// Is a wall cell close enough to be drawn?
    pub fn classify_wall(&self, cell: Cell, player: Cell, level: LightLevel) -> bool {
        let p = self.power(level);
        cell.distance_sq(player) < sq(FAINT_MUL * p)
    }
}

#[inline]
fn sq(v: i64) -> i64 {
    v * v
}
