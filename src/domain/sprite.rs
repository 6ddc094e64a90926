/// Player sprite selection: which tile of the sheet to blit this frame.
///
/// The sheet is one row of square tiles. Each facing group owns two
/// adjacent tiles (walk frame 0 and 1):
///
///   tile: 0      1  2     3  4     5  6
///         blank  down     up       side
///
/// Left-facing reuses the side group with a negative width (mirrored).

use super::cell::MoveVector;

/// Facing group on the sheet.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpriteGroup {
    Down,
    Up,
    Side,
}

/// Where a group lives on the sheet, in tiles.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpriteKind {
    pub group: SpriteGroup,
    pub tile_x: i32,
    pub tile_y: i32,
}

const PLAYER_KINDS: [SpriteKind; 3] = [
    SpriteKind { group: SpriteGroup::Down, tile_x: 1, tile_y: 0 },
    SpriteKind { group: SpriteGroup::Up, tile_x: 3, tile_y: 0 },
    SpriteKind { group: SpriteGroup::Side, tile_x: 5, tile_y: 0 },
];

impl SpriteGroup {
    pub fn for_move(mv: MoveVector) -> Self {
        match mv {
            MoveVector::Down => SpriteGroup::Down,
            MoveVector::Up => SpriteGroup::Up,
            MoveVector::Left | MoveVector::Right => SpriteGroup::Side,
        }
    }

    pub fn kind(self) -> SpriteKind {
        PLAYER_KINDS
            .iter()
            .copied()
            .find(|k| k.group == self)
            .unwrap_or(PLAYER_KINDS[0])
    }
}

/// Walk cadence: frame 0 while `frame_count % cycle > half`, else frame 1.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Animation {
    pub cycle: u32,
    pub half: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Animation { cycle: 32, half: 16 }
    }
}

impl Animation {
    pub fn frame(&self, frame_count: u64) -> i32 {
        let phase = frame_count % u64::from(self.cycle.max(1));
        if phase > u64::from(self.half) { 0 } else { 1 }
    }
}

/// Source rectangle on the sheet. A negative `w` mirrors horizontally.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpriteBlit {
    pub src_x: i32,
    pub src_y: i32,
    pub w: i32,
    pub h: i32,
    pub colorkey: Option<u8>,
}

/// Pick the player's tile for this frame.
pub fn player_blit(
    last_move: MoveVector,
    frame_count: u64,
    anim: Animation,
    tile: i32,
    colorkey: Option<u8>,
) -> SpriteBlit {
    let kind = SpriteGroup::for_move(last_move).kind();
    let frame = anim.frame(frame_count);
    let w = if last_move == MoveVector::Left { -tile } else { tile };
    SpriteBlit {
        src_x: (kind.tile_x + frame) * tile,
        src_y: kind.tile_y * tile,
        w,
        h: tile,
        colorkey,
    }
}
