/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing, incomplete or invalid.
/// An explicit `--config PATH` goes through `from_path` instead and
/// reports problems rather than hiding them.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::sprite::Animation;
use crate::error::ConfigError;
use crate::ui::palette::{self, PALETTE_SIZE};

/// Largest maze side, in rooms.
pub const MAX_MAZE_ROOMS: u16 = 512;
/// Largest cell side, in canvas pixels.
pub const MAX_CELL_WIDTH: i32 = 64;
/// Largest canvas side, in pixels (grid cells times `cell_width`).
pub const MAX_CANVAS_SIDE: usize = 8192;
/// Largest player-centric window half-size, in cells.
pub const MAX_WINDOW_RADIUS: i32 = 256;
/// Largest light power; keeps squared distance thresholds within i64.
pub const MAX_LIGHT_POWER: u32 = 4096;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub display: DisplayConfig,
    pub light_powers: Vec<u32>,
    pub colors: ColorScheme,
    pub animation: Animation,
    pub input: InputConfig,
    pub gamepad: GamepadConfig,
}

/// Generator parameters. `rows`/`cols` count rooms, not grid cells.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    pub repeat: usize,
    pub entrances: usize,
    pub difficulty: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    /// Side of one grid cell, in canvas pixels.
    pub cell_width: i32,
    /// Side of a solution marker, in canvas pixels.
    pub marker_size: i32,
    /// Player-centric window half-size, in cells.
    pub window_radius: i32,
    pub frame_ms: u64,
}

/// Palette indices for everything the view draws.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    /// Corridor colour per tier, brightest first.
    pub corridor: [u8; 4],
    pub wall_near: u8,
    pub wall_hidden: u8,
    pub background: u8,
    pub solution: u8,
    /// Transparent index in the sprite sheet.
    pub sprite_key: u8,
    pub palette: [u32; PALETTE_SIZE],
}

/// Held-move repeat cadence, in frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputConfig {
    pub repeat_delay: u32,
    pub repeat_interval: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub view: Vec<String>,
    pub cheat: Vec<String>,
    pub light: Vec<String>,
    pub solution: Vec<String>,
    pub reset: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    light: TomlLight,
    #[serde(default)]
    colors: TomlColors,
    #[serde(default)]
    animation: TomlAnimation,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_maze_rows")]
    rows: usize,
    #[serde(default = "default_maze_cols")]
    cols: usize,
    #[serde(default = "default_repeat")]
    repeat: usize,
    #[serde(default = "default_entrances")]
    entrances: usize,
    #[serde(default = "default_difficulty")]
    difficulty: f64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_cell_width")]
    cell_width: i32,
    #[serde(default = "default_marker_size")]
    marker_size: i32,
    #[serde(default = "default_window_radius")]
    window_radius: i32,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLight {
    #[serde(default = "default_light_powers")]
    powers: Vec<u32>,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_corridor")]
    corridor: Vec<u8>,
    #[serde(default = "default_wall_near")]
    wall_near: u8,
    #[serde(default = "default_wall_hidden")]
    wall_hidden: u8,
    #[serde(default = "default_background")]
    background: u8,
    #[serde(default = "default_solution")]
    solution: u8,
    #[serde(default = "default_sprite_key")]
    sprite_key: u8,
    #[serde(default)]
    palette: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct TomlAnimation {
    #[serde(default = "default_cycle")]
    cycle: u32,
    #[serde(default = "default_half")]
    half: u32,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_repeat_delay")]
    repeat_delay: u32,
    #[serde(default = "default_repeat_interval")]
    repeat_interval: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_view")]
    view: Vec<String>,
    #[serde(default = "default_pad_cheat")]
    cheat: Vec<String>,
    #[serde(default = "default_pad_light")]
    light: Vec<String>,
    #[serde(default = "default_pad_solution")]
    solution: Vec<String>,
    #[serde(default = "default_pad_reset")]
    reset: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_maze_rows() -> usize { 15 }
fn default_maze_cols() -> usize { 15 }
fn default_repeat() -> usize { 5 }
fn default_entrances() -> usize { 5 }
fn default_difficulty() -> f64 { 0.5 }

fn default_cell_width() -> i32 { 2 }
fn default_marker_size() -> i32 { 1 }
fn default_window_radius() -> i32 { 16 }
fn default_frame_ms() -> u64 { 33 }   // ~30 fps

fn default_light_powers() -> Vec<u32> { vec![1, 2, 3, 4] }

const DEFAULT_CORRIDOR: [u8; 4] = [7, 10, 9, 0];

fn default_corridor() -> Vec<u8> { DEFAULT_CORRIDOR.to_vec() }
fn default_wall_near() -> u8 { 1 }
fn default_wall_hidden() -> u8 { 0 }
fn default_background() -> u8 { 0 }
fn default_solution() -> u8 { 11 }
fn default_sprite_key() -> u8 { 0 }

fn default_cycle() -> u32 { 32 }
fn default_half() -> u32 { 16 }

fn default_repeat_delay() -> u32 { 5 }
fn default_repeat_interval() -> u32 { 2 }

fn default_pad_view() -> Vec<String> { vec!["A".into()] }
fn default_pad_cheat() -> Vec<String> { vec!["Y".into()] }
fn default_pad_light() -> Vec<String> { vec!["X".into()] }
fn default_pad_solution() -> Vec<String> { vec!["B".into()] }
fn default_pad_reset() -> Vec<String> { vec!["Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            rows: default_maze_rows(),
            cols: default_maze_cols(),
            repeat: default_repeat(),
            entrances: default_entrances(),
            difficulty: default_difficulty(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            cell_width: default_cell_width(),
            marker_size: default_marker_size(),
            window_radius: default_window_radius(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlLight {
    fn default() -> Self {
        TomlLight { powers: default_light_powers() }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            corridor: default_corridor(),
            wall_near: default_wall_near(),
            wall_hidden: default_wall_hidden(),
            background: default_background(),
            solution: default_solution(),
            sprite_key: default_sprite_key(),
            palette: None,
        }
    }
}

impl Default for TomlAnimation {
    fn default() -> Self {
        TomlAnimation { cycle: default_cycle(), half: default_half() }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput {
            repeat_delay: default_repeat_delay(),
            repeat_interval: default_repeat_interval(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            view: default_pad_view(),
            cheat: default_pad_cheat(),
            light: default_pad_light(),
            solution: default_pad_solution(),
            reset: default_pad_reset(),
            quit: default_pad_quit(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let t = TomlConfig::default();
        GameConfig {
            maze: t.maze.into(),
            display: t.display.into(),
            light_powers: t.light.powers,
            colors: ColorScheme {
                corridor: corridor_tiers(&t.colors.corridor).unwrap_or(DEFAULT_CORRIDOR),
                wall_near: t.colors.wall_near,
                wall_hidden: t.colors.wall_hidden,
                background: t.colors.background,
                solution: t.colors.solution,
                sprite_key: t.colors.sprite_key,
                palette: palette::DEFAULT_RGB,
            },
            animation: Animation { cycle: t.animation.cycle, half: t.animation.half },
            input: t.input.into(),
            gamepad: t.gamepad.into(),
        }
    }
}

impl From<TomlMaze> for MazeConfig {
    fn from(t: TomlMaze) -> Self {
        MazeConfig {
            rows: t.rows,
            cols: t.cols,
            repeat: t.repeat,
            entrances: t.entrances,
            difficulty: t.difficulty,
        }
    }
}

impl From<TomlDisplay> for DisplayConfig {
    fn from(t: TomlDisplay) -> Self {
        DisplayConfig {
            cell_width: t.cell_width,
            marker_size: t.marker_size,
            window_radius: t.window_radius,
            frame_ms: t.frame_ms,
        }
    }
}

impl From<TomlInput> for InputConfig {
    fn from(t: TomlInput) -> Self {
        InputConfig { repeat_delay: t.repeat_delay, repeat_interval: t.repeat_interval }
    }
}

impl From<TomlGamepad> for GamepadConfig {
    fn from(t: TomlGamepad) -> Self {
        GamepadConfig {
            view: t.view,
            cheat: t.cheat,
            light: t.light,
            solution: t.solution,
            reset: t.reset,
            quit: t.quit,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, current working directory, then the
    /// per-user and system data directories.
    /// Missing file or missing keys fall back to defaults; a broken file
    /// is reported with a warning and ignored.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            return match GameConfig::from_path(&path) {
                Ok(cfg) => {
                    log::info!("loaded {}", path.display());
                    cfg
                }
                Err(e) => {
                    log::warn!("{e}; using default settings");
                    GameConfig::default()
                }
            };
        }
        log::debug!("no config.toml found; using default settings");
        GameConfig::default()
    }

    /// Load one specific file. Errors are returned, not swallowed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        GameConfig::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let t: TomlConfig = toml::from_str(text)?;
        GameConfig::resolve(t)
    }

    fn resolve(t: TomlConfig) -> Result<Self, ConfigError> {
        let corridor = corridor_tiers(&t.colors.corridor)?;

        let palette = match &t.colors.palette {
            None => palette::DEFAULT_RGB,
            Some(list) => parse_palette(list)?,
        };

        let cfg = GameConfig {
            maze: t.maze.into(),
            display: t.display.into(),
            light_powers: t.light.powers,
            colors: ColorScheme {
                corridor,
                wall_near: t.colors.wall_near,
                wall_hidden: t.colors.wall_hidden,
                background: t.colors.background,
                solution: t.colors.solution,
                sprite_key: t.colors.sprite_key,
                palette,
            },
            animation: Animation { cycle: t.animation.cycle, half: t.animation.half },
            input: t.input.into(),
            gamepad: t.gamepad.into(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range checks that the TOML types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let m = &self.maze;
        if m.rows == 0 || m.cols == 0 {
            return invalid(format!("maze size must be at least 1x1, got {}x{}", m.rows, m.cols));
        }
        let max_rooms = usize::from(MAX_MAZE_ROOMS);
        if m.rows > max_rooms || m.cols > max_rooms {
            return invalid(format!(
                "maze size must be at most {max_rooms}x{max_rooms}, got {}x{}",
                m.rows, m.cols
            ));
        }
        if m.repeat == 0 || m.entrances == 0 {
            return invalid("maze.repeat and maze.entrances must be positive".into());
        }
        if !(0.0..=1.0).contains(&m.difficulty) {
            return invalid(format!("maze.difficulty must be in 0..=1, got {}", m.difficulty));
        }

        let d = &self.display;
        if !(1..=MAX_CELL_WIDTH).contains(&d.cell_width) {
            return invalid(format!(
                "display.cell_width must be in 1..={MAX_CELL_WIDTH}, got {}",
                d.cell_width
            ));
        }
        if d.marker_size < 1 || d.marker_size > d.cell_width {
            return invalid(format!(
                "display.marker_size must be in 1..={}, got {}",
                d.cell_width, d.marker_size
            ));
        }
        let cells = 2 * m.rows.max(m.cols) + 1;
        if cells * d.cell_width as usize > MAX_CANVAS_SIDE {
            return invalid(format!(
                "a {cells}-cell maze at display.cell_width {} exceeds the {MAX_CANVAS_SIDE}px canvas limit",
                d.cell_width
            ));
        }
        if !(0..=MAX_WINDOW_RADIUS).contains(&d.window_radius) {
            return invalid(format!(
                "display.window_radius must be in 0..={MAX_WINDOW_RADIUS}, got {}",
                d.window_radius
            ));
        }

        if self.light_powers.is_empty() {
            return invalid("light.powers must not be empty".into());
        }
        if self.light_powers.iter().any(|&p| p == 0 || p > MAX_LIGHT_POWER) {
            return invalid(format!("light.powers must all be in 1..={MAX_LIGHT_POWER}"));
        }

        let c = &self.colors;
        let indices = c.corridor.iter().copied().chain([
            c.wall_near,
            c.wall_hidden,
            c.background,
            c.solution,
            c.sprite_key,
        ]);
        for idx in indices {
            if usize::from(idx) >= PALETTE_SIZE {
                return invalid(format!("colour index {idx} is outside the {PALETTE_SIZE}-colour palette"));
            }
        }

        let a = &self.animation;
        if a.cycle == 0 {
            return invalid("animation.cycle must be positive".into());
        }
        if a.half >= a.cycle {
            return invalid(format!("animation.half ({}) must be below cycle ({})", a.half, a.cycle));
        }

        if self.input.repeat_interval == 0 {
            return invalid("input.repeat_interval must be positive".into());
        }

        Ok(())
    }
}

/// The four corridor tiers, brightest first.
fn corridor_tiers(list: &[u8]) -> Result<[u8; 4], ConfigError> {
    list.try_into().map_err(|_| {
        ConfigError::Invalid(format!("colors.corridor needs 4 entries, got {}", list.len()))
    })
}

fn parse_palette(list: &[String]) -> Result<[u32; PALETTE_SIZE], ConfigError> {
    if list.len() != PALETTE_SIZE {
        return Err(ConfigError::Invalid(format!(
            "colors.palette needs {PALETTE_SIZE} entries, got {}",
            list.len()
        )));
    }
    let mut out = [0u32; PALETTE_SIZE];
    for (slot, s) in out.iter_mut().zip(list) {
        *slot = palette::parse_hex(s)
            .ok_or_else(|| ConfigError::Invalid(format!("bad palette colour {s:?}")))?;
    }
    Ok(out)
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/amazeing)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/amazeing");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/amazeing");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    dirs
}
