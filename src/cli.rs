/// Command-line options. Anything given here overrides `config.toml`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{GameConfig, MAX_MAZE_ROOMS};

#[derive(Parser, Debug)]
#[command(name = "amazeing")]
#[command(author, version, about = "Find your way out of a dark maze", long_about = None)]
pub struct Cli {
    /// Config file to use instead of searching for config.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Random seed for reproducible mazes (default: random)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Maze height in rooms
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_MAZE_ROOMS)))]
    pub rows: Option<u16>,

    /// Maze width in rooms
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_MAZE_ROOMS)))]
    pub cols: Option<u16>,

    /// Disable music and sound effects
    #[arg(long, default_value_t = false)]
    pub no_sound: bool,
}

impl Cli {
    /// Fold the size overrides into `cfg`.
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(rows) = self.rows {
            cfg.maze.rows = usize::from(rows);
        }
        if let Some(cols) = self.cols {
            cfg.maze.cols = usize::from(cols);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn size_flags_override_config() {
        let cli = Cli::try_parse_from(["amazeing", "--rows", "4", "-w", "9", "--seed", "7"]).unwrap();
        let mut cfg = GameConfig::default();
        cli.apply(&mut cfg);
        assert_eq!((cfg.maze.rows, cfg.maze.cols), (4, 9));
        assert_eq!(cli.seed, Some(7));
        assert!(!cli.no_sound);
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["amazeing"]).unwrap();
        let mut cfg = GameConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn zero_rows_rejected() {
        assert!(Cli::try_parse_from(["amazeing", "--rows", "0"]).is_err());
    }

    #[test]
    fn oversized_rows_rejected() {
        assert!(Cli::try_parse_from(["amazeing", "--rows", "513"]).is_err());
        assert!(Cli::try_parse_from(["amazeing", "-w", "60000"]).is_err());
        assert!(Cli::try_parse_from(["amazeing", "--cols", "512"]).is_ok());
    }
}
