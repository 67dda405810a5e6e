//! matchtui: match-3 tile-swapping puzzle in the terminal.

mod app;
mod highscores;
mod input;
mod theme;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use matchtui::engine::{DEFAULT_COLS, DEFAULT_PALETTE_SIZE, DEFAULT_ROWS, EngineConfig, SetupScore, SwapRule};

/// Options derived from CLI that affect the game (board shape, rules, seed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub engine: EngineConfig,
    /// Fixed seed for a reproducible board; OS entropy when unset.
    pub seed: Option<u64>,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            engine: EngineConfig {
                rows: args.rows,
                cols: args.cols,
                palette_size: args.colors,
                setup_score: if args.keep_setup_score {
                    SetupScore::Keep
                } else {
                    SetupScore::Discard
                },
                swap_rule: if args.revert_unmatched {
                    SwapRule::RevertUnmatched
                } else {
                    SwapRule::Keep
                },
            },
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using defaults: {e}");
        theme::Theme::default_for_palette(args.palette)
    });
    let config = GameConfig::from(&args);
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// The terminal belongs to the game, so logs only go to a file when asked for.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Match-3 puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "matchtui",
    version,
    about = "Match-3 puzzle in the terminal. Swap neighbouring tokens to line up three or more of a colour.",
    long_about = "matchtui is a terminal match-3 game.\n\n\
        Swap two neighbouring tokens. Any row or column of three or more equal tokens is cleared \
        for 10 points per token; tokens above fall down, new ones drop in from the top, and the \
        board keeps clearing until nothing lines up.\n\n\
        CONTROLS:\n  Arrows / hjkl        Move cursor\n  Space / Enter        Select, or swap selection with cursor\n  \
        Shift+Arrows / HJKL  Swap towards a direction\n  Esc                  Cancel selection\n  \
        r                    New board   q  Quit\n\n\
        MOUSE:\n  Click a token, then a neighbour, or drag a token onto its neighbour."
)]
pub struct Args {
    /// Board height in rows.
    #[arg(long, default_value_t = DEFAULT_ROWS, value_name = "ROWS")]
    pub rows: usize,

    /// Board width in columns.
    #[arg(long, default_value_t = DEFAULT_COLS, value_name = "COLS")]
    pub cols: usize,

    /// Number of token colours (3..=8 on boards with a line of three or more).
    #[arg(short, long, default_value_t = DEFAULT_PALETTE_SIZE, value_name = "N")]
    pub colors: u8,

    /// Seed for a reproducible board and refill sequence.
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Keep the points scored while the first board settles instead of starting at 0.
    #[arg(long)]
    pub keep_setup_score: bool,

    /// Swap tokens back when a move lines nothing up.
    #[arg(long)]
    pub revert_unmatched: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"; keys token0..token7, bg, div_line, main_fg, title, highlight).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (level from RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_engine_config() {
        let args = Args::parse_from([
            "matchtui",
            "--rows",
            "9",
            "--cols",
            "7",
            "-c",
            "5",
            "--seed",
            "42",
            "--keep-setup-score",
            "--revert-unmatched",
        ]);
        let config = GameConfig::from(&args);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.engine,
            EngineConfig {
                rows: 9,
                cols: 7,
                palette_size: 5,
                setup_score: SetupScore::Keep,
                swap_rule: SwapRule::RevertUnmatched,
            }
        );
    }

    #[test]
    fn test_defaults_match_engine() {
        let args = Args::parse_from(["matchtui"]);
        let config = GameConfig::from(&args);
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.seed, None);
        assert_eq!(args.palette, Palette::Normal);
    }
}
