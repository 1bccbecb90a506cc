use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sapper_core::{Coord, CellCount, Difficulty, Game, GameSettings, Preferences};
use tracing_subscriber::filter::LevelFilter;

mod render;
mod script;

/// Plays a minesweeper game from a script of moves.
///
/// Each line is one of `reveal X Y`, `flag X Y`, `chord X Y` (or `r`, `f`,
/// `c`), `tick [N]`, `reset`, `difficulty NAME [ROWS COLS MINES]` and `show`.
/// Cells may also be written `X,Y`. Blank lines and `#` comments are skipped.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML preferences file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset to play, overrides the preferences file
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Custom board rows
    #[arg(long, requires_all = ["cols", "mines"])]
    rows: Option<Coord>,

    /// Custom board columns
    #[arg(long, requires_all = ["rows", "mines"])]
    cols: Option<Coord>,

    /// Custom mine count
    #[arg(long, requires_all = ["rows", "cols"])]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Script to play, standard input when omitted
    script: Option<PathBuf>,
}

impl Args {
    fn preferences(&self) -> anyhow::Result<Preferences> {
        let mut preferences = match &self.config {
            Some(path) => {
                let input = fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                Preferences::from_toml_str(&input)
                    .with_context(|| format!("Invalid preferences in {}", path.display()))?
            }
            None => Preferences::default(),
        };

        if let Some(difficulty) = self.difficulty {
            preferences.difficulty = difficulty;
        }
        if let (Some(rows), Some(cols), Some(mines)) = (self.rows, self.cols, self.mines) {
            preferences.difficulty = Difficulty::Custom;
            preferences.custom = Some(GameSettings::new(rows, cols, mines)?);
        }
        if self.seed.is_some() {
            preferences.seed = self.seed;
        }
        Ok(preferences)
    }
}

fn level_filter(filter: log::LevelFilter) -> LevelFilter {
    match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(level_filter(args.verbose.log_level_filter()))
        .with_writer(io::stderr)
        .init();

    let preferences = args.preferences()?;
    tracing::debug!("preferences: {:?}", preferences);
    let mut game: Game = Game::from_preferences(&preferences)?;

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).with_context(|| format!("Could not open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    script::play(&mut game, input, &mut out)?;

    writeln!(out, "{}", render::summary(&game))?;
    write!(out, "{}", render::board(game.board()))?;
    Ok(())
}
