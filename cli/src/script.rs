use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use sapper_core::*;

use crate::render;

/// One line of a move script.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(CellId),
    Flag(CellId),
    Chord(CellId),
    Tick(u32),
    Reset,
    Difficulty(Difficulty, Option<GameSettings>),
    Show,
}

fn parse_cell(args: &[&str]) -> anyhow::Result<CellId> {
    match args {
        [id] => Ok(id.parse()?),
        [x, y] => Ok(CellId::new((x.parse()?, y.parse()?))),
        _ => bail!("expected a cell as `X Y` or `X,Y`"),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<&str> = words.collect();

        let command = match name {
            "reveal" | "r" => Self::Reveal(parse_cell(&args)?),
            "flag" | "f" => Self::Flag(parse_cell(&args)?),
            "chord" | "c" => Self::Chord(parse_cell(&args)?),
            "tick" | "t" => match args.as_slice() {
                [] => Self::Tick(1),
                [count] => Self::Tick(count.parse()?),
                _ => bail!("expected `tick [N]`"),
            },
            "reset" => Self::Reset,
            "difficulty" | "d" => match args.as_slice() {
                [difficulty] => Self::Difficulty(difficulty.parse()?, None),
                [difficulty, rows, cols, mines] => Self::Difficulty(
                    difficulty.parse()?,
                    Some(GameSettings::new(rows.parse()?, cols.parse()?, mines.parse()?)?),
                ),
                _ => bail!("expected `difficulty NAME [ROWS COLS MINES]`"),
            },
            "show" => Self::Show,
            _ => bail!("unknown command `{}`", name),
        };
        Ok(command)
    }
}

/// Applies `command`, reporting what happened to `out`.
pub fn apply(game: &mut Game, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
    let was_finished = game.is_finished();

    match *command {
        Command::Reveal(id) => {
            let outcome = game.reveal_cell(id);
            writeln!(out, "reveal {}: {:?}", id, outcome)?;
        }
        Command::Flag(id) => {
            let outcome = game.toggle_flag(id);
            writeln!(out, "flag {}: {:?}", id, outcome)?;
        }
        Command::Chord(id) => {
            let outcome = game.chord_cell(id);
            writeln!(out, "chord {}: {:?}", id, outcome)?;
        }
        Command::Tick(count) => {
            for _ in 0..count {
                game.tick();
            }
        }
        Command::Reset => {
            game.reset_game();
            writeln!(out, "reset")?;
        }
        Command::Difficulty(difficulty, custom) => {
            game.change_difficulty(difficulty, custom)?;
            writeln!(out, "difficulty {}", difficulty)?;
        }
        Command::Show => {
            writeln!(out, "{}", render::summary(game))?;
            write!(out, "{}", render::board(game.board()))?;
        }
    }

    if game.is_finished() && !was_finished {
        tracing::info!("game over: {:?} after {}s", game.status(), game.elapsed_secs());
    }
    Ok(())
}

/// Runs every command of `input` in order, stopping at the first bad line.
pub fn play(game: &mut Game, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let command: Command = line
            .parse()
            .with_context(|| format!("line {}: `{}`", number + 1, line))?;
        tracing::debug!("{:?}", command);
        apply(game, &command, out).with_context(|| format!("line {}", number + 1))?;
    }
    Ok(())
}
