// main.rs - sokoban level set checker executable
//
// sokoban-levels - Sokoban level store and loader
// Copyright (C) 2022  Mateusz Szpakowski
//
// This library is free software; you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation; either
// version 2.1 of the License, or (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this library; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA

use std::error::Error;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use clap::Parser;
use log::error;
use termion::color;
use sokobanlevels::*;

/// Load Sokoban level set and print its levels.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Level set file: blank line separated levels or XML level collection.
    file: PathBuf,
    /// Required number of levels.
    #[arg(short, long)]
    expect: Option<usize>,
    /// Maximal number of characters in level row.
    #[arg(long, default_value_t = MAX_LEVEL_WIDTH)]
    max_width: usize,
    /// Maximal number of rows in level.
    #[arg(long, default_value_t = MAX_LEVEL_HEIGHT)]
    max_height: usize,
    /// Place boxes on goals before printing.
    #[arg(short, long)]
    solve: bool,
    /// Print without colors.
    #[arg(short, long)]
    plain: bool,
}

fn write_colored<W: Write, C: color::Color>(out: &mut W, c: C, ch: char)
                -> io::Result<()> {
    write!(out, "{}{}{}", color::Fg(c), ch, color::Fg(color::Reset))
}

fn write_level<W: Write>(out: &mut W, level: &Level<Slide>, plain: bool)
                -> io::Result<()> {
    writeln!(out, "Level {}: {}x{}, goals: {}, boxes: {}, completed: {}",
            level.name(), level.width(), level.height(), level.num_goals(),
            level.box_count(), level.count_completed_goals())?;
    for (i, row) in level.pieces().chunks(level.width().max(1)).enumerate() {
        for (j, tile) in row.iter().enumerate() {
            let player = level.player_start() == Some((j, i)) &&
                    tile.kind == TileKind::Empty;
            let ch = if player { '@' } else { tile.symbol() };
            if plain {
                write!(out, "{}", ch)?;
                continue;
            }
            if player {
                write_colored(out, color::LightGreen, ch)?;
            } else if tile.is_box_on_goal() {
                write_colored(out, color::Green, ch)?;
            } else {
                match tile.kind {
                    TileKind::Border => write_colored(out, color::Blue, ch)?,
                    TileKind::Box => write_colored(out, color::Yellow, ch)?,
                    TileKind::Empty if tile.is_goal => write_colored(out, color::Red, ch)?,
                    TileKind::Empty => write!(out, "{}", ch)?,
                }
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let options = LoadOptions{ expected_levels: args.expect, max_width: args.max_width,
            max_height: args.max_height };

    let mut animator = SlideAnimator::new();
    let mut levelset = LevelSet::from_file(&args.file, &options, &mut animator)?;
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    if !levelset.name().is_empty() {
        writeln!(stdout, "{}\n", levelset.name())?;
    }
    for level in levelset.levels_mut() {
        if args.solve {
            if let Err(e) = level.solve(&mut animator) {
                error!("Level {}: {}", level.name(), e);
            }
        }
        write_level(&mut stdout, level, args.plain)?;
    }
    Ok(())
}
