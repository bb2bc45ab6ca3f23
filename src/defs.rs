// defs.rs - common definitions of sokoban levels
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
use std::fmt;
use std::io;
use int_enum::IntEnum;

use crate::animation::{Animator, Vec2};

/// Speed of the player and of sliding boxes in tiles per second.
pub const PLAYER_SPEED: f32 = 4.0;

/// Default maximal number of characters in one level row.
pub const MAX_LEVEL_WIDTH: usize = 98;
/// Default maximal number of rows in one level.
pub const MAX_LEVEL_HEIGHT: usize = 40;

/// Kind of the tile in level grid.
#[repr(u8)]
#[derive(PartialEq,Eq,Debug,Clone,Copy,IntEnum)]
pub enum TileKind {
    /// Floor without box.
    Empty = 0,
    /// Box to push onto goal.
    Box = 1,
    /// Wall.
    Border = 2,
}

use TileKind::*;

// indexed by kind and goal flag
const TILE_SYMBOLS: [[char; 2]; 3] = [
    [' ', '.'],
    ['$', '*'],
    ['#', '#'],
];

/// Single cell of a level. The goal flag is fixed at parse time, only the kind
/// and the slide change while playing. A slide is present only on box tiles.
#[derive(PartialEq,Debug,Clone)]
pub struct Tile<S> {
    pub kind: TileKind,
    pub is_goal: bool,
    pub box_slide: Option<S>,
}

impl<S> Tile<S> {
    /// Empty floor which is not a goal.
    pub fn empty() -> Tile<S> {
        Tile{ kind: Empty, is_goal: false, box_slide: None }
    }

    /// Classify level symbol at column `x` and row `y`. Box symbols request
    /// a new slide from animator.
    pub fn classify<A>(c: char, x: usize, y: usize, animator: &mut A) -> Tile<S>
            where A: Animator<Slide = S> {
        match c {
            '$'|'*' => Tile{ kind: Box, is_goal: c == '*',
                box_slide: Some(animator.create_animation(Vec2::from_tile(x, y),
                        false, PLAYER_SPEED)) },
            '.' => Tile{ kind: Empty, is_goal: true, box_slide: None },
            '#' => Tile{ kind: Border, is_goal: false, box_slide: None },
            _ => Tile::empty(),
        }
    }

    /// Return true if box is in this tile.
    pub fn has_box(&self) -> bool {
        self.kind == Box
    }
    /// Return true if box stands on goal.
    pub fn is_box_on_goal(&self) -> bool {
        self.is_goal && self.kind == Box
    }
    /// Return symbol of this tile in level text format.
    pub fn symbol(&self) -> char {
        TILE_SYMBOLS[self.kind.int_value() as usize][self.is_goal as usize]
    }
}

/// Error while loading a level set.
#[derive(Debug)]
pub enum LoadError {
    /// Input can not be opened or read.
    Io(io::Error),
    /// Malformed XML.
    Xml(quick_xml::Error),
    /// Elements of XML level collection in wrong place.
    BadXmlStructure,
    /// Row longer than allowed - line number (from 1), length and limit.
    LineTooLong{ line: usize, length: usize, max: usize },
    /// Level has too many rows - line number (from 1) of first extra row and limit.
    TooManyRows{ line: usize, max: usize },
    /// Number of levels differs from expected.
    LevelCountMismatch{ expected: usize, found: usize },
}

use LoadError::*;

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Io(e) => write!(f, "I/O error: {}", e),
            Xml(e) => write!(f, "XML error: {}", e),
            BadXmlStructure => write!(f, "Bad structure of XML"),
            LineTooLong{ line, length, max } =>
                write!(f, "Line {} too long: {} characters, maximum is {}",
                        line, length, max),
            TooManyRows{ line, max } =>
                write!(f, "Too many rows at line {}, maximum is {}", line, max),
            LevelCountMismatch{ expected, found } =>
                write!(f, "Wrong level count: expected {}, found {}", expected, found),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Io(e) => Some(e),
            Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> LoadError {
        Io(e)
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(e: quick_xml::Error) -> LoadError {
        Xml(e)
    }
}

/// Error of automatic solving.
#[derive(PartialEq,Eq,Debug,Clone,Copy)]
pub enum SolveError {
    /// More boxes outside goals than free goals.
    NotEnoughGoals{ boxes: usize, goals: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NotEnoughGoals{ boxes, goals } =>
                write!(f, "Not enough goals: {} boxes to place, {} free goals",
                        boxes, goals),
        }
    }
}

impl Error for SolveError {
}

/// Error of box move. Contains place of the offending tile.
#[derive(PartialEq,Eq,Debug,Clone,Copy)]
pub enum MoveError {
    /// Place outside level.
    OutOfBounds(usize, usize),
    /// No box to move.
    NoBox(usize, usize),
    /// Target is wall or other box.
    Blocked(usize, usize),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds(x, y) => write!(f, "Place {}x{} out of level", x, y),
            MoveError::NoBox(x, y) => write!(f, "No box at {}x{}", x, y),
            MoveError::Blocked(x, y) => write!(f, "Place {}x{} blocked", x, y),
        }
    }
}

impl Error for MoveError {
}
