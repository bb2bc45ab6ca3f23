// lib.rs - main library of sokoban levels
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

//! Level store and level set loader for a Sokoban game.
//!
//! A [LevelSet] reads many levels from one file (plain text with blank line
//! separated blocks or an XML level collection). Every [Level] keeps a live grid
//! of tiles and a snapshot used to restart it. Box placements request slide
//! animations from an [Animator] supplied by the caller.

mod animation;
mod defs;
mod level;
mod level_set;

pub use animation::*;
pub use defs::*;
pub use level::*;
pub use level_set::*;
