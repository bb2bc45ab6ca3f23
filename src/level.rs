// level.rs - level store of sokoban
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

use std::fmt;
use log::{debug, warn};

use crate::animation::{Animator, Vec2};
use crate::defs::*;

use TileKind::Empty;
use MoveError::*;
use SolveError::*;

/// Level in game. Width and height determines dimensions of the level.
/// Pieces are the current tiles ordered from top to bottom and from left to right,
/// original is copy of pieces made while parsing and it is used to restart level.
/// Goal indexes are indexes of all goals in the same order.
#[derive(PartialEq,Debug,Clone)]
pub struct Level<S> {
    name: String,
    width: usize,
    height: usize,
    pieces: Vec<Tile<S>>,
    original: Vec<Tile<S>>,
    goal_indexes: Vec<usize>,
    player_start: Option<(usize, usize)>,
}

// tiles beyond end of the row are empty floor
fn tile_at<S, A>(rows: &[Vec<char>], x: usize, y: usize, animator: &mut A) -> Tile<S>
        where A: Animator<Slide = S> {
    match rows[y].get(x) {
        Some(&c) => Tile::classify(c, x, y, animator),
        None => Tile::empty(),
    }
}

impl<S: Clone> Level<S> {
    /// Parse level from rows of text. Rows can have different lengths.
    pub fn from_lines<L, A>(name: &str, lines: &[L], animator: &mut A) -> Level<S>
            where L: AsRef<str>, A: Animator<Slide = S> {
        let rows: Vec<Vec<char>> = lines.iter()
                .map(|l| l.as_ref().chars().collect()).collect();
        Self::from_rows(name, rows, animator)
    }

    pub(crate) fn from_rows<A>(name: &str, rows: Vec<Vec<char>>, animator: &mut A)
                -> Level<S> where A: Animator<Slide = S> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or_default();
        let height = rows.len();
        let mut pieces = Vec::with_capacity(width*height);
        let mut goal_indexes = vec![];
        let mut player_start = None;
        let mut players = 0;

        for y in 0..height {
            for x in 0..width {
                let tile = tile_at(&rows, x, y, animator);
                if tile.is_goal {
                    goal_indexes.push(y*width + x);
                }
                if rows[y].get(x) == Some(&'@') {
                    player_start = Some((x, y));
                    players += 1;
                }
                pieces.push(tile);
            }
        }
        let original = pieces.clone();

        match players {
            0 => warn!("Level '{}' has no player", name),
            1 => {}
            n => warn!("Level '{}' has {} players, the last one is used", name, n),
        }
        debug!("Parsed level '{}': {}x{}, {} goals", name, width, height,
                goal_indexes.len());
        Level{ name: name.to_string(), width, height, pieces, original, goal_indexes,
                player_start }
    }

    /// Restart level - restore all tiles to state after parsing.
    pub fn restart(&mut self) {
        self.pieces.clone_from_slice(&self.original);
    }
}

impl<S> Level<S> {
    /// Get name of the level.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Get width of the level.
    pub fn width(&self) -> usize {
        self.width
    }
    /// Get height of the level.
    pub fn height(&self) -> usize {
        self.height
    }
    /// Get current tiles of the level.
    pub fn pieces(&self) -> &[Tile<S>] {
        &self.pieces
    }
    /// Get tiles as parsed.
    pub fn original(&self) -> &[Tile<S>] {
        &self.original
    }
    /// Get indexes of goals in row-major order.
    pub fn goal_indexes(&self) -> &[usize] {
        &self.goal_indexes
    }
    /// Get positions of goals in row-major order.
    pub fn goal_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.goal_indexes.iter().map(move |&i| (i % width, i / width))
    }
    /// Get number of goals.
    pub fn num_goals(&self) -> usize {
        self.goal_indexes.len()
    }
    /// Get start position of the player. None if level has no player.
    pub fn player_start(&self) -> Option<(usize, usize)> {
        self.player_start
    }
    /// Get tile at column `x` and row `y`.
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile<S>> {
        self.index_of(x, y).map(|i| &self.pieces[i])
    }
    /// Get number of boxes in level.
    pub fn box_count(&self) -> usize {
        self.pieces.iter().filter(|t| t.has_box()).count()
    }

    fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y*self.width + x)
        } else { None }
    }

    /// Count goals covered by box.
    pub fn count_completed_goals(&self) -> usize {
        self.goal_indexes.iter().filter(|&&i| self.pieces[i].is_box_on_goal()).count()
    }

    /// Check whether all goals are covered by boxes.
    pub fn is_completed(&self) -> bool {
        self.count_completed_goals() == self.num_goals()
    }

    fn relocate_box<A>(&mut self, from: usize, to: usize, moving: bool, animator: &mut A)
            where A: Animator<Slide = S> {
        let target = Vec2::from_tile(to % self.width, to / self.width);
        self.pieces[from].kind = Empty;
        self.pieces[from].box_slide = None;
        self.pieces[to].kind = TileKind::Box;
        self.pieces[to].box_slide = Some(animator.create_animation(target, moving,
                PLAYER_SPEED));
    }

    /// Move box from one place to another. The target must be inside level and
    /// must not be wall or other box. Used by pushes made by player.
    pub fn move_box<A>(&mut self, from: (usize, usize), to: (usize, usize),
                animator: &mut A) -> Result<(), MoveError>
            where A: Animator<Slide = S> {
        let from_index = self.index_of(from.0, from.1).ok_or(OutOfBounds(from.0, from.1))?;
        let to_index = self.index_of(to.0, to.1).ok_or(OutOfBounds(to.0, to.1))?;
        if !self.pieces[from_index].has_box() {
            return Err(NoBox(from.0, from.1));
        }
        match self.pieces[to_index].kind {
            Empty => {
                self.relocate_box(from_index, to_index, true, animator);
                Ok(())
            }
            _ => Err(Blocked(to.0, to.1)),
        }
    }

    /// Place every box standing outside goals on the next free goal in row-major
    /// order. Boxes already on goals stay. Returns number of moved boxes.
    /// If there are fewer free goals than boxes to place, all free goals are
    /// filled, the remaining boxes stay and an error is returned.
    pub fn solve<A>(&mut self, animator: &mut A) -> Result<usize, SolveError>
            where A: Animator<Slide = S> {
        let boxes = self.pieces.iter().filter(|t| t.has_box() && !t.is_goal).count();
        let goals = self.num_goals() - self.count_completed_goals();

        let mut next_goal = 0;
        let mut moved = 0;
        for index in 0..self.pieces.len() {
            let tile = &self.pieces[index];
            if tile.is_goal || !tile.has_box() {
                continue;
            }
            let free = self.goal_indexes[next_goal..].iter()
                    .position(|&g| !self.pieces[g].has_box());
            let goal_index = match free {
                Some(pos) => {
                    next_goal += pos + 1;
                    self.goal_indexes[next_goal - 1]
                }
                None => break,
            };
            self.relocate_box(index, goal_index, false, animator);
            moved += 1;
        }
        debug!("Solved level '{}': {} boxes moved", self.name, moved);
        if boxes > goals {
            return Err(NotEnoughGoals{ boxes, goals });
        }
        Ok(moved)
    }
}

impl<S> fmt::Display for Level<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pieces.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|t| t.symbol()).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::animation::{Slide, SlideAnimator};

    fn parse(lines: &[&str]) -> Level<Slide> {
        Level::from_lines("test", lines, &mut SlideAnimator::new())
    }

    fn check_invariants(level: &Level<Slide>) {
        assert_eq!(level.width()*level.height(), level.pieces().len());
        assert_eq!(level.pieces().len(), level.original().len());
        assert_eq!(level.num_goals(), level.goal_indexes().len());
        assert!(level.goal_indexes().windows(2).all(|w| w[0] < w[1]));
        assert!(level.goal_indexes().iter().all(|&i| level.pieces()[i].is_goal));
        assert!(level.count_completed_goals() <= level.num_goals());
    }

    #[test]
    fn test_from_lines() {
        let level = parse(&[
            "#####",
            "#@$.#",
            "#####"]);
        check_invariants(&level);
        assert_eq!((5, 3), (level.width(), level.height()));
        assert_eq!(level.pieces(), level.original());
        let t = level.tile(2, 1).unwrap();
        assert_eq!(TileKind::Box, t.kind);
        assert!(!t.is_goal);
        assert_eq!(Some(Slide{ target: Vec2::new(2.0, 1.0), moving: false,
                speed: PLAYER_SPEED }), t.box_slide);
        assert_eq!(&Tile{ kind: Empty, is_goal: true, box_slide: None },
                level.tile(3, 1).unwrap());
        assert_eq!(&Tile::empty(), level.tile(1, 1).unwrap());
        assert_eq!(Some((1, 1)), level.player_start());
        assert_eq!(1, level.num_goals());
        assert_eq!(&[8], level.goal_indexes());
        assert_eq!(vec![(3, 1)], level.goal_positions().collect::<Vec<_>>());
        assert_eq!(1, level.box_count());
        assert_eq!(0, level.count_completed_goals());
        assert_eq!(None, level.tile(5, 1));
        assert_eq!(None, level.tile(0, 3));
    }

    #[test]
    fn test_ragged_rows() {
        let level = parse(&[
            "  ####",
            "###  ####",
            "#  *$ .@#",
            "#   ###",
            "####"]);
        check_invariants(&level);
        assert_eq!((9, 5), (level.width(), level.height()));
        assert_eq!(&Tile::empty(), level.tile(8, 0).unwrap());
        assert_eq!(&Tile::empty(), level.tile(7, 3).unwrap());
        assert_eq!(TileKind::Border, level.tile(3, 4).unwrap().kind);
        assert_eq!(&[21, 24], level.goal_indexes());
        assert_eq!(1, level.count_completed_goals());
        assert_eq!(Some((7, 2)), level.player_start());
        assert_eq!("  ####\n###  ####\n#  *$ . #\n#   ###\n####\n", level.to_string());
    }

    #[test]
    fn test_player_start() {
        let level = parse(&["#####", "#$. #", "#####"]);
        assert_eq!(None, level.player_start());
        let level = parse(&["#@ .#", "#$ @#"]);
        assert_eq!(Some((3, 1)), level.player_start());
        let level: Level<Slide> = parse(&[]);
        assert_eq!((0, 0), (level.width(), level.height()));
        assert!(level.is_completed());
        assert_eq!("", level.to_string());
    }

    #[test]
    fn test_restart() {
        let mut anim = SlideAnimator::new();
        let mut level = Level::from_lines("restart", &[
            "#######",
            "#@$ ..#",
            "# $   #",
            "#######"], &mut anim);
        let parsed = level.clone();
        level.move_box((2, 1), (3, 1), &mut anim).unwrap();
        level.move_box((2, 2), (4, 2), &mut anim).unwrap();
        assert_ne!(parsed.pieces(), level.pieces());
        level.restart();
        assert_eq!(parsed, level);
        level.restart();
        assert_eq!(parsed, level);

        level.solve(&mut anim).unwrap();
        assert!(level.is_completed());
        level.restart();
        assert_eq!(parsed.pieces(), level.pieces());
        assert_eq!(0, level.count_completed_goals());
    }

    #[test]
    fn test_count_completed_goals() {
        let level = parse(&[
            "########",
            "#@*.*$ #",
            "#  $  .#",
            "########"]);
        check_invariants(&level);
        assert_eq!(4, level.num_goals());
        assert_eq!(2, level.count_completed_goals());
        assert!(!level.is_completed());
        let level = parse(&["#@**#"]);
        assert!(level.is_completed());
    }

    #[test]
    fn test_solve() {
        let mut anim = SlideAnimator::new();
        let mut level = Level::from_lines("solve", &[
            "#####",
            "#@$.#",
            "#####"], &mut anim);
        assert_eq!(Ok(1), level.solve(&mut anim));
        assert_eq!(&Tile::empty(), level.tile(2, 1).unwrap());
        let t = level.tile(3, 1).unwrap();
        assert_eq!(TileKind::Box, t.kind);
        assert_eq!(Some(Slide{ target: Vec2::new(3.0, 1.0), moving: false,
                speed: PLAYER_SPEED }), t.box_slide);
        assert_eq!(1, level.count_completed_goals());
        assert_eq!(2, anim.created());
        check_invariants(&level);
        // nothing to do again
        assert_eq!(Ok(0), level.solve(&mut anim));
    }

    #[test]
    fn test_solve_skips_filled_goals() {
        let mut level = parse(&[
            "########",
            "#*$ .@.#",
            "#.$$ * #",
            "########"]);
        check_invariants(&level);
        let boxes = level.box_count();
        assert_eq!(Ok(3), level.solve(&mut SlideAnimator::new()));
        assert_eq!(boxes, level.box_count());
        assert_eq!(boxes.min(level.num_goals()), level.count_completed_goals());
        assert!(level.is_completed());
        assert!(level.pieces().iter().all(|t| !t.has_box() || t.is_goal));
        assert_eq!("########\n#*  * *#\n#*   * #\n########\n", level.to_string());
        // goal before box in scan order
        let mut level = parse(&["#.@ $#"]);
        assert_eq!(Ok(1), level.solve(&mut SlideAnimator::new()));
        assert_eq!("#*   #\n", level.to_string());
    }

    #[test]
    fn test_solve_more_goals() {
        let mut level = parse(&["#@$...#"]);
        assert_eq!(Ok(1), level.solve(&mut SlideAnimator::new()));
        assert_eq!(1, level.count_completed_goals());
        assert!(!level.is_completed());
        assert_eq!(TileKind::Box, level.tile(3, 0).unwrap().kind);
    }

    #[test]
    fn test_solve_not_enough_goals() {
        let mut level = parse(&["#@$$.#"]);
        let boxes = level.box_count();
        assert_eq!(Err(NotEnoughGoals{ boxes: 2, goals: 1 }),
                level.solve(&mut SlideAnimator::new()));
        assert_eq!(boxes.min(level.num_goals()), level.count_completed_goals());
        assert_eq!(boxes, level.box_count());
        assert_eq!("#  $*#\n", level.to_string());

        let mut level = parse(&["#@$$.*#", "#$ . $#"]);
        assert_eq!(Err(NotEnoughGoals{ boxes: 4, goals: 2 }),
                level.solve(&mut SlideAnimator::new()));
        assert!(level.is_completed());
        assert_eq!("#   **#\n#$ * $#\n", level.to_string());
    }

    #[test]
    fn test_move_box() {
        let mut anim = SlideAnimator::new();
        let mut level = Level::from_lines("move", &[
            "######",
            "#@$$.#",
            "######"], &mut anim);
        assert_eq!(Err(Blocked(3, 1)), level.move_box((2, 1), (3, 1), &mut anim));
        assert_eq!(Err(Blocked(2, 0)), level.move_box((2, 1), (2, 0), &mut anim));
        assert_eq!(Err(NoBox(1, 1)), level.move_box((1, 1), (4, 1), &mut anim));
        assert_eq!(Err(OutOfBounds(6, 1)), level.move_box((3, 1), (6, 1), &mut anim));
        assert_eq!(Err(OutOfBounds(2, 3)), level.move_box((2, 3), (2, 1), &mut anim));
        assert_eq!(Ok(()), level.move_box((3, 1), (4, 1), &mut anim));
        assert_eq!(Some(Slide{ target: Vec2::new(4.0, 1.0), moving: true,
                speed: PLAYER_SPEED }), level.tile(4, 1).unwrap().box_slide);
        assert_eq!(None, level.tile(3, 1).unwrap().box_slide);
        assert!(level.is_completed());
        check_invariants(&level);
        assert_eq!(level.original()[level.goal_indexes()[0]].is_goal,
                level.pieces()[level.goal_indexes()[0]].is_goal);
    }
}
