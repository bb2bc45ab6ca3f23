// animation.rs - animation service used by levels
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

/// Continuous position in tile units.
#[derive(PartialEq,Debug,Clone,Copy,Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create position from coordinates.
    pub fn new(x: f32, y: f32) -> Vec2 {
        Vec2{ x, y }
    }

    /// Position of the tile in column `x` and row `y`.
    pub fn from_tile(x: usize, y: usize) -> Vec2 {
        Vec2{ x: x as f32, y: y as f32 }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// Animation service. Levels request a slide every time a box is placed on a tile.
/// The returned handle is stored in the tile and handed to the renderer untouched.
pub trait Animator {
    /// Handle of the created animation.
    type Slide;

    /// Create animation that ends at `target`.
    fn create_animation(&mut self, target: Vec2, moving: bool, speed: f32) -> Self::Slide;
}

impl<A: Animator + ?Sized> Animator for &mut A {
    type Slide = A::Slide;

    fn create_animation(&mut self, target: Vec2, moving: bool, speed: f32) -> Self::Slide {
        (**self).create_animation(target, moving, speed)
    }
}

/// Plain slide record. Useful when the caller does not animate at all.
#[derive(PartialEq,Debug,Clone,Copy)]
pub struct Slide {
    pub target: Vec2,
    pub moving: bool,
    pub speed: f32,
}

/// Animator that creates [Slide] records and counts them.
#[derive(Debug,Clone,Default)]
pub struct SlideAnimator {
    created: usize,
}

impl SlideAnimator {
    /// Create new animator.
    pub fn new() -> SlideAnimator {
        SlideAnimator::default()
    }
    /// Return number of created slides.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl Animator for SlideAnimator {
    type Slide = Slide;

    fn create_animation(&mut self, target: Vec2, moving: bool, speed: f32) -> Slide {
        self.created += 1;
        Slide{ target, moving, speed }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn place<A: Animator>(mut anim: A) -> A::Slide {
        anim.create_animation(Vec2::default(), true, 1.0)
    }

    #[test]
    fn test_slide_animator() {
        let mut anim = SlideAnimator::new();
        let slide = anim.create_animation(Vec2::from_tile(3, 1), false, 2.0);
        assert_eq!(Slide{ target: Vec2::new(3.0, 1.0), moving: false, speed: 2.0 }, slide);
        assert!(place(&mut anim).moving);
        assert_eq!(2, anim.created());
        assert_eq!("3x1", Vec2::from_tile(3, 1).to_string());
    }
}
