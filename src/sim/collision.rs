//! Collision detection for both game variants
//!
//! Runner: inclusive pixel boxes, each shrunk before the overlap test so grazing
//! contact does not end a run.
//! Snake: exact cell equality against the body, and an unsigned range check for
//! walls (stepping left/up from 0 wraps to a huge coordinate).

use serde::{Deserialize, Serialize};

use super::snake::Cell;

/// Axis-aligned box with inclusive corners, in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Aabb {
    /// Box covering `width` x `height` pixels from the top-left corner
    pub fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width - 1,
            y2: y + height - 1,
        }
    }

    /// Move every edge inward by `inset`
    #[inline]
    pub fn shrink(&self, inset: i32) -> Self {
        Self {
            x1: self.x1 + inset,
            y1: self.y1 + inset,
            x2: self.x2 - inset,
            y2: self.y2 - inset,
        }
    }

    /// Plain overlap test (touching edges count as overlap)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.x2 < other.x1 || self.x1 > other.x2 || self.y2 < other.y1 || self.y1 > other.y2)
    }
}

/// Runner hit test: both boxes shrunk by `inset` on all four sides, then overlapped
pub fn boxes_collide(actor: &Aabb, obstacle: &Aabb, inset: i32) -> bool {
    actor.shrink(inset).overlaps(&obstacle.shrink(inset))
}

/// True if `cell` lies outside `[0, width) x [0, height)`
#[inline]
pub fn hits_wall(cell: Cell, width: u8, height: u8) -> bool {
    cell.x >= width || cell.y >= height
}

/// True if `head` lands on any of `body`
pub fn hits_body<'a>(head: Cell, body: impl IntoIterator<Item = &'a Cell>) -> bool {
    body.into_iter().any(|&c| c == head)
}
