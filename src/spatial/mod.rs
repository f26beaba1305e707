//! Spatial layer - cells, chunks and the sparse chunk grid

pub mod cell;
pub mod chunk;
pub mod dirty_rect;
pub mod grid;

pub use cell::{BodyId, Cell, Owner};
pub use chunk::Chunk;
pub use dirty_rect::DirtyRect;
pub use grid::Grid;

use serde::{Deserialize, Serialize};

use crate::core::IVec2;

/// Chunk edge length in cells
pub const CHUNK_SIZE: i32 = 32;
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Chunk-space coordinate. Chunk (0, 0) covers world cells 0..CHUNK_SIZE on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing world cell `pos`
    #[inline]
    pub fn of(pos: IVec2) -> Self {
        Self { x: pos.x.div_euclid(CHUNK_SIZE), y: pos.y.div_euclid(CHUNK_SIZE) }
    }

    /// World position of local (0, 0)
    #[inline]
    pub fn origin(self) -> IVec2 {
        IVec2::new(self.x * CHUNK_SIZE, self.y * CHUNK_SIZE)
    }

    /// Local coordinate of world cell `pos` inside its chunk
    #[inline]
    pub fn local(pos: IVec2) -> IVec2 {
        IVec2::new(pos.x.rem_euclid(CHUNK_SIZE), pos.y.rem_euclid(CHUNK_SIZE))
    }

    /// Scan order key: rows of chunks top to bottom, left to right inside a row.
    #[inline]
    pub fn row_major_key(self) -> (i32, i32) {
        (self.y, self.x)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_positions_map_to_negative_chunks() {
        let pos = IVec2::new(-1, -33);
        assert_eq!(ChunkCoord::of(pos), ChunkCoord::new(-1, -2));
        assert_eq!(ChunkCoord::local(pos), IVec2::new(31, 31));
        assert_eq!(ChunkCoord::of(pos).origin() + ChunkCoord::local(pos), pos);
    }
}
