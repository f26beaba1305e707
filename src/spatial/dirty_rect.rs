use serde::{Deserialize, Serialize};

use super::CHUNK_SIZE;

/// Inclusive local-coordinate rectangle of cells that need a visit.
///
/// Empty is encoded as `min > max`; every operation normalizes an empty rect back to
/// [`DirtyRect::EMPTY`] so a later `include` starts from scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl DirtyRect {
    pub const EMPTY: DirtyRect = DirtyRect {
        min_x: CHUNK_SIZE,
        min_y: CHUNK_SIZE,
        max_x: -1,
        max_y: -1,
    };

    pub const FULL: DirtyRect = DirtyRect {
        min_x: 0,
        min_y: 0,
        max_x: CHUNK_SIZE - 1,
        max_y: CHUNK_SIZE - 1,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow to cover the inclusive box, clamped to chunk bounds.
    pub fn include(&mut self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) {
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(CHUNK_SIZE - 1);
        let max_y = max_y.min(CHUNK_SIZE - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }
        if self.is_empty() {
            *self = DirtyRect { min_x, min_y, max_x, max_y };
            return;
        }
        self.min_x = self.min_x.min(min_x);
        self.min_y = self.min_y.min(min_y);
        self.max_x = self.max_x.max(max_x);
        self.max_y = self.max_y.max(max_y);
    }

    /// Pull every edge inward by `border`.
    pub fn shrink(&mut self, border: i32) {
        if self.is_empty() {
            *self = Self::EMPTY;
            return;
        }
        self.min_x += border;
        self.min_y += border;
        self.max_x -= border;
        self.max_y -= border;
        if self.is_empty() {
            *self = Self::EMPTY;
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max_x - self.min_x + 1 }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max_y - self.min_y + 1 }
    }
}

impl Default for DirtyRect {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_clamps_to_chunk_bounds() {
        let mut r = DirtyRect::EMPTY;
        r.include(-3, -3, 1, 1);
        assert_eq!(r, DirtyRect { min_x: 0, min_y: 0, max_x: 1, max_y: 1 });
        r.include(CHUNK_SIZE - 2, 5, CHUNK_SIZE + 4, 6);
        assert_eq!(r.max_x, CHUNK_SIZE - 1);
    }

    #[test]
    fn box_entirely_outside_is_ignored() {
        let mut r = DirtyRect::EMPTY;
        r.include(CHUNK_SIZE, 0, CHUNK_SIZE + 2, 2);
        assert!(r.is_empty());
    }

    #[test]
    fn shrink_drains_a_small_rect_to_empty() {
        let mut r = DirtyRect::EMPTY;
        r.include(8, 8, 12, 12);
        r.shrink(2);
        assert_eq!(r, DirtyRect { min_x: 10, min_y: 10, max_x: 10, max_y: 10 });
        r.shrink(2);
        assert!(r.is_empty());
        assert_eq!(r, DirtyRect::EMPTY);
    }

    #[test]
    fn grow_after_shrink_to_empty_starts_fresh() {
        let mut r = DirtyRect::FULL;
        for _ in 0..CHUNK_SIZE {
            r.shrink(2);
        }
        assert!(r.is_empty());
        r.include(3, 4, 3, 4);
        assert!(!r.is_empty());
        assert_eq!((r.width(), r.height()), (1, 1));
        assert!(r.contains(3, 4));
    }
}
