//! PixelBody - a connected region of cells driven by the physics backend
//!
//! A body keeps its cells keyed by local offset from the centroid cell. Every step it leaves
//! the grid (`exit_world`), lets physics move it, maps offsets to new world cells
//! (`update_positions`) and writes itself back (`enter_world`). Grid slots holding body
//! cells carry `Owner::Body(id)` and are read-only to the grid pass.

mod lifecycle;
mod regenerate;
mod snapshot;
mod transform;

pub use snapshot::BodySnapshot;
pub use transform::{map_offset, RotationShear};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{IVec2, Vec2};
use crate::spatial::{BodyId, Cell};
use crate::systems::physics::{BodyHandle, PhysicsBackend};

/// One cell owned by a body
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyCell {
    pub cell: Cell,
    /// World slot the cell was last mapped to
    pub world_pos: IVec2,
    /// Destination was occupied on the last `enter_world`; the grid never saw this cell.
    pub hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyState {
    /// Cells live only in the body
    Detached,
    /// Cells are mirrored into grid slots
    InWorld,
}

pub struct PixelBody {
    id: BodyId,
    handle: BodyHandle,
    cells: BTreeMap<IVec2, BodyCell>,
    state: BodyState,
    needs_regenerate: bool,
}

/// Rounded mean of integer points (ties round toward +inf), `None` for no points.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a IVec2>) -> Option<IVec2> {
    let (mut sx, mut sy, mut n) = (0i64, 0i64, 0i64);
    for p in points {
        sx += p.x as i64;
        sy += p.y as i64;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    let round = |s: i64| (2 * s + n).div_euclid(2 * n) as i32;
    Some(IVec2::new(round(sx), round(sy)))
}

/// Physics-space position of a world cell's center
#[inline]
pub fn cell_center(cell: IVec2, pixels_per_meter: f32) -> Vec2 {
    (cell.to_vec2() + Vec2::new(0.5, 0.5)) / pixels_per_meter
}

impl PixelBody {
    pub fn new(id: BodyId, handle: BodyHandle, cells: BTreeMap<IVec2, BodyCell>, state: BodyState) -> Self {
        Self { id, handle, cells, state, needs_regenerate: false }
    }

    /// Key world cells by their offset from `center`.
    pub fn local_cells(center: IVec2, world: impl IntoIterator<Item = (IVec2, Cell)>) -> BTreeMap<IVec2, BodyCell> {
        world
            .into_iter()
            .map(|(pos, cell)| (pos - center, BodyCell { cell, world_pos: pos, hidden: false }))
            .collect()
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    #[inline]
    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn cells(&self) -> &BTreeMap<IVec2, BodyCell> {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn needs_regenerate(&self) -> bool {
        self.needs_regenerate
    }

    pub fn mark_regenerate(&mut self) {
        self.needs_regenerate = true;
    }

    /// World slots currently written by this body (hidden cells excluded)
    pub fn occupied_world_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells.values().filter(|c| !c.hidden).map(|c| c.world_pos)
    }

    /// Bounding box of the local offsets as (min, max), inclusive.
    pub fn local_bounds(&self) -> Option<(IVec2, IVec2)> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), p| {
            (IVec2::new(lo.x.min(p.x), lo.y.min(p.y)), IVec2::new(hi.x.max(p.x), hi.y.max(p.y)))
        }))
    }

    pub fn width(&self) -> i32 {
        self.local_bounds().map(|(lo, hi)| hi.x - lo.x + 1).unwrap_or(0)
    }

    pub fn height(&self) -> i32 {
        self.local_bounds().map(|(lo, hi)| hi.y - lo.y + 1).unwrap_or(0)
    }

    /// Both speeds below their thresholds
    pub fn is_idle<P: PhysicsBackend>(&self, physics: &P, linear: f32, angular: f32) -> bool {
        physics.linear_velocity(self.handle).length() < linear
            && physics.angular_velocity(self.handle).abs() < angular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_rounds_half_up() {
        let pts = [IVec2::new(0, 0), IVec2::new(1, 0)];
        assert_eq!(centroid(&pts), Some(IVec2::new(1, 0)));
        let pts = [IVec2::new(-1, -3), IVec2::new(-2, -3)];
        assert_eq!(centroid(&pts), Some(IVec2::new(-1, -3)));
        assert_eq!(centroid(std::iter::empty::<&IVec2>()), None);
    }

    #[test]
    fn u_shape_centroid() {
        let u = [(10, 10), (10, 11), (10, 12), (11, 12), (12, 12), (12, 11), (12, 10)]
            .map(|(x, y)| IVec2::new(x, y));
        assert_eq!(centroid(&u), Some(IVec2::new(11, 11)));
    }

    #[test]
    fn bounds_follow_offsets() {
        let cells = PixelBody::local_cells(
            IVec2::new(5, 5),
            [(4, 5), (5, 5), (6, 5), (6, 6)].map(|(x, y)| (IVec2::new(x, y), Cell::empty(20.0, false))),
        );
        let body = PixelBody::new(BodyId(1), BodyHandle(1), cells, BodyState::Detached);
        assert_eq!(body.local_bounds(), Some((IVec2::new(-1, 0), IVec2::new(1, 1))));
        assert_eq!((body.width(), body.height()), (3, 2));
    }
}
