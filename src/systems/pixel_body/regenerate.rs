//! Topology upkeep: splitting disconnected bodies, re-centering and fixture rebuilds

use std::collections::BTreeMap;

use log::debug;

use crate::core::IVec2;
use crate::spatial::{BodyId, Owner};
use crate::systems::geometry::{fixtures_for_cells, segment, ColliderParams};
use crate::systems::physics::{BodyKind, PhysicsBackend};

use super::{centroid, BodyCell, PixelBody};

impl PixelBody {
    /// Keep the largest 4-connected component (the first one on ties) and remove every other
    /// component, returned keyed by offsets in this body's frame.
    pub fn split_components(&mut self) -> Vec<BTreeMap<IVec2, BodyCell>> {
        let mut components = segment(self.cells.keys().copied().collect());
        if components.len() <= 1 {
            return Vec::new();
        }
        let mut keep = 0;
        for (i, c) in components.iter().enumerate() {
            if c.len() > components[keep].len() {
                keep = i;
            }
        }
        components.remove(keep);

        let mut parts = Vec::with_capacity(components.len());
        for component in components {
            let part: BTreeMap<IVec2, BodyCell> = component
                .into_iter()
                .filter_map(|offset| self.cells.remove(&offset).map(|bc| (offset, bc)))
                .collect();
            parts.push(part);
        }
        debug!("body {} split into {} pieces", self.id, parts.len() + 1);
        parts
    }

    /// Build a new body from a component taken off this one. It keeps this body's angle,
    /// sits on the component's centroid and inherits the velocities.
    pub fn spawn_part<P: PhysicsBackend>(
        &self,
        id: BodyId,
        part: BTreeMap<IVec2, BodyCell>,
        physics: &mut P,
        pixels_per_meter: f32,
    ) -> Option<PixelBody> {
        let c = centroid(part.keys())?;
        let (position, angle) = physics.transform(self.handle)?;
        let kind = physics.body_kind(self.handle).unwrap_or(BodyKind::Dynamic);
        let world = position + (c.to_vec2() / pixels_per_meter).rotated(angle);

        let handle = physics.create_body(kind, world, angle);
        physics.set_linear_velocity(handle, physics.linear_velocity(self.handle));
        physics.set_angular_velocity(handle, physics.angular_velocity(self.handle));
        physics.set_awake(handle, physics.is_awake(self.handle));

        let cells = part
            .into_iter()
            .map(|(offset, mut bc)| {
                bc.cell.owner = Owner::Body(id);
                (offset - c, bc)
            })
            .collect();
        Some(PixelBody::new(id, handle, cells, self.state))
    }

    /// Move the local origin onto the centroid cell and shift the physics body to match, so
    /// the cells keep their world slots. Returns the applied shift.
    pub fn recenter<P: PhysicsBackend>(&mut self, physics: &mut P, pixels_per_meter: f32) -> IVec2 {
        let Some(c) = centroid(self.cells.keys()) else {
            return IVec2::ZERO;
        };
        if c == IVec2::ZERO {
            return c;
        }
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|(offset, bc)| (offset - c, bc))
            .collect();
        if let Some((position, angle)) = physics.transform(self.handle) {
            let shifted = position + (c.to_vec2() / pixels_per_meter).rotated(angle);
            physics.set_transform(self.handle, shifted, angle);
        }
        c
    }

    /// Replace the body's fixtures with a fresh build from its offsets. Returns the number of
    /// fixtures created; zero means the body has no usable collider.
    pub fn rebuild_fixtures<P: PhysicsBackend>(&self, physics: &mut P, params: &ColliderParams) -> usize {
        physics.clear_fixtures(self.handle);
        let build = fixtures_for_cells(self.cells.keys().copied().collect(), params);
        let count = build.fixtures.len();
        for fixture in build.fixtures {
            physics.add_fixture(self.handle, fixture);
        }
        count
    }

    pub fn clear_regenerate(&mut self) {
        self.needs_regenerate = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;
    use crate::domain::elements::EL_STONE;
    use crate::domain::ElementCatalog;
    use crate::systems::physics::KinematicPhysics;
    use crate::systems::pixel_body::{cell_center, BodyState};

    fn body_from(
        physics: &mut KinematicPhysics,
        offsets: &[(i32, i32)],
        center: IVec2,
    ) -> PixelBody {
        let stone = ElementCatalog::builtin().make_cell(EL_STONE, 0, false);
        let world = offsets.iter().map(|&(x, y)| (center + IVec2::new(x, y), stone));
        let cells = PixelBody::local_cells(center, world);
        let handle = physics.create_body(BodyKind::Dynamic, cell_center(center, 1.0), 0.0);
        PixelBody::new(BodyId(1), handle, cells, BodyState::Detached)
    }

    const U_OPEN: [(i32, i32); 6] = [(-1, -1), (-1, 0), (-1, 1), (1, 1), (1, 0), (1, -1)];

    #[test]
    fn connected_body_does_not_split() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut body = body_from(&mut physics, &[(0, 0), (1, 0), (1, 1)], IVec2::new(3, 3));
        assert!(body.split_components().is_empty());
        assert_eq!(body.cell_count(), 3);
    }

    #[test]
    fn split_keeps_first_of_equal_components() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut body = body_from(&mut physics, &U_OPEN, IVec2::new(11, 11));
        let parts = body.split_components();
        assert_eq!(parts.len(), 1);
        assert!(body.cells().keys().all(|o| o.x == -1));
        assert!(parts[0].keys().all(|o| o.x == 1));
    }

    #[test]
    fn split_keeps_the_largest_component() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut body = body_from(&mut physics, &[(-2, 0), (0, 0), (1, 0), (0, 1)], IVec2::new(8, 8));
        let parts = body.split_components();
        assert_eq!(parts.len(), 1);
        assert_eq!(body.cell_count(), 3);
        assert!(parts[0].contains_key(&IVec2::new(-2, 0)));
    }

    #[test]
    fn spawned_part_keeps_world_slots() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut body = body_from(&mut physics, &U_OPEN, IVec2::new(11, 11));
        physics.set_linear_velocity(body.handle(), Vec2::new(0.25, 0.0));
        let part = body.split_components().pop().unwrap();

        let mut piece = body.spawn_part(BodyId(2), part, &mut physics, 1.0).unwrap();
        assert_eq!(physics.linear_velocity(piece.handle()), Vec2::new(0.25, 0.0));
        assert!(piece.cells().values().all(|bc| bc.cell.is_owned_by(BodyId(2))));

        piece.update_positions(&physics, 1.0);
        let world: Vec<IVec2> = piece.cells().values().map(|bc| bc.world_pos).collect();
        assert_eq!(world, vec![IVec2::new(12, 10), IVec2::new(12, 11), IVec2::new(12, 12)]);
    }

    #[test]
    fn recenter_preserves_world_slots() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut body = body_from(&mut physics, &U_OPEN, IVec2::new(11, 11));
        body.split_components();
        assert_eq!(body.recenter(&mut physics, 1.0), IVec2::new(-1, 0));
        assert!(body.cells().contains_key(&IVec2::ZERO));

        body.update_positions(&physics, 1.0);
        let world: Vec<IVec2> = body.cells().values().map(|bc| bc.world_pos).collect();
        assert_eq!(world, vec![IVec2::new(10, 10), IVec2::new(10, 11), IVec2::new(10, 12)]);
    }

    #[test]
    fn rebuild_is_deterministic_and_covers_the_cells() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let body = body_from(&mut physics, &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 1)], IVec2::new(4, 4));
        let params = ColliderParams::body(0.5);
        let count = body.rebuild_fixtures(&mut physics, &params);
        assert!(count > 0);
        let first = physics.fixtures(body.handle()).to_vec();
        assert_eq!(body.rebuild_fixtures(&mut physics, &params), count);
        assert_eq!(physics.fixtures(body.handle()), first.as_slice());

        let area: f32 = first
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                ((b - a).cross(c - a) / 2.0).abs()
            })
            .sum();
        assert!((area - 5.0 * 0.25).abs() < 1e-4);
    }
}
