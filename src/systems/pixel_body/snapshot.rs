use serde::{Deserialize, Serialize};

use crate::core::{IVec2, SnapshotError, Vec2};
use crate::spatial::{BodyId, Owner};
use crate::systems::geometry::ColliderParams;
use crate::systems::physics::{BodyKind, PhysicsBackend};

use super::{BodyCell, BodyState, PixelBody};

/// Everything needed to rebuild a body on another peer. Fixtures are derived data and are
/// rebuilt on restore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    pub id: BodyId,
    pub kind: BodyKind,
    pub state: BodyState,
    pub position: Vec2,
    pub angle: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub awake: bool,
    pub cells: Vec<(IVec2, BodyCell)>,
}

impl PixelBody {
    pub fn snapshot<P: PhysicsBackend>(&self, physics: &P) -> BodySnapshot {
        let (position, angle) = physics.transform(self.handle).unwrap_or((Vec2::ZERO, 0.0));
        BodySnapshot {
            id: self.id,
            kind: physics.body_kind(self.handle).unwrap_or(BodyKind::Dynamic),
            state: self.state,
            position,
            angle,
            linear_velocity: physics.linear_velocity(self.handle),
            angular_velocity: physics.angular_velocity(self.handle),
            awake: physics.is_awake(self.handle),
            cells: self.cells.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    /// Recreate the physics body and fixtures described by `snapshot`.
    pub fn restore<P: PhysicsBackend>(
        snapshot: BodySnapshot,
        physics: &mut P,
        params: &ColliderParams,
    ) -> Result<PixelBody, SnapshotError> {
        if snapshot.cells.is_empty() {
            return Err(SnapshotError::EmptyBody);
        }
        let id = snapshot.id;
        let handle = physics.create_body(snapshot.kind, snapshot.position, snapshot.angle);
        physics.set_linear_velocity(handle, snapshot.linear_velocity);
        physics.set_angular_velocity(handle, snapshot.angular_velocity);
        physics.set_awake(handle, snapshot.awake);

        let cells = snapshot
            .cells
            .into_iter()
            .map(|(offset, mut bc)| {
                bc.cell.owner = Owner::Body(id);
                (offset, bc)
            })
            .collect();
        let body = PixelBody::new(id, handle, cells, snapshot.state);
        body.rebuild_fixtures(physics, params);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::elements::EL_WOOD;
    use crate::domain::ElementCatalog;
    use crate::systems::physics::KinematicPhysics;

    #[test]
    fn snapshot_survives_json_and_rebuilds_fixtures() {
        let mut physics = KinematicPhysics::new(Vec2::ZERO);
        let mut wood = ElementCatalog::builtin().make_cell(EL_WOOD, 3, false);
        wood.owner = Owner::Body(BodyId(4));
        let world = [(2, 2), (3, 2), (2, 3)].map(|(x, y)| (IVec2::new(x, y), wood));
        let cells = PixelBody::local_cells(IVec2::new(2, 2), world);
        let handle = physics.create_body(BodyKind::Dynamic, Vec2::new(2.5, 2.5), 0.3);
        physics.set_angular_velocity(handle, 1.5);
        let body = PixelBody::new(BodyId(4), handle, cells, BodyState::Detached);
        let params = ColliderParams::body(1.0);
        body.rebuild_fixtures(&mut physics, &params);

        let json = serde_json::to_string(&body.snapshot(&physics)).unwrap();
        let snapshot: BodySnapshot = serde_json::from_str(&json).unwrap();

        let mut other = KinematicPhysics::new(Vec2::ZERO);
        let restored = PixelBody::restore(snapshot, &mut other, &params).unwrap();
        assert_eq!(restored.id(), BodyId(4));
        assert_eq!(restored.cells(), body.cells());
        assert_eq!(other.transform(restored.handle()), Some((Vec2::new(2.5, 2.5), 0.3)));
        assert_eq!(other.angular_velocity(restored.handle()), 1.5);
        assert_eq!(other.fixtures(restored.handle()), physics.fixtures(body.handle()));
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let mut physics = KinematicPhysics::default();
        let snapshot = BodySnapshot {
            id: BodyId(1),
            kind: BodyKind::Dynamic,
            state: BodyState::Detached,
            position: Vec2::ZERO,
            angle: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            awake: true,
            cells: Vec::new(),
        };
        assert!(matches!(
            PixelBody::restore(snapshot, &mut physics, &ColliderParams::body(1.0)),
            Err(SnapshotError::EmptyBody)
        ));
    }
}
