use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::SnapshotError;
use crate::spatial::{BodyId, Cell, Chunk, ChunkCoord, DirtyRect, Owner};
use crate::systems::physics::PhysicsBackend;
use crate::systems::pixel_body::BodySnapshot;
use crate::systems::{BodyState, PixelBody};

use super::WorldCore;

/// Wire form of one chunk: the full cell array in row-major order plus its dirty rect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSnapshot {
    pub coord: ChunkCoord,
    pub dirty: DirtyRect,
    pub collider_stale: bool,
    pub cells: Vec<Cell>,
}

pub(super) fn serialize_chunk<P: PhysicsBackend>(world: &WorldCore<P>, coord: ChunkCoord) -> Result<Vec<u8>, SnapshotError> {
    let chunk = world
        .grid
        .chunk(coord)
        .ok_or(SnapshotError::MissingChunk(coord))?;
    let snapshot = ChunkSnapshot {
        coord,
        dirty: chunk.dirty_rect(),
        collider_stale: chunk.collider_stale(),
        cells: chunk.cells().to_vec(),
    };
    Ok(serde_json::to_vec(&snapshot)?)
}

/// Insert or replace a chunk. Slots claimed by a body this world does not know are handed
/// back to the grid; a body restored later re-adopts them on its next exit.
pub(super) fn deserialize_chunk<P: PhysicsBackend>(world: &mut WorldCore<P>, bytes: &[u8]) -> Result<ChunkCoord, SnapshotError> {
    let snapshot: ChunkSnapshot = serde_json::from_slice(bytes)?;
    let coord = snapshot.coord;
    let mut cells = snapshot.cells;
    for cell in &mut cells {
        if let Owner::Body(id) = cell.owner {
            if !world.bodies.contains_key(&id) {
                cell.owner = Owner::Grid;
            }
        }
    }
    let chunk = Chunk::from_parts(coord, cells, snapshot.dirty)?;
    if let Some(old) = world.grid.insert_chunk(chunk).and_then(|old| old.collider()) {
        world.physics.destroy_body(old);
    }
    debug!("chunk {} restored", coord);
    Ok(coord)
}

pub(super) fn serialize_body<P: PhysicsBackend>(world: &WorldCore<P>, id: BodyId) -> Result<Vec<u8>, SnapshotError> {
    let body = world.bodies.get(&id).ok_or(SnapshotError::MissingBody(id))?;
    Ok(serde_json::to_vec(&body.snapshot(&world.physics))?)
}

/// Restore a body under its recorded id. A body that was in the world claims the slots
/// still holding its cells.
pub(super) fn deserialize_body<P: PhysicsBackend>(world: &mut WorldCore<P>, bytes: &[u8]) -> Result<BodyId, SnapshotError> {
    let snapshot: BodySnapshot = serde_json::from_slice(bytes)?;
    let id = snapshot.id;
    if world.bodies.contains_key(&id) {
        return Err(SnapshotError::BodyExists(id));
    }
    let body = PixelBody::restore(snapshot, &mut world.physics, &world.settings.body_collider())?;

    if body.state() == BodyState::InWorld {
        for bc in body.cells().values().filter(|bc| !bc.hidden) {
            if let Some(slot) = world.grid.cell_mut(bc.world_pos) {
                if slot.element == bc.cell.element && (slot.owner == Owner::Grid || slot.is_owned_by(id)) {
                    slot.owner = Owner::Body(id);
                }
            }
        }
    }
    world.next_body_id = world.next_body_id.max(id.0 + 1);
    world.bodies.insert(id, body);
    debug!("body {} restored", id);
    Ok(id)
}
