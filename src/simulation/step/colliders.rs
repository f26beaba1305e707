use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{Aabb, Vec2};
use crate::spatial::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::systems::geometry::{fixtures_for_cells, ColliderBuild};
use crate::systems::physics::{BodyKind, PhysicsBackend};

use super::WorldCore;

/// Rebuild the static collider of every stale chunk that a dynamic body is near. Stale
/// chunks with nothing around them wait until something approaches.
pub(super) fn rebuild_stale_colliders<P: PhysicsBackend>(world: &mut WorldCore<P>) -> u32 {
    let ppm = world.settings.pixels_per_meter;
    let margin = world.settings.collider_query_margin / ppm;
    let physics = &world.physics;
    let stale: Vec<ChunkCoord> = world
        .grid
        .chunks()
        .filter(|chunk| chunk.collider_stale())
        .map(Chunk::coord)
        .filter(|&coord| {
            physics
                .query_aabb(chunk_bounds(coord, ppm).expanded(margin))
                .iter()
                .any(|hit| hit.kind == BodyKind::Dynamic)
        })
        .collect();
    rebuild_chunk_colliders(world, &stale)
}

/// Rebuild the listed chunks' colliders now, stale or not. Returns how many were rebuilt.
pub(super) fn rebuild_chunk_colliders<P: PhysicsBackend>(world: &mut WorldCore<P>, coords: &[ChunkCoord]) -> u32 {
    if coords.is_empty() {
        return 0;
    }
    let params = world.settings.chunk_collider();
    let catalog = &*world.catalog;
    let chunks: Vec<&Chunk> = coords.iter().filter_map(|&c| world.grid.chunk(c)).collect();

    // Geometry is a pure function of each chunk's cells; only the physics writes are serial.
    #[cfg(feature = "parallel")]
    let builds: Vec<(ChunkCoord, ColliderBuild)> = chunks
        .par_iter()
        .map(|chunk| (chunk.coord(), fixtures_for_cells(chunk.collidable_cells(catalog), &params)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let builds: Vec<(ChunkCoord, ColliderBuild)> = chunks
        .iter()
        .map(|chunk| (chunk.coord(), fixtures_for_cells(chunk.collidable_cells(catalog), &params)))
        .collect();

    let count = builds.len() as u32;
    for (coord, build) in builds {
        apply_chunk_collider(world, coord, build);
    }
    count
}

fn apply_chunk_collider<P: PhysicsBackend>(world: &mut WorldCore<P>, coord: ChunkCoord, build: ColliderBuild) {
    let ppm = world.settings.pixels_per_meter;
    let Some(chunk) = world.grid.chunk_mut(coord) else {
        return;
    };
    if let Some(old) = chunk.collider() {
        world.physics.destroy_body(old);
    }
    chunk.set_collider(None);
    if !build.fixtures.is_empty() {
        let handle = world
            .physics
            .create_body(BodyKind::Static, coord.origin().to_vec2() / ppm, 0.0);
        for fixture in &build.fixtures {
            world.physics.add_fixture(handle, *fixture);
        }
        chunk.set_collider(Some(handle));
    }
    chunk.clear_collider_stale();
    debug!(
        "chunk {} collider: {} regions, {} fixtures, {} rejected",
        coord,
        build.regions,
        build.fixtures.len(),
        build.rejected
    );
}

/// Destroy every chunk collider body. Used when the grid is dropped wholesale.
pub(super) fn destroy_chunk_colliders<P: PhysicsBackend>(world: &mut WorldCore<P>) {
    for chunk in world.grid.chunks() {
        if let Some(handle) = chunk.collider() {
            world.physics.destroy_body(handle);
        }
    }
}

/// Chunk footprint in physics units
pub(super) fn chunk_bounds(coord: ChunkCoord, pixels_per_meter: f32) -> Aabb {
    let min = coord.origin().to_vec2() / pixels_per_meter;
    let size = CHUNK_SIZE as f32 / pixels_per_meter;
    Aabb::new(min, min + Vec2::new(size, size))
}
