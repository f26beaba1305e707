use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;

use crate::domain::ElementCatalog;
use crate::spatial::{ChunkCoord, Grid, CHUNK_SIZE};
use crate::systems::physics::PhysicsBackend;
use crate::systems::BehaviorRegistry;

use super::perf_stats::PerfStats;
use super::{SimSettings, WorldCore};

pub(super) fn create_world_core<P: PhysicsBackend>(
    settings: SimSettings,
    catalog: Arc<ElementCatalog>,
    mut physics: P,
) -> WorldCore<P> {
    physics.set_gravity(settings.gravity);
    info!(
        "world created: {} elements, seed {:#x}, {} px/m",
        catalog.element_count(),
        settings.seed,
        settings.pixels_per_meter
    );
    WorldCore {
        catalog,
        grid: Grid::new(settings.dirty_border, settings.ambient_temperature),
        physics,
        behaviors: BehaviorRegistry::new(),
        bodies: BTreeMap::new(),
        next_body_id: 1,
        params: settings.update_params(),
        settings,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}

pub(super) fn ensure_area<P: PhysicsBackend>(world: &mut WorldCore<P>, width: u32, height: u32) {
    let chunks_x = (width as i32 + CHUNK_SIZE - 1) / CHUNK_SIZE;
    let chunks_y = (height as i32 + CHUNK_SIZE - 1) / CHUNK_SIZE;
    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            world.grid.ensure_chunk(ChunkCoord::new(cx, cy));
        }
    }
}
