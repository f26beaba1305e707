use log::trace;

use crate::core::{IVec2, TickRng};
use crate::spatial::{ChunkCoord, DirtyRect};
use crate::systems::physics::PhysicsBackend;
use crate::systems::{UpdateContext, UpdateCounters};

use super::update::update_cell;
use super::WorldCore;

/// One dirty-rect pass over every chunk. Returns the pass counters and how many chunks had
/// work.
pub(super) fn process_grid<P: PhysicsBackend>(world: &mut WorldCore<P>) -> (UpdateCounters, u32) {
    let phase = world.grid.flip_phase();
    let border = world.grid.dirty_border();

    // All work rects are snapshotted and re-armed before the first chunk is scanned.
    let coords = world.grid.chunk_coords().to_vec();
    let mut work: Vec<(ChunkCoord, DirtyRect)> = Vec::new();
    for coord in coords {
        let Some(chunk) = world.grid.chunk_mut(coord) else {
            continue;
        };
        let rect = chunk.take_work_rect(border);
        if rect.is_empty() {
            continue;
        }
        chunk.reset_updated(rect, !phase);
        work.push((coord, rect));
    }

    let mut counters = UpdateCounters::default();
    for &(coord, rect) in &work {
        process_chunk(world, coord, rect, phase, &mut counters);
    }
    trace!(
        "tick {}: {} chunks, {} cells, {} reactions",
        world.grid.tick(),
        work.len(),
        counters.cells,
        counters.reactions
    );
    (counters, work.len() as u32)
}

/// Serpentine scan of one work rect: rows run bottom-up on odd phases and top-down on even
/// ones, and the column direction flips every row.
fn process_chunk<P: PhysicsBackend>(
    world: &mut WorldCore<P>,
    coord: ChunkCoord,
    rect: DirtyRect,
    phase: bool,
    counters: &mut UpdateCounters,
) {
    let mut rng = TickRng::new(world.settings.seed, coord, world.grid.tick());
    let origin = coord.origin();
    let (width, height) = (rect.width(), rect.height());
    let mut left_to_right = phase;

    for row in 0..height {
        let y = if phase { rect.max_y - row } else { rect.min_y + row };
        for col in 0..width {
            let x = if left_to_right { rect.min_x + col } else { rect.max_x - col };
            let mut ctx = UpdateContext {
                grid: &mut world.grid,
                catalog: &world.catalog,
                rng: &mut rng,
                params: &world.params,
                counters: &mut *counters,
                pos: origin + IVec2::new(x, y),
                phase,
            };
            update_cell(&mut ctx, &world.behaviors);
        }
        left_to_right = !left_to_right;
    }
}
