use log::trace;

use crate::systems::physics::PhysicsBackend;

use super::{bodies, chunk_processing, colliders, PerfTimer, WorldCore};

pub(super) fn step<P: PhysicsBackend>(world: &mut WorldCore<P>) {
    let perf_on = world.perf_enabled;
    if perf_on {
        world.perf_stats.reset();
        world.perf_stats.chunk_count = world.grid.chunk_count() as u32;
        world.perf_stats.dirty_chunks =
            world.grid.chunks().filter(|c| !c.dirty_rect().is_empty()).count() as u32;
    }
    let step_start = PerfTimer::start_if(perf_on);

    // === BODIES OUT ===
    // Lift every body out of the grid before the solver moves it. Cells lost to the grid
    // since the last step flag their body for regeneration.
    let t0 = PerfTimer::start_if(perf_on);
    bodies::exit_all(world);
    let (split, destroyed) = bodies::regenerate_flagged(world);
    if let Some(t0) = t0 {
        world.perf_stats.bodies_ms = t0.elapsed_ms();
        world.perf_stats.bodies_split = split;
        world.perf_stats.bodies_destroyed = destroyed;
    }

    // === PHYSICS ===
    let t0 = PerfTimer::start_if(perf_on);
    world.physics.step(
        world.settings.time_step,
        world.settings.velocity_iterations,
        world.settings.position_iterations,
    );
    if let Some(t0) = t0 {
        world.perf_stats.physics_ms = t0.elapsed_ms();
    }

    // === BODIES IN ===
    let t0 = PerfTimer::start_if(perf_on);
    bodies::enter_all(world);
    if let Some(t0) = t0 {
        world.perf_stats.bodies_ms += t0.elapsed_ms();
    }

    // === GRID PASS ===
    let t0 = PerfTimer::start_if(perf_on);
    let (counters, work_chunks) = chunk_processing::process_grid(world);
    if let Some(t0) = t0 {
        world.perf_stats.grid_ms = t0.elapsed_ms();
        world.perf_stats.cells_processed = counters.cells;
        world.perf_stats.reactions_applied = counters.reactions;
        world.perf_stats.phase_changes = counters.phase_changes;
        world.perf_stats.ignitions = counters.ignitions;
    }

    // === COLLIDERS ===
    let t0 = PerfTimer::start_if(perf_on);
    let rebuilt = colliders::rebuild_stale_colliders(world);
    let woken = bodies::wake_bodies_in_dirty_rects(world);
    if let Some(t0) = t0 {
        world.perf_stats.colliders_ms = t0.elapsed_ms();
        world.perf_stats.colliders_rebuilt = rebuilt;
        world.perf_stats.bodies_woken = woken;
    }

    trace!(
        "tick {} done: {} work chunks, {} colliders rebuilt, {} bodies woken",
        world.grid.tick(),
        work_chunks,
        rebuilt,
        woken
    );
    world.grid.advance_tick();

    if let Some(t0) = step_start {
        world.perf_stats.bodies = world.bodies.len() as u32;
        world.perf_stats.step_ms = t0.elapsed_ms();
    }
}
