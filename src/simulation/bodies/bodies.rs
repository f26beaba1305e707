use std::collections::BTreeSet;

use log::{debug, warn};

use crate::core::{Aabb, IVec2};
use crate::spatial::{BodyId, ChunkCoord, Owner};
use crate::systems::geometry::flood_from;
use crate::systems::physics::{BodyKind, PhysicsBackend};
use crate::systems::pixel_body::{cell_center, centroid};
use crate::systems::{BodyState, PixelBody};

use super::colliders::{chunk_bounds, rebuild_chunk_colliders};
use super::WorldCore;

pub(super) fn promote_region<P: PhysicsBackend>(world: &mut WorldCore<P>, seed: IVec2) -> Option<BodyId> {
    let seed_cell = *world.grid.cell(seed)?;
    if seed_cell.is_empty() || seed_cell.is_rigid() || !world.catalog.is_collidable(seed_cell.element) {
        return None;
    }
    let element = seed_cell.element;
    let grid = &world.grid;
    let region = flood_from(seed, world.settings.max_promote_cells, |p| {
        grid.cell(p).is_some_and(|c| !c.is_rigid() && c.element == element)
    });
    create_body(world, region)
}

pub(super) fn promote_cells<P: PhysicsBackend>(world: &mut WorldCore<P>, cells: &[IVec2]) -> Option<BodyId> {
    let picked: BTreeSet<IVec2> = cells
        .iter()
        .copied()
        .filter(|&p| {
            world
                .grid
                .cell(p)
                .is_some_and(|c| !c.is_empty() && !c.is_rigid() && world.catalog.is_collidable(c.element))
        })
        .collect();
    create_body(world, picked)
}

/// Turn grid-owned cells into a dynamic body that starts in the world. The slots keep their
/// content and only change owner, after the body has a collider.
fn create_body<P: PhysicsBackend>(world: &mut WorldCore<P>, cells: BTreeSet<IVec2>) -> Option<BodyId> {
    let center = centroid(&cells)?;
    let ppm = world.settings.pixels_per_meter;
    let id = BodyId(world.next_body_id);
    let handle = world
        .physics
        .create_body(BodyKind::Dynamic, cell_center(center, ppm), 0.0);

    let grid = &world.grid;
    let local = PixelBody::local_cells(
        center,
        cells.iter().filter_map(|&p| {
            grid.cell(p).map(|c| {
                let mut cell = *c;
                cell.owner = Owner::Body(id);
                (p, cell)
            })
        }),
    );
    let body = PixelBody::new(id, handle, local, BodyState::InWorld);
    if body.rebuild_fixtures(&mut world.physics, &world.settings.body_collider()) == 0 {
        warn!("promotion of {} cells produced no collider", cells.len());
        world.physics.destroy_body(handle);
        return None;
    }

    let mut touched = BTreeSet::new();
    for &p in &cells {
        if let Some(slot) = world.grid.cell_mut(p) {
            slot.owner = Owner::Body(id);
        }
        touched.insert(ChunkCoord::of(p));
    }
    world.next_body_id += 1;
    world.bodies.insert(id, body);

    let touched: Vec<ChunkCoord> = touched.into_iter().collect();
    rebuild_chunk_colliders(world, &touched);
    debug!("promoted {} cells into body {}", cells.len(), id);
    Some(id)
}

pub(super) fn remove_body<P: PhysicsBackend>(world: &mut WorldCore<P>, id: BodyId) -> bool {
    let Some(mut body) = world.bodies.remove(&id) else {
        return false;
    };
    let released = body.release_into(&mut world.grid);
    world.physics.destroy_body(body.handle());
    debug!("body {} removed, {} cells released", id, released);
    true
}

/// On-demand regeneration. A body in the world leaves it first and comes back afterwards,
/// together with any parts split off it.
pub(super) fn regenerate_body<P: PhysicsBackend>(world: &mut WorldCore<P>, id: BodyId, skip_calculations: bool) -> bool {
    let Some(body) = world.bodies.get_mut(&id) else {
        return false;
    };
    let cycle = body.state() == BodyState::InWorld && !skip_calculations;
    if cycle {
        body.exit_world(&mut world.grid, &world.catalog, false);
    }
    let outcome = regenerate(world, id, skip_calculations);
    if cycle {
        let entering = outcome.alive.then_some(id).into_iter().chain(outcome.spawned.iter().copied());
        for bid in entering {
            if let Some(body) = world.bodies.get_mut(&bid) {
                body.enter_world(&mut world.grid, false);
            }
        }
    }
    outcome.alive
}

struct RegenOutcome {
    alive: bool,
    spawned: Vec<BodyId>,
}

/// Split off disconnected parts, recenter and rebuild fixtures. A body left without a usable
/// collider hands its cells back to the grid and is destroyed.
fn regenerate<P: PhysicsBackend>(world: &mut WorldCore<P>, id: BodyId, skip_calculations: bool) -> RegenOutcome {
    let mut outcome = RegenOutcome { alive: false, spawned: Vec::new() };
    let Some(mut body) = world.bodies.remove(&id) else {
        return outcome;
    };
    body.clear_regenerate();
    let ppm = world.settings.pixels_per_meter;
    let params = world.settings.body_collider();

    if !skip_calculations {
        for part in body.split_components() {
            let part_id = BodyId(world.next_body_id);
            let Some(mut piece) = body.spawn_part(part_id, part, &mut world.physics, ppm) else {
                continue;
            };
            world.next_body_id += 1;
            if piece.rebuild_fixtures(&mut world.physics, &params) == 0 {
                destroy_without_collider(world, &mut piece);
            } else {
                outcome.spawned.push(part_id);
                world.bodies.insert(part_id, piece);
            }
        }
        body.recenter(&mut world.physics, ppm);
    }

    if !body.is_empty() && body.rebuild_fixtures(&mut world.physics, &params) > 0 {
        world.bodies.insert(id, body);
        outcome.alive = true;
    } else {
        destroy_without_collider(world, &mut body);
    }
    outcome
}

fn destroy_without_collider<P: PhysicsBackend>(world: &mut WorldCore<P>, body: &mut PixelBody) {
    let released = body.release_into(&mut world.grid);
    world.physics.destroy_body(body.handle());
    warn!("body {} has no collider left, released {} cells", body.id(), released);
}

/// Lift every body out of the grid. Returns how many cells were evicted.
pub(super) fn exit_all<P: PhysicsBackend>(world: &mut WorldCore<P>) -> u32 {
    let (lin, ang) = (world.settings.idle_linear_speed, world.settings.idle_angular_speed);
    let mut evicted = 0;
    for body in world.bodies.values_mut() {
        let idle = body.is_idle(&world.physics, lin, ang);
        evicted += body.exit_world(&mut world.grid, &world.catalog, idle);
    }
    evicted as u32
}

/// Regenerate every body that lost cells. Returns (parts split off, bodies destroyed).
pub(super) fn regenerate_flagged<P: PhysicsBackend>(world: &mut WorldCore<P>) -> (u32, u32) {
    let flagged: Vec<BodyId> = world
        .bodies
        .values()
        .filter(|b| b.needs_regenerate())
        .map(PixelBody::id)
        .collect();
    let (mut split, mut destroyed) = (0, 0);
    for id in flagged {
        let outcome = regenerate(world, id, false);
        split += outcome.spawned.len() as u32;
        if !outcome.alive {
            destroyed += 1;
        }
    }
    (split, destroyed)
}

/// Map every body onto its new slots and write it back into the grid.
pub(super) fn enter_all<P: PhysicsBackend>(world: &mut WorldCore<P>) {
    let ppm = world.settings.pixels_per_meter;
    let (lin, ang) = (world.settings.idle_linear_speed, world.settings.idle_angular_speed);
    for body in world.bodies.values_mut() {
        body.update_positions(&world.physics, ppm);
        let idle = body.is_idle(&world.physics, lin, ang);
        body.enter_world(&mut world.grid, idle);
    }
}

/// Wake sleeping dynamic bodies whose bounds reach into a dirty rect. Returns how many woke.
pub(super) fn wake_bodies_in_dirty_rects<P: PhysicsBackend>(world: &mut WorldCore<P>) -> u32 {
    let ppm = world.settings.pixels_per_meter;
    let mut sleeping = BTreeSet::new();
    for chunk in world.grid.chunks() {
        let rect = chunk.dirty_rect();
        if rect.is_empty() {
            continue;
        }
        let origin = chunk_bounds(chunk.coord(), ppm).min;
        let region = Aabb::new(
            origin + IVec2::new(rect.min_x, rect.min_y).to_vec2() / ppm,
            origin + IVec2::new(rect.max_x + 1, rect.max_y + 1).to_vec2() / ppm,
        );
        for hit in world.physics.query_aabb(region) {
            if hit.kind == BodyKind::Dynamic && !world.physics.is_awake(hit.body) {
                sleeping.insert(hit.body);
            }
        }
    }
    for &handle in &sleeping {
        world.physics.set_awake(handle, true);
    }
    sleeping.len() as u32
}
