use log::info;

use crate::core::IVec2;
use crate::domain::elements::{ElementId, EL_EMPTY};
use crate::spatial::{Cell, ChunkCoord};
use crate::systems::physics::PhysicsBackend;

use super::colliders::destroy_chunk_colliders;
use super::WorldCore;

pub(super) fn add_particle<P: PhysicsBackend>(world: &mut WorldCore<P>, pos: IVec2, element: ElementId) -> bool {
    // Validate element ID
    if element == EL_EMPTY || !world.catalog.is_valid_element_id(element) {
        return false;
    }

    let phase = world.grid.phase();
    let seed = (pos.x.wrapping_mul(7) + pos.y.wrapping_mul(13)).wrapping_add(world.grid.tick() as i32) & 31;
    let cell = world.catalog.make_cell(element, seed as u8, phase);
    let slot = world
        .grid
        .ensure_chunk(ChunkCoord::of(pos))
        .cell_mut(ChunkCoord::local(pos));
    if !slot.is_empty() {
        return false;
    }
    *slot = cell;

    world.grid.mark_dirty(pos);
    if world.catalog.is_collidable(element) {
        world.grid.mark_collider_stale(pos);
    }
    true
}

pub(super) fn add_particles_in_radius<P: PhysicsBackend>(
    world: &mut WorldCore<P>,
    cx: i32,
    cy: i32,
    radius: i32,
    element: ElementId,
) -> u32 {
    let mut placed = 0;
    for pos in disc(cx, cy, radius) {
        if add_particle(world, pos, element) {
            placed += 1;
        }
    }
    placed
}

pub(super) fn remove_particle<P: PhysicsBackend>(world: &mut WorldCore<P>, pos: IVec2) -> bool {
    let ambient = world.grid.ambient_temp();
    let Some(slot) = world.grid.cell_mut(pos) else {
        return false;
    };
    if slot.is_empty() {
        return false;
    }
    let collidable = !slot.is_rigid() && world.catalog.is_collidable(slot.element);
    *slot = Cell::empty(ambient, slot.updated);

    world.grid.mark_dirty(pos);
    if collidable {
        world.grid.mark_collider_stale(pos);
    }
    true
}

pub(super) fn remove_particles_in_radius<P: PhysicsBackend>(world: &mut WorldCore<P>, cx: i32, cy: i32, radius: i32) -> u32 {
    let mut removed = 0;
    for pos in disc(cx, cy, radius) {
        if remove_particle(world, pos) {
            removed += 1;
        }
    }
    removed
}

fn disc(cx: i32, cy: i32, radius: i32) -> impl Iterator<Item = IVec2> {
    let r2 = radius * radius;
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius)
            .filter(move |dx| dx * dx + dy * dy <= r2)
            .map(move |dx| IVec2::new(cx + dx, cy + dy))
    })
}

pub(super) fn element_at<P: PhysicsBackend>(world: &WorldCore<P>, pos: IVec2) -> ElementId {
    world.grid.cell(pos).map_or(EL_EMPTY, |c| c.element)
}

pub(super) fn clear<P: PhysicsBackend>(world: &mut WorldCore<P>) {
    destroy_chunk_colliders(world);
    for body in world.bodies.values() {
        world.physics.destroy_body(body.handle());
    }
    let bodies = world.bodies.len();
    world.bodies.clear();
    world.next_body_id = 1;
    world.grid.clear();
    info!("world cleared ({} bodies dropped)", bodies);
}
