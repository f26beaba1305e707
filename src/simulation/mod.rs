//! WorldCore - the simulation world
//!
//! Orchestration only. The per-cell rules live in `systems::{behaviors, reactions,
//! temperature, combustion}`, the collider pipeline in `systems::geometry` and body upkeep in
//! `systems::pixel_body`. Each step:
//!
//! 1. bodies leave the grid and flagged bodies regenerate
//! 2. the physics backend integrates
//! 3. bodies map their cells to new world slots and re-enter the grid
//! 4. the dirty-rect grid pass runs over every chunk
//! 5. stale static colliders near dynamic bodies are rebuilt
//! 6. sleeping bodies inside dirty regions are woken

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{ContentError, IVec2, SnapshotError};
use crate::domain::{ElementCatalog, ElementId};
use crate::spatial::{BodyId, Cell, ChunkCoord, Grid};
use crate::systems::physics::{KinematicPhysics, PhysicsBackend};
use crate::systems::{BehaviorRegistry, PixelBody, UpdateParams};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/update.rs"]
mod update;
#[path = "step/step.rs"]
mod step;
#[path = "step/chunk_processing.rs"]
mod chunk_processing;
#[path = "step/colliders.rs"]
mod colliders;
#[path = "commands/commands.rs"]
mod commands;
#[path = "bodies/bodies.rs"]
mod bodies;
#[path = "snapshot/snapshot.rs"]
mod snapshot;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::World;
pub use perf_stats::PerfStats;
pub use settings::SimSettings;
pub use snapshot::ChunkSnapshot;

use perf_timer::PerfTimer;

/// The simulation world, generic over the rigid-body backend
pub struct WorldCore<P: PhysicsBackend = KinematicPhysics> {
    catalog: Arc<ElementCatalog>,
    grid: Grid,
    physics: P,
    behaviors: BehaviorRegistry,
    bodies: BTreeMap<BodyId, PixelBody>,
    next_body_id: u32,

    settings: SimSettings,
    params: UpdateParams,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl WorldCore<KinematicPhysics> {
    /// Default settings, built-in content and the reference physics backend
    pub fn new() -> Self {
        let settings = SimSettings::default();
        let physics = KinematicPhysics::new(settings.gravity);
        init::create_world_core(settings, Arc::new(ElementCatalog::builtin()), physics)
    }
}

impl Default for WorldCore<KinematicPhysics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PhysicsBackend> WorldCore<P> {
    pub fn with_settings(settings: SimSettings, catalog: Arc<ElementCatalog>, physics: P) -> Self {
        init::create_world_core(settings, catalog, physics)
    }

    /// Swap the element catalog and reset the world.
    pub fn load_content_bundle_json(&mut self, json: &str) -> Result<(), ContentError> {
        let catalog = ElementCatalog::from_bundle_json(json)?;
        self.catalog = Arc::new(catalog);
        self.clear();
        Ok(())
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn tick(&self) -> u64 {
        self.grid.tick()
    }

    /// Create every chunk covering `width` x `height` cells from the origin.
    pub fn ensure_area(&mut self, width: u32, height: u32) {
        init::ensure_area(self, width, height);
    }

    pub fn ensure_chunk(&mut self, coord: ChunkCoord) {
        self.grid.ensure_chunk(coord);
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last step's perf snapshot (zeros when perf is disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        settings::set_gravity(self, x, y);
    }

    pub fn set_ambient_temperature(&mut self, temp: f32) {
        settings::set_ambient_temperature(self, temp);
    }

    pub fn ambient_temperature(&self) -> f32 {
        self.settings.ambient_temperature
    }

    // === CELL COMMANDS ===

    /// Place an element into an empty grid slot, creating its chunk on first touch.
    pub fn add_particle(&mut self, x: i32, y: i32, element: ElementId) -> bool {
        commands::add_particle(self, IVec2::new(x, y), element)
    }

    pub fn add_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32, element: ElementId) -> u32 {
        commands::add_particles_in_radius(self, cx, cy, radius, element)
    }

    /// Empty a slot. Body cells can be erased too; the body notices on its next exit.
    pub fn remove_particle(&mut self, x: i32, y: i32) -> bool {
        commands::remove_particle(self, IVec2::new(x, y))
    }

    pub fn remove_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32) -> u32 {
        commands::remove_particles_in_radius(self, cx, cy, radius)
    }

    /// Drop every chunk and body and rewind the clock.
    pub fn clear(&mut self) {
        commands::clear(self)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.cell(IVec2::new(x, y))
    }

    /// Element at a position, empty when the chunk does not exist
    pub fn element_at(&self, x: i32, y: i32) -> ElementId {
        commands::element_at(self, IVec2::new(x, y))
    }

    pub fn temperature_at(&self, x: i32, y: i32) -> Option<f32> {
        self.cell_at(x, y).map(|c| c.temperature)
    }

    // === PIXEL BODY API ===

    /// Promote the connected region of the seed's element into a body.
    pub fn promote_region(&mut self, x: i32, y: i32) -> Option<BodyId> {
        bodies::promote_region(self, IVec2::new(x, y))
    }

    /// Promote an explicit set of grid cells into a body.
    pub fn promote_cells(&mut self, cells: &[IVec2]) -> Option<BodyId> {
        bodies::promote_cells(self, cells)
    }

    /// Destroy a body, handing its cells back to the grid.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        bodies::remove_body(self, id)
    }

    /// Run `Regenerate` on one body now. Returns false for unknown ids or when the body
    /// destroyed itself.
    pub fn regenerate_body(&mut self, id: BodyId, skip_calculations: bool) -> bool {
        bodies::regenerate_body(self, id, skip_calculations)
    }

    pub fn body(&self, id: BodyId) -> Option<&PixelBody> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &PixelBody> + '_ {
        self.bodies.values()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        step::step(self);
    }

    // === PERSISTENCE ===

    pub fn serialize_chunk(&self, coord: ChunkCoord) -> Result<Vec<u8>, SnapshotError> {
        snapshot::serialize_chunk(self, coord)
    }

    /// Insert or replace a chunk from bytes. Returns its coordinate.
    pub fn deserialize_chunk(&mut self, bytes: &[u8]) -> Result<ChunkCoord, SnapshotError> {
        snapshot::deserialize_chunk(self, bytes)
    }

    pub fn serialize_body(&self, id: BodyId) -> Result<Vec<u8>, SnapshotError> {
        snapshot::serialize_body(self, id)
    }

    pub fn deserialize_body(&mut self, bytes: &[u8]) -> Result<BodyId, SnapshotError> {
        snapshot::deserialize_body(self, bytes)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
