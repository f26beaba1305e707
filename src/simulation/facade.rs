use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::domain::ElementCatalog;
use crate::spatial::{BodyId, ChunkCoord};
use crate::systems::physics::KinematicPhysics;

use super::perf_stats::PerfStats;
use super::{SimSettings, WorldCore};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create a world with every chunk of a width x height area allocated
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        let mut core = WorldCore::new();
        core.ensure_area(width, height);
        Self { core }
    }

    /// Same as the constructor, with `SimSettings` JSON (missing fields take defaults)
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(width: u32, height: u32, settings_json: &str) -> Result<World, JsValue> {
        let settings = SimSettings::from_json(settings_json).map_err(js_err)?;
        let physics = KinematicPhysics::new(settings.gravity);
        let catalog = Arc::new(ElementCatalog::builtin());
        let mut core = WorldCore::with_settings(settings, catalog, physics);
        core.ensure_area(width, height);
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn tick(&self) -> u64 {
        self.core.tick()
    }

    #[wasm_bindgen(getter)]
    pub fn chunk_count(&self) -> usize {
        self.core.grid().chunk_count()
    }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> usize {
        self.core.body_count()
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.core.set_gravity(x, y);
    }

    pub fn set_ambient_temperature(&mut self, temp: f32) {
        self.core.set_ambient_temperature(temp);
    }

    pub fn get_ambient_temperature(&self) -> f32 {
        self.core.ambient_temperature()
    }

    /// Add a particle at position
    pub fn add_particle(&mut self, x: i32, y: i32, element: u8) -> bool {
        self.core.add_particle(x, y, element)
    }

    /// Add particles in radius (brush)
    pub fn add_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32, element: u8) -> u32 {
        self.core.add_particles_in_radius(cx, cy, radius, element)
    }

    pub fn remove_particle(&mut self, x: i32, y: i32) -> bool {
        self.core.remove_particle(x, y)
    }

    pub fn remove_particles_in_radius(&mut self, cx: i32, cy: i32, radius: i32) -> u32 {
        self.core.remove_particles_in_radius(cx, cy, radius)
    }

    /// Clear all particles and bodies
    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn element_at(&self, x: i32, y: i32) -> u8 {
        self.core.element_at(x, y)
    }

    /// Temperature at a position, NaN outside allocated chunks
    pub fn temperature_at(&self, x: i32, y: i32) -> f32 {
        self.core.temperature_at(x, y).unwrap_or(f32::NAN)
    }

    pub fn load_content_bundle_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.core.load_content_bundle_json(json).map_err(js_err)
    }

    pub fn get_content_manifest_json(&self) -> String {
        self.core.catalog().manifest_json()
    }

    // === PIXEL BODY API ===

    /// Promote the connected region under (x, y) into a body. Returns the body id.
    pub fn promote_region(&mut self, x: i32, y: i32) -> Option<u32> {
        self.core.promote_region(x, y).map(|id| id.0)
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        self.core.remove_body(BodyId(id))
    }

    /// Step the simulation forward
    pub fn step(&mut self) {
        self.core.step();
    }

    // === SNAPSHOTS ===

    pub fn serialize_chunk(&self, cx: i32, cy: i32) -> Result<Vec<u8>, JsValue> {
        self.core.serialize_chunk(ChunkCoord::new(cx, cy)).map_err(js_err)
    }

    pub fn deserialize_chunk(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.core.deserialize_chunk(bytes).map(|_| ()).map_err(js_err)
    }

    pub fn serialize_body(&self, id: u32) -> Result<Vec<u8>, JsValue> {
        self.core.serialize_body(BodyId(id)).map_err(js_err)
    }

    pub fn deserialize_body(&mut self, bytes: &[u8]) -> Result<u32, JsValue> {
        self.core.deserialize_body(bytes).map(|id| id.0).map_err(js_err)
    }
}

impl World {
    pub fn core(&self) -> &WorldCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut WorldCore {
        &mut self.core
    }
}
