use wasm_bindgen::prelude::*;

/// Timings and counters of the last step. All zero while perf metrics are off.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) bodies_ms: f64,
    pub(super) physics_ms: f64,
    pub(super) grid_ms: f64,
    pub(super) colliders_ms: f64,

    pub(super) chunk_count: u32,
    pub(super) dirty_chunks: u32,
    pub(super) cells_processed: u32,
    pub(super) reactions_applied: u32,
    pub(super) phase_changes: u32,
    pub(super) ignitions: u32,
    pub(super) colliders_rebuilt: u32,
    pub(super) bodies: u32,
    pub(super) bodies_split: u32,
    pub(super) bodies_destroyed: u32,
    pub(super) bodies_woken: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn bodies_ms(&self) -> f64 { self.bodies_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn grid_ms(&self) -> f64 { self.grid_ms }
    #[wasm_bindgen(getter)]
    pub fn colliders_ms(&self) -> f64 { self.colliders_ms }

    #[wasm_bindgen(getter)]
    pub fn chunk_count(&self) -> u32 { self.chunk_count }
    #[wasm_bindgen(getter)]
    pub fn dirty_chunks(&self) -> u32 { self.dirty_chunks }
    #[wasm_bindgen(getter)]
    pub fn cells_processed(&self) -> u32 { self.cells_processed }
    #[wasm_bindgen(getter)]
    pub fn reactions_applied(&self) -> u32 { self.reactions_applied }
    #[wasm_bindgen(getter)]
    pub fn phase_changes(&self) -> u32 { self.phase_changes }
    #[wasm_bindgen(getter)]
    pub fn ignitions(&self) -> u32 { self.ignitions }
    #[wasm_bindgen(getter)]
    pub fn colliders_rebuilt(&self) -> u32 { self.colliders_rebuilt }
    #[wasm_bindgen(getter)]
    pub fn bodies(&self) -> u32 { self.bodies }
    #[wasm_bindgen(getter)]
    pub fn bodies_split(&self) -> u32 { self.bodies_split }
    #[wasm_bindgen(getter)]
    pub fn bodies_destroyed(&self) -> u32 { self.bodies_destroyed }
    #[wasm_bindgen(getter)]
    pub fn bodies_woken(&self) -> u32 { self.bodies_woken }
}
