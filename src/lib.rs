//! Grainfall Engine - chunked falling-sand simulation with pixel rigid bodies
//!
//! Architecture:
//! - core/       - errors, deterministic rng, vector math
//! - domain/     - element catalog, built-in content, content bundles
//! - spatial/    - cells, dirty rects, chunks and the sparse grid
//! - systems/    - per-cell rules, collider pipeline, physics contract, pixel bodies
//! - simulation/ - orchestration and the wasm facade

pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

pub use domain::elements;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: browser console logging and the panic hook
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    // A second init keeps the logger that is already installed
    #[cfg(target_arch = "wasm32")]
    {
        let _ = console_log::init_with_level(log::Level::Info);
    }

    log::info!("grainfall engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use simulation::{ChunkSnapshot, PerfStats, SimSettings, World, WorldCore};

// Export element constants for JS
#[wasm_bindgen]
pub fn el_empty() -> u8 { domain::elements::EL_EMPTY }
#[wasm_bindgen]
pub fn el_stone() -> u8 { domain::elements::EL_STONE }
#[wasm_bindgen]
pub fn el_sand() -> u8 { domain::elements::EL_SAND }
#[wasm_bindgen]
pub fn el_wood() -> u8 { domain::elements::EL_WOOD }
#[wasm_bindgen]
pub fn el_metal() -> u8 { domain::elements::EL_METAL }
#[wasm_bindgen]
pub fn el_ice() -> u8 { domain::elements::EL_ICE }
#[wasm_bindgen]
pub fn el_water() -> u8 { domain::elements::EL_WATER }
#[wasm_bindgen]
pub fn el_oil() -> u8 { domain::elements::EL_OIL }
#[wasm_bindgen]
pub fn el_lava() -> u8 { domain::elements::EL_LAVA }
#[wasm_bindgen]
pub fn el_steam() -> u8 { domain::elements::EL_STEAM }
#[wasm_bindgen]
pub fn el_smoke() -> u8 { domain::elements::EL_SMOKE }
#[wasm_bindgen]
pub fn el_fire() -> u8 { domain::elements::EL_FIRE }
#[wasm_bindgen]
pub fn el_ash() -> u8 { domain::elements::EL_ASH }
