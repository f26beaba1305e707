#![cfg(target_arch = "wasm32")]

use grainfall_engine::{el_sand, el_stone, version, World};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn world_steps_in_the_browser() {
    grainfall_engine::init();
    let mut world = World::new(64, 64);
    assert!(world.add_particle(5, 5, el_sand()));
    world.step();
    assert_eq!(world.element_at(5, 6), el_sand());
    assert!(!version().is_empty());
}

#[wasm_bindgen_test]
fn snapshots_cross_the_boundary() {
    let mut world = World::new(32, 32);
    world.add_particle(3, 3, el_stone());
    let bytes = world.serialize_chunk(0, 0).unwrap();
    let mut other = World::new(0, 0);
    other.deserialize_chunk(&bytes).unwrap();
    assert_eq!(other.element_at(3, 3), el_stone());
    assert!(world.serialize_chunk(9, 9).is_err());
}
