use std::fs;
use std::path::Path;

use grainfall_engine::domain::{Category, ElementCatalog};
use grainfall_engine::elements::EL_EMPTY;
use grainfall_engine::WorldCore;

fn bundle_json() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bundle.json");
    fs::read_to_string(path).expect("fixture bundle should exist")
}

#[test]
fn content_bundle_smoke_parses_and_has_core_invariants() {
    let catalog = ElementCatalog::from_bundle_json(&bundle_json()).expect("bundle.json should parse");

    assert_eq!(catalog.element_count(), 9);
    assert!(catalog.is_valid_element_id(EL_EMPTY));
    assert!(!catalog.is_valid_element_id(9));
    assert_eq!(catalog.id_by_key("base:empty"), Some(EL_EMPTY));

    let lava = catalog.id_by_key("base:lava").unwrap();
    let water = catalog.id_by_key("base:water").unwrap();
    let stone = catalog.id_by_key("base:stone").unwrap();
    let steam = catalog.id_by_key("base:steam").unwrap();
    let ice = catalog.id_by_key("base:ice").unwrap();
    assert_eq!(catalog.category(stone), Category::Solid);

    // Either cell of a pair can trigger the rule
    let rule = catalog.reaction(lava, water).unwrap();
    assert_eq!((rule.out_a, rule.out_b, rule.probability), (stone, steam, 100));
    let mirrored = catalog.reaction(water, lava).unwrap();
    assert_eq!((mirrored.out_a, mirrored.out_b), (steam, stone));

    // The first tag rule authored for a pair wins over later ones
    let rule = catalog.reaction(lava, ice).unwrap();
    assert_eq!((rule.out_a, rule.out_b, rule.probability), (stone, water, 60));

    // Unknown ids fall back to the empty definition
    assert_eq!(catalog.get(250).key, "base:empty");
    assert!(catalog.reaction(water, water).is_none());
}

#[test]
fn loaded_bundle_drives_a_world() {
    let mut world = WorldCore::new();
    world.load_content_bundle_json(&bundle_json()).unwrap();
    world.ensure_area(32, 32);

    let catalog = world.catalog();
    let lava = catalog.id_by_key("base:lava").unwrap();
    let water = catalog.id_by_key("base:water").unwrap();
    let stone = catalog.id_by_key("base:stone").unwrap();
    let steam = catalog.id_by_key("base:steam").unwrap();

    assert!(world.add_particle(10, 10, lava));
    assert!(world.add_particle(11, 10, water));
    world.step();
    assert_eq!(world.element_at(10, 10), stone);
    assert_eq!(world.element_at(11, 10), steam);
}

#[test]
fn broken_bundles_are_rejected() {
    assert!(ElementCatalog::from_bundle_json("{}").is_err());
    let unknown = r##"{
        "elements": [
            { "key": "a:air", "category": "gas", "color": 0 },
            { "key": "a:rock", "category": "solid", "color": 1 }
        ],
        "reactions": [ { "a": "#missing", "b": "a:rock", "outA": "a:air", "outB": "a:air", "probability": 5 } ]
    }"##;
    let err = ElementCatalog::from_bundle_json(unknown).unwrap_err();
    assert!(err.to_string().contains("missing"));
}
