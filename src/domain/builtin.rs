//! Built-in element table and reactions (the `base` pack).

use super::content::{ReactionSide, ReactionSpec};
use super::elements::*;

fn with_tags(mut def: ElementDef, tags: &[&str]) -> ElementDef {
    def.tags = tags.iter().map(|t| t.to_string()).collect();
    def
}

pub fn elements() -> Vec<ElementDef> {
    let empty = ElementDef::new("base:empty", Category::Gas, 0xFF0A_0A0A, 0.0);

    let mut stone = ElementDef::new("base:stone", Category::Solid, 0xFF80_8080, 8.0);
    stone.conductivity = 30;
    stone.melt = Some(PhaseTarget { threshold: 900.0, into: EL_LAVA });

    let mut sand = ElementDef::new("base:sand", Category::MovableSolid, 0xFF6B_C2E6, 5.0);
    sand.friction = 35;
    sand.conductivity = 20;
    sand.melt = Some(PhaseTarget { threshold: 1500.0, into: EL_LAVA });

    let mut wood = ElementDef::new("base:wood", Category::Solid, 0xFF21_4A8B, 3.0);
    wood.conductivity = 10;
    wood.health = 80;
    wood.flammability = Some(Flammability {
        ignition_temp: 300.0,
        fire_temp: 800.0,
        burn_rate: 1,
        spread_chance: 20,
        burnt_into: EL_ASH,
    });

    let mut metal = ElementDef::new("base:metal", Category::Solid, 0xFFA8_A0A0, 9.0);
    metal.conductivity = 90;
    metal.melt = Some(PhaseTarget { threshold: 1400.0, into: EL_LAVA });

    let mut ice = ElementDef::new("base:ice", Category::Solid, 0xFFF5_E6B4, 3.0);
    ice.conductivity = 40;
    ice.default_temp = -10.0;
    ice.melt = Some(PhaseTarget { threshold: 0.0, into: EL_WATER });

    let mut water = ElementDef::new("base:water", Category::Liquid, 0xFFD4_7A26, 3.0);
    water.conductivity = 40;
    water.dispersion = 4;
    water.melt = Some(PhaseTarget { threshold: 100.0, into: EL_STEAM });
    water.freeze = Some(PhaseTarget { threshold: 0.0, into: EL_ICE });

    let mut oil = ElementDef::new("base:oil", Category::Liquid, 0xFF1E_2B3A, 2.0);
    oil.conductivity = 15;
    oil.dispersion = 3;
    oil.flammability = Some(Flammability {
        ignition_temp: 200.0,
        fire_temp: 700.0,
        burn_rate: 4,
        spread_chance: 40,
        burnt_into: EL_SMOKE,
    });

    let mut lava = ElementDef::new("base:lava", Category::Liquid, 0xFF00_45FF, 4.0);
    lava.conductivity = 40;
    lava.default_temp = 1200.0;
    lava.dispersion = 1;
    lava.freeze = Some(PhaseTarget { threshold: 700.0, into: EL_STONE });

    let mut steam = ElementDef::new("base:steam", Category::Gas, 0xFFE0_D8D0, 0.3);
    steam.conductivity = 20;
    steam.default_temp = 110.0;
    steam.freeze = Some(PhaseTarget { threshold: 90.0, into: EL_WATER });

    let mut smoke = ElementDef::new("base:smoke", Category::Gas, 0xFF3C_3C3C, 0.5);
    smoke.conductivity = 5;
    smoke.default_temp = 60.0;

    let mut fire = ElementDef::new("base:fire", Category::Fire, 0xFF00_66FF, 0.2);
    fire.conductivity = 30;
    fire.default_temp = 800.0;
    fire.health = 40;
    fire.flammability = Some(Flammability {
        ignition_temp: 250.0,
        fire_temp: 800.0,
        burn_rate: 0,
        spread_chance: 25,
        burnt_into: EL_EMPTY,
    });

    let mut ash = ElementDef::new("base:ash", Category::MovableSolid, 0xFF50_5050, 4.0);
    ash.friction = 60;
    ash.conductivity = 10;

    vec![
        empty,
        with_tags(stone, &["mineral"]),
        with_tags(sand, &["powder"]),
        with_tags(wood, &["flammable", "organic"]),
        with_tags(metal, &["conductive"]),
        with_tags(ice, &["frozen"]),
        with_tags(water, &["liquid"]),
        with_tags(oil, &["liquid", "flammable"]),
        with_tags(lava, &["molten", "hot"]),
        with_tags(steam, &["vapor"]),
        with_tags(smoke, &["vapor"]),
        with_tags(fire, &["hot"]),
        with_tags(ash, &["powder"]),
    ]
}

pub fn reactions() -> Vec<ReactionSpec> {
    vec![
        ReactionSpec {
            a: ReactionSide::Element(EL_LAVA),
            b: ReactionSide::Element(EL_WATER),
            out_a: EL_STONE,
            out_b: EL_STEAM,
            probability: 100,
        },
        ReactionSpec {
            a: ReactionSide::Element(EL_FIRE),
            b: ReactionSide::Element(EL_WATER),
            out_a: EL_EMPTY,
            out_b: EL_STEAM,
            probability: 50,
        },
        ReactionSpec {
            a: ReactionSide::Tag("molten".to_string()),
            b: ReactionSide::Tag("frozen".to_string()),
            out_a: EL_STONE,
            out_b: EL_WATER,
            probability: 60,
        },
    ]
}
