//! Element types: ids, categories and the immutable per-type definition.

use serde::{Deserialize, Serialize};

pub type ElementId = u8;

pub const EL_EMPTY: ElementId = 0;
pub const EL_STONE: ElementId = 1;
pub const EL_SAND: ElementId = 2;
pub const EL_WOOD: ElementId = 3;
pub const EL_METAL: ElementId = 4;
pub const EL_ICE: ElementId = 5;
pub const EL_WATER: ElementId = 6;
pub const EL_OIL: ElementId = 7;
pub const EL_LAVA: ElementId = 8;
pub const EL_STEAM: ElementId = 9;
pub const EL_SMOKE: ElementId = 10;
pub const EL_FIRE: ElementId = 11;
pub const EL_ASH: ElementId = 12;

/// Movement category. Selects the behavior that runs in the movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Solid,
    MovableSolid,
    Liquid,
    Gas,
    Fire,
}

impl Category {
    /// Categories that can be displaced by something denser.
    #[inline]
    pub fn is_fluid(self) -> bool {
        matches!(self, Category::Liquid | Category::Gas)
    }

    /// Categories that take part in static colliders and body promotion.
    #[inline]
    pub fn is_collidable(self) -> bool {
        matches!(self, Category::Solid | Category::MovableSolid)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flammability {
    /// Temperature at which the cell ignites (for fire: below which it goes out)
    pub ignition_temp: f32,
    /// Temperature a burning cell holds and the fire it spawns starts at
    pub fire_temp: f32,
    /// Health lost per tick while burning
    pub burn_rate: i32,
    /// Percent chance per tick to spread fire/ignition to a neighbor
    pub spread_chance: u8,
    pub burnt_into: ElementId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTarget {
    pub threshold: f32,
    pub into: ElementId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementDef {
    pub key: String,
    pub category: Category,
    /// Base color, ABGR
    pub color: u32,
    pub density: f32,
    /// 0..=100 chance per tick for a sliding cell to stop
    pub friction: u8,
    /// 0..=100
    pub conductivity: u8,
    pub default_temp: f32,
    pub health: i32,
    /// Sideways reach per tick for liquids
    pub dispersion: u8,
    pub flammability: Option<Flammability>,
    /// Becomes `into` above `threshold`
    pub melt: Option<PhaseTarget>,
    /// Becomes `into` below `threshold`
    pub freeze: Option<PhaseTarget>,
    pub tags: Vec<String>,
}

impl ElementDef {
    pub fn new(key: &str, category: Category, color: u32, density: f32) -> Self {
        Self {
            key: key.to_string(),
            category,
            color,
            density,
            friction: 100,
            conductivity: 0,
            default_temp: 20.0,
            health: 100,
            dispersion: 0,
            flammability: None,
            melt: None,
            freeze: None,
            tags: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
