//! FireBehavior - short-lived flames
//!
//! Every tick a flame ages, cools toward ambient, dims with its remaining health, tries to
//! light flammable neighbors and climbs into the air above it. It goes out once its health
//! runs out or it cools below its own ignition temperature.

use super::{Behavior, UpdateContext};
use crate::core::IVec2;
use crate::domain::elements::EL_EMPTY;
use crate::domain::Category;
use crate::spatial::Cell;

pub struct FireBehavior;

/// Scale the RGB channels of an ABGR color, keeping alpha.
#[inline]
fn dim(color: u32, factor: f32) -> u32 {
    let scale = |shift: u32| ((((color >> shift) & 0xFF) as f32 * factor).round() as u32).min(255) << shift;
    (color & 0xFF00_0000) | scale(16) | scale(8) | scale(0)
}

impl FireBehavior {
    fn ignite_neighbors(ctx: &mut UpdateContext, spread_chance: u8) {
        for dir in IVec2::CARDINAL {
            let n = ctx.pos + dir;
            let Some(mut other) = ctx.writable_at(n) else {
                continue;
            };
            let def = ctx.def(other.element);
            if other.ignited || def.category == Category::Fire {
                continue;
            }
            let Some(flam) = def.flammability else {
                continue;
            };
            if ctx.rng.chance(spread_chance) {
                other.ignited = true;
                other.temperature = other.temperature.max(flam.ignition_temp);
                ctx.write(n, other);
                ctx.counters.ignitions += 1;
            }
        }
    }
}

impl Behavior for FireBehavior {
    fn update(&self, ctx: &mut UpdateContext, mut cell: Cell) {
        let pos = ctx.pos;
        let def = ctx.def(cell.element);
        let (ignition, spread) = def
            .flammability
            .map(|f| (f.ignition_temp, f.spread_chance))
            .unwrap_or((0.0, 0));

        cell.health -= 1;
        cell.temperature -= (cell.temperature - ctx.params.ambient_temp) * ctx.params.fire_cooling;

        if cell.health <= 0 || cell.temperature < ignition {
            let mut out = ctx.spawn(EL_EMPTY);
            out.temperature = cell.temperature;
            ctx.write(pos, out);
            return;
        }

        let ratio = (cell.health as f32 / def.health.max(1) as f32).clamp(0.0, 1.0);
        cell.color = dim(cell.base_color, 0.35 + 0.65 * ratio);

        Self::ignite_neighbors(ctx, spread);

        let side = ctx.rng.sign();
        for dir in [IVec2::UP, IVec2::new(side, -1), IVec2::new(-side, -1)] {
            let target = pos + dir;
            let Some(mut other) = ctx.writable_at(target) else {
                continue;
            };
            match ctx.catalog.category(other.element) {
                // Empty air is a gas too.
                Category::Gas => {
                    ctx.move_to(pos, target, cell);
                    return;
                }
                Category::Fire => {
                    let merged = (cell.temperature + other.temperature) * 0.5;
                    cell.temperature = merged;
                    other.temperature = merged;
                    ctx.write(target, other);
                    ctx.write(pos, cell);
                    return;
                }
                _ => {}
            }
        }

        ctx.write(pos, cell);
    }
}
