//! Combustion - ignition, burning and burn-out of flammable elements
//!
//! Fire cells have their own behavior; this handles everything that can catch fire.

use crate::core::IVec2;
use crate::domain::elements::EL_FIRE;
use crate::domain::Category;
use crate::spatial::Cell;

use super::behaviors::UpdateContext;

/// Advance the burn state of a flammable cell. Returns the cell as stored afterwards and
/// whether it burnt out and was replaced, in which case nothing else runs for it this tick.
pub fn burn(ctx: &mut UpdateContext, mut cell: Cell) -> (Cell, bool) {
    let def = ctx.def(cell.element);
    if def.category == Category::Fire {
        return (cell, false);
    }
    let Some(flam) = def.flammability else {
        return (cell, false);
    };

    if !cell.ignited && cell.temperature >= flam.ignition_temp {
        cell.ignited = true;
        ctx.counters.ignitions += 1;
    }
    if !cell.ignited {
        return (cell, false);
    }

    cell.temperature = cell.temperature.max(flam.fire_temp);

    for dir in IVec2::CARDINAL {
        let n = ctx.pos + dir;
        let Some(mut other) = ctx.writable_at(n) else {
            continue;
        };
        let other_def = ctx.def(other.element);
        if other.is_empty() || other_def.category == Category::Gas {
            if ctx.rng.chance(flam.spread_chance) {
                let mut flame = ctx.spawn(EL_FIRE);
                flame.temperature = flam.fire_temp;
                ctx.write(n, flame);
            }
        } else if !other.ignited && other_def.category != Category::Fire {
            if let Some(other_flam) = other_def.flammability {
                if ctx.rng.chance(flam.spread_chance) {
                    other.ignited = true;
                    other.temperature = other.temperature.max(other_flam.ignition_temp);
                    ctx.write(n, other);
                    ctx.counters.ignitions += 1;
                }
            }
        }
    }

    cell.health -= flam.burn_rate;
    let pos = ctx.pos;
    if cell.health <= 0 {
        let mut ash = ctx.spawn(flam.burnt_into);
        ash.temperature = cell.temperature;
        ctx.write(pos, ash);
        return (ash, true);
    }

    ctx.write(pos, cell);
    (cell, false)
}
