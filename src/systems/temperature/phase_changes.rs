use crate::domain::material::{MaterialId, MaterialState, EMPTY};
use crate::domain::registry::MaterialRegistry;
use crate::systems::random::SALT_IGNITION;
use crate::systems::PassContext;

/// Phase change for `id` at temperature `t`: the new material and the
/// threshold the cell snaps to, so it cannot flip straight back.
pub fn phase_target(materials: &MaterialRegistry, id: MaterialId, t: f32) -> Option<(MaterialId, f32)> {
    let tr = materials.transitions(id);
    let melt = materials.melting_point(id);
    let boil = materials.boiling_point(id);

    match materials.state(id) {
        MaterialState::Solid | MaterialState::Powder => {
            if let (Some(mp), Some(liquid)) = (melt, tr.liquid) {
                if t > mp {
                    return Some((liquid, mp));
                }
            }
            if let (Some(bp), Some(gas)) = (boil, tr.gas) {
                if t > bp {
                    return Some((gas, bp));
                }
            }
            None
        }
        MaterialState::Liquid => {
            if let (Some(bp), Some(gas)) = (boil, tr.gas) {
                if t > bp {
                    return Some((gas, bp));
                }
            }
            if let (Some(mp), Some(solid)) = (melt, tr.solid) {
                if t < mp {
                    return Some((solid, mp));
                }
            }
            None
        }
        MaterialState::Gas => {
            if let (Some(bp), Some(liquid)) = (boil, tr.liquid) {
                if t < bp {
                    return Some((liquid, bp));
                }
            }
            None
        }
    }
}

/// Phase change, ignition, or lifetime countdown for one cell (first that
/// applies). Returns true when the cell changed material.
pub(super) fn apply_transition(ctx: &mut PassContext, x: u32, y: u32) -> bool {
    let idx = ctx.grid.index(x, y);
    let id = ctx.grid.ids[idx];
    if id == EMPTY {
        return false;
    }
    let t = ctx.grid.temperature[idx];

    if let Some((next, snap)) = phase_target(ctx.materials, id, t) {
        ctx.transform(x, y, next, snap);
        return true;
    }

    let tr = ctx.materials.transitions(id);
    if let (Some(ip), Some(burnt)) = (ctx.materials.ignition_point(id), tr.burns_to) {
        let flammability = ctx.materials.flammability(id);
        if t > ip && flammability > 0.0 && ctx.chance(x, y, SALT_IGNITION, flammability) {
            let burn_t = ctx.materials.declared_temperature(burnt).map_or(t, |d| d.max(t));
            ctx.transform(x, y, burnt, burn_t);
            return true;
        }
    }

    let life = ctx.grid.life[idx];
    if life > 0 {
        ctx.grid.life[idx] = life - 1;
        ctx.chunks.touch(x, y);
        if life == 1 {
            ctx.transform(x, y, tr.decays_to, t);
            return true;
        }
    }
    false
}
