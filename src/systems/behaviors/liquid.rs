//! LiquidBehavior - water, oil, lava, acid
//!
//! Priority: straight down, diagonal down, then sideways spread of up to
//! `dispersion` cells. Spreading is gated by viscosity.

use super::{can_displace, move_to, pick_side, scan_sideways, try_diagonal, Behavior};
use crate::systems::random::{SALT_SPREAD, SALT_VISCOSITY};
use crate::systems::PassContext;

pub struct LiquidBehavior;

impl LiquidBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for LiquidBehavior {
    fn update(&self, ctx: &mut PassContext, x: u32, y: u32) -> Option<(u32, u32)> {
        let idx = ctx.grid.index(x, y);
        let id = ctx.grid.ids[idx];
        let (xi, yi) = (x as i32, y as i32);

        if can_displace(ctx, id, xi, yi + 1, 1) {
            return Some(move_to(ctx, x, y, x, y + 1));
        }

        if let Some(dest) = try_diagonal(ctx, id, x, y, 1, None) {
            return Some(dest);
        }

        let open = (
            can_displace(ctx, id, xi - 1, yi, 0),
            can_displace(ctx, id, xi + 1, yi, 0),
        );
        if open == (false, false) {
            return None;
        }
        let flow = 1.0 - ctx.materials.viscosity(id);
        if !ctx.chance(x, y, SALT_VISCOSITY, flow) {
            return None;
        }

        let first = pick_side(ctx, x, y, open, SALT_SPREAD)?;
        let range = u32::from(ctx.materials.dispersion(id).max(1));
        for dir in [first, -first] {
            if let Some(tx) = scan_sideways(ctx, id, x, y, dir, range) {
                return Some(move_to(ctx, x, y, tx, y));
            }
        }
        None
    }
}
