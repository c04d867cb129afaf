//! GasBehavior - steam, smoke, fire
//!
//! Negative density rises, non-negative sinks. Sideways drift is biased by wind.

use super::{can_displace, move_to, scan_sideways, try_diagonal, Behavior};
use crate::systems::random::SALT_WIND;
use crate::systems::PassContext;

pub struct GasBehavior;

impl GasBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for GasBehavior {
    fn update(&self, ctx: &mut PassContext, x: u32, y: u32) -> Option<(u32, u32)> {
        let idx = ctx.grid.index(x, y);
        let id = ctx.grid.ids[idx];
        let (xi, yi) = (x as i32, y as i32);
        let dy = if ctx.materials.density(id) < 0.0 { -1 } else { 1 };

        if can_displace(ctx, id, xi, yi + dy, dy) {
            return Some(move_to(ctx, x, y, x, (yi + dy) as u32));
        }

        if let Some(dest) = try_diagonal(ctx, id, x, y, dy, None) {
            return Some(dest);
        }

        let open = (
            can_displace(ctx, id, xi - 1, yi, 0),
            can_displace(ctx, id, xi + 1, yi, 0),
        );
        if open == (false, false) {
            return None;
        }

        let p_right = (0.5 + 0.5 * ctx.config.wind_x).clamp(0.0, 1.0);
        let preferred = if ctx.chance(x, y, SALT_WIND, p_right) { 1 } else { -1 };
        let range = u32::from(ctx.materials.dispersion(id).max(1));
        for dir in [preferred, -preferred] {
            if let Some(tx) = scan_sideways(ctx, id, x, y, dir, range) {
                return Some(move_to(ctx, x, y, tx, y));
            }
        }
        None
    }
}
