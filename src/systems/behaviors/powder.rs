//! PowderBehavior - sand, dirt, gunpowder
//!
//! Falls straight down; when blocked, slides diagonally unless friction holds it.

use super::{can_displace, move_to, try_diagonal, Behavior};
use crate::systems::random::SALT_FRICTION;
use crate::systems::PassContext;

pub struct PowderBehavior;

impl PowderBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for PowderBehavior {
    fn update(&self, ctx: &mut PassContext, x: u32, y: u32) -> Option<(u32, u32)> {
        let idx = ctx.grid.index(x, y);
        let id = ctx.grid.ids[idx];

        if can_displace(ctx, id, x as i32, y as i32 + 1, 1) {
            return Some(move_to(ctx, x, y, x, y + 1));
        }

        // Higher friction = lower chance to slide
        let slide = 1.0 - ctx.materials.friction(id);
        try_diagonal(ctx, id, x, y, 1, Some((SALT_FRICTION, slide)))
    }
}
