//! Chemical Reactions - table-driven pair reactions
//!
//! For every non-empty cell in an active chunk, the 4-neighbors are looked up
//! in the compiled `(self, neighbor)` table. Eligible pairs roll their rule's
//! probability in a per-cell rotated order; the first success ends the cell's
//! turn, and both cells sit out the rest of the pass.

use crate::chunks::CHUNK_SIZE;
use crate::domain::material::{MaterialId, EMPTY};
use crate::domain::reactions::{CompiledReaction, ResultId};
use crate::error::{EngineError, EngineResult};
use crate::systems::random::{SALT_NEIGHBOR_ORDER, SALT_REACTION};
use crate::systems::PassContext;

const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReactionStats {
    pub applied: u32,
    pub failed: u32,
}

pub fn process_reactions(ctx: &mut PassContext) -> ReactionStats {
    ctx.grid.begin_pass();
    let mut stats = ReactionStats::default();
    let width = ctx.grid.width();
    let height = ctx.grid.height();
    let (chunks_x, _) = ctx.chunks.dimensions();

    for y in 0..height {
        let cy = y / CHUNK_SIZE;
        for cx in 0..chunks_x {
            // Checked per span: a chunk woken earlier in this pass is visited.
            if !ctx.chunks.is_active(cx, cy) {
                continue;
            }
            let x0 = cx * CHUNK_SIZE;
            let x1 = (x0 + CHUNK_SIZE).min(width);
            for x in x0..x1 {
                react_cell(ctx, x, y, &mut stats);
            }
        }
    }
    stats
}

fn react_cell(ctx: &mut PassContext, x: u32, y: u32, stats: &mut ReactionStats) {
    let idx = ctx.grid.index(x, y);
    let id = ctx.grid.ids[idx];
    if id == EMPTY || ctx.grid.is_visited(idx) {
        return;
    }

    let materials = ctx.materials;
    let mut eligible: [Option<(u32, u32, &CompiledReaction)>; 4] = [None; 4];
    let mut any = false;
    for (slot, (dx, dy)) in NEIGHBORS.iter().enumerate() {
        let Some(n) = ctx.grid.checked_index(x as i32 + dx, y as i32 + dy) else {
            continue;
        };
        if ctx.grid.is_visited(n) {
            continue;
        }
        if let Some(reaction) = materials.reaction(id, ctx.grid.ids[n]) {
            let (nx, ny) = ctx.grid.coords(n);
            eligible[slot] = Some((nx, ny, reaction));
            any = true;
        }
    }
    if !any {
        return;
    }

    let start = (ctx.roll(x, y, SALT_NEIGHBOR_ORDER) % 4) as usize;
    for step in 0..4 {
        let slot = (start + step) % 4;
        let Some((nx, ny, reaction)) = eligible[slot] else {
            continue;
        };
        let p = reaction.probability.unwrap_or(ctx.config.reaction_probability);
        if !ctx.chance(x, y, SALT_REACTION + slot as u32, p) {
            continue;
        }
        match apply_reaction(ctx, reaction, (x, y), (nx, ny)) {
            Ok(()) => {
                let n = ctx.grid.index(nx, ny);
                ctx.grid.mark_visited(idx);
                ctx.grid.mark_visited(n);
                stats.applied += 1;
                return;
            }
            Err(err) => {
                let rule = materials
                    .rules()
                    .get(reaction.rule_index)
                    .map_or("?", |r| r.name.as_str());
                log::warn!("reaction \"{rule}\" at ({x}, {y}) failed: {err}");
                stats.failed += 1;
            }
        }
    }
}

fn resolve(result: &ResultId) -> EngineResult<Option<MaterialId>> {
    match result {
        ResultId::Keep => Ok(None),
        ResultId::Become(id) => Ok(Some(*id)),
        ResultId::Unresolved(name) => Err(EngineError::UnknownMaterial(name.clone())),
    }
}

/// Apply both sides of a reaction. Results are resolved first, so a failing
/// rule leaves both cells untouched.
pub(crate) fn apply_reaction(
    ctx: &mut PassContext,
    reaction: &CompiledReaction,
    source: (u32, u32),
    target: (u32, u32),
) -> EngineResult<()> {
    let source_next = resolve(&reaction.source_result)?;
    let target_next = resolve(&reaction.target_result)?;
    apply_side(ctx, source, source_next, reaction.source_heat);
    apply_side(ctx, target, target_next, reaction.target_heat);
    Ok(())
}

fn apply_side(ctx: &mut PassContext, (x, y): (u32, u32), next: Option<MaterialId>, heat: f32) {
    let idx = ctx.grid.index(x, y);
    let t = ctx.grid.temperature[idx];
    match next {
        Some(id) => {
            let base = ctx.materials.declared_temperature(id).unwrap_or(t);
            ctx.transform(x, y, id, base + heat);
        }
        None if heat != 0.0 => ctx.set_temperature(x, y, t + heat),
        None => {}
    }
}
