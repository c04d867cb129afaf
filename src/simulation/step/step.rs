use crate::systems::behaviors::process_movement;
use crate::systems::extension::process_extensions;
use crate::systems::reactions::process_reactions;
use crate::systems::temperature::process_temperature;
use crate::systems::PassContext;

use super::tick_stats::TickStats;
use super::WorldCore;

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("update: invalid dt {dt}, using 0");
        0.0
    }
}

/// One full tick: thermal, movement, reactions, extensions.
pub(super) fn update(world: &mut WorldCore, dt: f32) {
    let dt = sanitize_dt(dt);
    world.registry.ensure_compiled();
    world.tick += 1;
    world.chunks.begin_tick(world.tick);

    let WorldCore {
        registry,
        config,
        grid,
        chunks,
        behaviors,
        extensions,
        rng,
        tick,
        heat_sources,
        stats,
        ..
    } = world;

    let mut ctx = PassContext {
        grid,
        chunks,
        materials: registry,
        config,
        rng: *rng,
        tick: *tick,
        dt,
    };

    let thermal = process_temperature(&mut ctx, heat_sources);
    let cells_moved = process_movement(&mut ctx, behaviors);
    let reactions = if ctx.config.reactions_enabled {
        process_reactions(&mut ctx)
    } else {
        Default::default()
    };
    let ext = process_extensions(&mut ctx, extensions);

    *stats = TickStats {
        heat_sources: thermal.heat_sources,
        transitions: thermal.transitions,
        cells_moved,
        reactions_applied: reactions.applied,
        reaction_failures: reactions.failed,
        extension_cells: ext.visited,
        extension_failures: ext.failed,
        active_chunks: ctx.chunks.active_chunk_count() as u32,
    };
}

/// Run `ceil(time_scale)` ticks, at least one and at most `max_substeps`.
/// A non-positive or non-finite scale runs nothing.
pub(super) fn update_scaled(world: &mut WorldCore, dt: f32, time_scale: f32) -> u32 {
    if !time_scale.is_finite() || time_scale <= 0.0 {
        return 0;
    }
    let cap = world.config.max_substeps.max(1);
    let steps = (time_scale.ceil() as u32).clamp(1, cap);
    for _ in 0..steps {
        update(world, dt);
    }
    steps
}
