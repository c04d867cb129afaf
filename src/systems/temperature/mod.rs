//! Temperature System - heat diffusion, cooling and material transitions
//!
//! Per tick:
//! 1. Collect heat sources (far from ambient, or emitting) in active chunks
//! 2. Emitters gain heat; every source pushes heat along its 4 axes
//! 3. Every cell in an active chunk decays exponentially toward ambient
//! 4. Transitions: phase changes, ignition, lifetime expiry

mod diffusion;
mod phase_changes;

pub use phase_changes::phase_target;

use crate::chunks::CHUNK_SIZE;
use crate::systems::PassContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThermalStats {
    pub heat_sources: u32,
    pub transitions: u32,
}

/// Run the thermal pass. `sources` is a reusable buffer.
pub fn process_temperature(ctx: &mut PassContext, sources: &mut Vec<usize>) -> ThermalStats {
    diffusion::collect_sources(ctx, sources);
    diffusion::emit(ctx, sources);
    diffusion::diffuse(ctx, sources);

    let mut stats = ThermalStats {
        heat_sources: sources.len() as u32,
        transitions: 0,
    };

    let factor = (-ctx.config.cooling_rate * ctx.dt).exp();
    let transitions = ctx.config.transitions_enabled;
    for (cx, cy) in active_chunks(ctx) {
        let x0 = cx * CHUNK_SIZE;
        let y0 = cy * CHUNK_SIZE;
        let x1 = (x0 + CHUNK_SIZE).min(ctx.grid.width());
        let y1 = (y0 + CHUNK_SIZE).min(ctx.grid.height());
        for y in y0..y1 {
            for x in x0..x1 {
                diffusion::decay_cell(ctx, x, y, factor);
                if transitions && phase_changes::apply_transition(ctx, x, y) {
                    stats.transitions += 1;
                }
            }
        }
    }
    stats
}

/// Active chunks in fixed (row, column) order.
pub(crate) fn active_chunks(ctx: &PassContext) -> Vec<(u32, u32)> {
    let (chunks_x, chunks_y) = ctx.chunks.dimensions();
    let mut out = Vec::new();
    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            if ctx.chunks.is_active(cx, cy) {
                out.push((cx, cy));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::registry::MaterialRegistry;
    use crate::systems::TestBench;

    #[test]
    fn lava_in_open_air_stays_molten_for_a_second() {
        let mut bench = TestBench::new(32, 32, MaterialRegistry::with_defaults(), SimConfig::default());
        bench.put(16, 16, "lava");
        let mut sources = Vec::new();
        for tick in 0..60 {
            process_temperature(&mut bench.context(tick, 1.0 / 60.0), &mut sources);
        }
        assert_eq!(bench.name_at(16, 16), "lava");
        let t = bench.grid.temperature[bench.grid.index(16, 16)];
        assert!(t > 1150.0 && t < 1400.0, "lava at {t}");
    }

    #[test]
    fn cold_cells_outside_sources_only_decay() {
        let mut bench = TestBench::new(16, 16, MaterialRegistry::with_defaults(), SimConfig::default());
        bench.put(4, 4, "stone");
        let idx = bench.grid.index(4, 4);
        bench.grid.temperature[idx] = 40.0;
        let stats = process_temperature(&mut bench.context(0, 1.0), &mut Vec::new());
        assert_eq!(stats.heat_sources, 0);
        let t = bench.grid.temperature[idx];
        assert!(t < 40.0 && t > 20.0);
        assert_eq!(bench.grid.temperature[bench.grid.index(5, 4)], 20.0);
    }
}
