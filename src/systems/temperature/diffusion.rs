use crate::chunks::CHUNK_SIZE;
use crate::systems::PassContext;

/// Differences below this are not worth moving.
const MIN_TRANSFER_DIFF: f32 = 0.5;

const AXES: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub(super) fn collect_sources(ctx: &PassContext, sources: &mut Vec<usize>) {
    sources.clear();
    let ambient = ctx.config.ambient_temperature;
    let threshold = ctx.config.heat_source_threshold;
    for (cx, cy) in super::active_chunks(ctx) {
        let x0 = cx * CHUNK_SIZE;
        let y0 = cy * CHUNK_SIZE;
        let x1 = (x0 + CHUNK_SIZE).min(ctx.grid.width());
        let y1 = (y0 + CHUNK_SIZE).min(ctx.grid.height());
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = ctx.grid.index(x, y);
                let id = ctx.grid.ids[idx];
                let hot = (ctx.grid.temperature[idx] - ambient).abs() > threshold;
                if hot || ctx.materials.heat_emission(id) != 0.0 {
                    sources.push(idx);
                }
            }
        }
    }
}

pub(super) fn emit(ctx: &mut PassContext, sources: &[usize]) {
    for &idx in sources {
        let emission = ctx.materials.heat_emission(ctx.grid.ids[idx]);
        if emission != 0.0 {
            let (x, y) = ctx.grid.coords(idx);
            let t = ctx.grid.temperature[idx] + emission * ctx.dt;
            ctx.set_temperature(x, y, t);
        }
    }
}

/// Push heat from each source into its 4 axes, out to a radius that grows
/// with the source's distance from ambient. Heat is conserved per exchange.
///
/// A source's transfer rate is shared across the `4 * radius` cells it
/// reaches, so a wider reach does not drain a hot cell faster.
pub(super) fn diffuse(ctx: &mut PassContext, sources: &[usize]) {
    let ambient = ctx.config.ambient_temperature;
    let threshold = ctx.config.heat_source_threshold;
    let step = ctx.config.heat_radius_step;
    let max_radius = ctx.config.max_heat_radius.max(1);
    let scale = ctx.dt * ctx.config.diffusion_rate;
    if scale <= 0.0 {
        return;
    }

    for &src in sources {
        let (sx, sy) = ctx.grid.coords(src);
        let excess = ((ctx.grid.temperature[src] - ambient).abs() - threshold).max(0.0);
        let radius = (1 + (excess / step) as u32).min(max_radius);
        let k_src = ctx.materials.conductivity(ctx.grid.ids[src]);
        let share = scale / (4 * radius) as f32;

        for (dx, dy) in AXES {
            for d in 1..=radius as i32 {
                let Some(dst) = ctx.grid.checked_index(sx as i32 + dx * d, sy as i32 + dy * d) else {
                    break;
                };
                let diff = ctx.grid.temperature[src] - ctx.grid.temperature[dst];
                if diff.abs() < MIN_TRANSFER_DIFF {
                    continue;
                }
                let k = (k_src + ctx.materials.conductivity(ctx.grid.ids[dst])) * 0.5;
                let cap = diff.abs() * 0.5;
                let amount = (diff * k * share / d as f32).clamp(-cap, cap);
                if amount == 0.0 {
                    continue;
                }
                let (tx, ty) = ctx.grid.coords(dst);
                let src_t = ctx.grid.temperature[src] - amount;
                let dst_t = ctx.grid.temperature[dst] + amount;
                ctx.set_temperature(sx, sy, src_t);
                ctx.set_temperature(tx, ty, dst_t);
            }
        }
    }
}

/// Exponential decay toward ambient; snaps once within epsilon.
#[inline]
pub(super) fn decay_cell(ctx: &mut PassContext, x: u32, y: u32, factor: f32) {
    let ambient = ctx.config.ambient_temperature;
    let idx = ctx.grid.index(x, y);
    let t = ctx.grid.temperature[idx];
    if t == ambient {
        return;
    }
    let mut next = ambient + (t - ambient) * factor;
    if (next - ambient).abs() < ctx.config.temperature_epsilon {
        next = ambient;
    }
    if next != t {
        ctx.set_temperature(x, y, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::registry::MaterialRegistry;
    use crate::systems::TestBench;

    /// One diffusion step from a stone source at (2, 8). Returns the
    /// temperatures of the cells 1..=4 to its right and the grid's heat total
    /// before and after.
    fn spread_from(source_temp: f32) -> (Vec<f32>, f64, f64) {
        let mut bench = TestBench::new(16, 16, MaterialRegistry::with_defaults(), SimConfig::default());
        bench.put(2, 8, "stone");
        let src = bench.grid.index(2, 8);
        bench.grid.temperature[src] = source_temp;
        let total = |t: &[f32]| t.iter().map(|&v| v as f64).sum::<f64>();
        let before = total(bench.grid.temperature.as_slice());

        let mut ctx = bench.context(1, 1.0);
        let mut sources = Vec::new();
        collect_sources(&ctx, &mut sources);
        diffuse(&mut ctx, &sources);

        let row = (3..=6).map(|x| bench.grid.temperature[bench.grid.index(x, 8)]).collect();
        (row, before, total(bench.grid.temperature.as_slice()))
    }

    #[test]
    fn heat_reach_grows_with_temperature() {
        let ambient = SimConfig::default().ambient_temperature;

        let (warm, _, _) = spread_from(100.0);
        assert!(warm[0] > ambient);
        assert_eq!(warm[1], ambient);

        let (hot, _, _) = spread_from(500.0);
        assert!(hot[1] > ambient);
        assert_eq!(hot[2], ambient);

        let (blazing, _, _) = spread_from(2000.0);
        assert!(blazing[2] > ambient);
        assert_eq!(blazing[3], ambient, "reach is capped at max_heat_radius");
    }

    #[test]
    fn diffusion_conserves_heat() {
        let (_, before, after) = spread_from(2000.0);
        assert!((before - after).abs() < 0.05, "{before} -> {after}");
    }

    #[test]
    fn wider_reach_does_not_drain_faster() {
        let ambient = SimConfig::default().ambient_temperature;
        let (hot, _, _) = spread_from(2000.0);
        // Nearest neighbor gets less than an unshared radius-1 exchange would give it.
        let k = (0.3 + 0.05) * 0.5;
        let unshared = (2000.0 - ambient) * k / 4.0;
        assert!(hot[0] - ambient < unshared);
    }
}
