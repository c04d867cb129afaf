//! Behaviors - per-state movement rules
//!
//! Each movable state has one behavior; solids never move on their own.
//! A move either relocates into an empty cell or swaps with a lighter fluid
//! (buoyancy). Every move wakes the chunks around source and destination.

mod powder;
mod liquid;
mod gas;

pub use powder::PowderBehavior;
pub use liquid::LiquidBehavior;
pub use gas::GasBehavior;

use crate::chunks::CHUNK_SIZE;
use crate::domain::material::{MaterialId, MaterialState, EMPTY};
use crate::systems::random::SALT_DIAGONAL;
use crate::systems::PassContext;

/// Behavior trait - each movable state implements this.
/// Returns the cell the material ended up in when it moved.
pub trait Behavior {
    fn update(&self, ctx: &mut PassContext, x: u32, y: u32) -> Option<(u32, u32)>;
}

/// Can `mover` enter (tx, ty) travelling vertically by `dy`?
///
/// Empty cells always accept. Occupied cells must hold an unvisited fluid:
/// falling and sideways movers need to be denser than it, rising movers lighter.
#[inline]
pub fn can_displace(ctx: &PassContext, mover: MaterialId, tx: i32, ty: i32, dy: i32) -> bool {
    let Some(tidx) = ctx.grid.checked_index(tx, ty) else {
        return false;
    };
    let target = ctx.grid.ids[tidx];
    if target == EMPTY {
        return true;
    }
    if target == mover || ctx.grid.is_visited(tidx) {
        return false;
    }
    if !ctx.materials.state(target).is_fluid() {
        return false;
    }
    let mine = ctx.materials.density(mover);
    let theirs = ctx.materials.density(target);
    if dy < 0 { mine < theirs } else { mine > theirs }
}

/// Out of bounds, or occupied by something that is not a fluid.
#[inline]
fn is_hard(ctx: &PassContext, x: i32, y: i32) -> bool {
    match ctx.grid.id_at(x, y) {
        None => true,
        Some(EMPTY) => false,
        Some(id) => !ctx.materials.state(id).is_fluid(),
    }
}

/// "Corner cutting" guard: a diagonal step between two hard cells that touch
/// at a corner is not allowed, so 1-cell staircase walls stay watertight.
#[inline]
fn corner_blocked(ctx: &PassContext, x: i32, y: i32, dx: i32, dy: i32) -> bool {
    is_hard(ctx, x + dx, y) && is_hard(ctx, x, y + dy)
}

/// Which diagonals in row `y + dy` are open to `mover`: (left, right).
#[inline]
fn open_diagonals(ctx: &PassContext, mover: MaterialId, x: i32, y: i32, dy: i32) -> (bool, bool) {
    let open = |dx: i32| {
        can_displace(ctx, mover, x + dx, y + dy, dy) && !corner_blocked(ctx, x, y, dx, dy)
    };
    (open(-1), open(1))
}

/// Pick a horizontal direction among open sides, tie broken by a roll.
#[inline]
fn pick_side(ctx: &mut PassContext, x: u32, y: u32, open: (bool, bool), salt: u32) -> Option<i32> {
    match open {
        (false, false) => None,
        (true, false) => Some(-1),
        (false, true) => Some(1),
        (true, true) => Some(if ctx.roll(x, y, salt) & 1 == 0 { -1 } else { 1 }),
    }
}

/// Try a diagonal step in row `y + dy`; `gate` is checked only when a
/// diagonal is actually open.
#[inline]
fn try_diagonal(
    ctx: &mut PassContext,
    mover: MaterialId,
    x: u32,
    y: u32,
    dy: i32,
    gate: Option<(u32, f32)>,
) -> Option<(u32, u32)> {
    let open = open_diagonals(ctx, mover, x as i32, y as i32, dy);
    if open == (false, false) {
        return None;
    }
    if let Some((salt, p)) = gate {
        if !ctx.chance(x, y, salt, p) {
            return None;
        }
    }
    let dx = pick_side(ctx, x, y, open, SALT_DIAGONAL)?;
    Some(move_to(ctx, x, y, (x as i32 + dx) as u32, (y as i32 + dy) as u32))
}

/// Swap into a cell already checked with `can_displace`.
#[inline]
fn move_to(ctx: &mut PassContext, x: u32, y: u32, tx: u32, ty: u32) -> (u32, u32) {
    ctx.swap(x, y, tx, ty);
    (tx, ty)
}

/// Scan sideways from (x, y) in direction `dir` for up to `range` cells.
///
/// Travels through empty cells and stops at the first occupied one; an
/// adjacent lighter fluid can be displaced directly.
fn scan_sideways(ctx: &PassContext, mover: MaterialId, x: u32, y: u32, dir: i32, range: u32) -> Option<u32> {
    let mut best = None;
    for i in 1..=range as i32 {
        let tx = x as i32 + dir * i;
        let Some(tidx) = ctx.grid.checked_index(tx, y as i32) else {
            break;
        };
        if ctx.grid.ids[tidx] == EMPTY {
            best = Some(tx as u32);
            continue;
        }
        if i == 1 && can_displace(ctx, mover, tx, y as i32, 0) {
            best = Some(tx as u32);
        }
        break;
    }
    best
}

/// Behavior registry - dispatch by state
pub struct BehaviorRegistry {
    powder: PowderBehavior,
    liquid: LiquidBehavior,
    gas: GasBehavior,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self {
            powder: PowderBehavior::new(),
            liquid: LiquidBehavior::new(),
            gas: GasBehavior::new(),
        }
    }

    /// Dispatch update to the behavior for `state`
    pub fn update(&self, state: MaterialState, ctx: &mut PassContext, x: u32, y: u32) -> Option<(u32, u32)> {
        match state {
            MaterialState::Powder => self.powder.update(ctx, x, y),
            MaterialState::Liquid => self.liquid.update(ctx, x, y),
            MaterialState::Gas => self.gas.update(ctx, x, y),
            MaterialState::Solid => None,
        }
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One movement pass over active chunks.
///
/// Rows go bottom to top so a falling column settles in a single pass; the
/// horizontal direction alternates every tick. Returns the number of moves.
pub fn process_movement(ctx: &mut PassContext, behaviors: &BehaviorRegistry) -> u32 {
    ctx.grid.begin_pass();
    let width = ctx.grid.width();
    let height = ctx.grid.height();
    let (chunks_x, _) = ctx.chunks.dimensions();
    let left_to_right = ctx.tick % 2 == 0;
    let mut moved = 0;

    for y in (0..height).rev() {
        let cy = y / CHUNK_SIZE;
        for step in 0..chunks_x {
            let cx = if left_to_right { step } else { chunks_x - 1 - step };
            if !ctx.chunks.is_active(cx, cy) {
                continue;
            }
            let x0 = cx * CHUNK_SIZE;
            let x1 = (x0 + CHUNK_SIZE).min(width);
            for i in 0..(x1 - x0) {
                let x = if left_to_right { x0 + i } else { x1 - 1 - i };
                let idx = ctx.grid.index(x, y);
                if ctx.grid.is_visited(idx) {
                    continue;
                }
                let id = ctx.grid.ids[idx];
                if id == EMPTY {
                    continue;
                }
                let state = ctx.materials.state(id);
                if let Some((nx, ny)) = behaviors.update(state, ctx, x, y) {
                    let dest = ctx.grid.index(nx, ny);
                    ctx.grid.mark_visited(dest);
                    ctx.grid.mark_visited(idx);
                    moved += 1;
                }
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::material::MaterialProps;
    use crate::domain::registry::MaterialRegistry;
    use crate::systems::TestBench;

    const DT: f32 = 1.0 / 60.0;
    const TRIALS: u64 = 400;

    fn bench_with(name: &str, props: MaterialProps, config: SimConfig) -> TestBench {
        let mut materials = MaterialRegistry::with_defaults();
        materials.register(name, props).unwrap();
        TestBench::new(16, 16, materials, config)
    }

    /// Trials, one per tick, in which `behavior` moved the cell at (8, 8) and
    /// `accept` liked where it went.
    fn count_moves(
        mut setup: impl FnMut() -> TestBench,
        behavior: &dyn Behavior,
        accept: impl Fn((u32, u32)) -> bool,
    ) -> u32 {
        let mut hits = 0;
        for tick in 0..TRIALS {
            let mut bench = setup();
            if behavior.update(&mut bench.context(tick, DT), 8, 8).is_some_and(&accept) {
                hits += 1;
            }
        }
        hits
    }

    fn drift_right(wind_x: f32) -> u32 {
        let setup = || {
            let config = SimConfig { wind_x, ..SimConfig::default() };
            let mut bench = TestBench::new(16, 16, MaterialRegistry::with_defaults(), config);
            // Capped from above: sideways is the only way out
            for x in 7..=9 {
                bench.put(x, 7, "stone");
            }
            bench.put(8, 8, "steam");
            bench
        };
        count_moves(setup, &GasBehavior::new(), |(tx, _)| tx > 8)
    }

    #[test]
    fn wind_biases_gas_drift() {
        let with_wind = drift_right(0.9);
        let against_wind = drift_right(-0.9);
        assert!(with_wind > 300, "drifted right {with_wind}/{TRIALS} with wind");
        assert!(against_wind < 100, "drifted right {against_wind}/{TRIALS} against wind");
    }

    #[test]
    fn gas_direction_follows_density_sign() {
        let mut heavy = bench_with("heavy gas", MaterialProps::new(MaterialState::Gas, 0.5), SimConfig::default());
        heavy.put(8, 8, "heavy gas");
        assert_eq!(GasBehavior::new().update(&mut heavy.context(0, DT), 8, 8), Some((8, 9)));

        let mut light = bench_with("light gas", MaterialProps::new(MaterialState::Gas, -0.5), SimConfig::default());
        light.put(8, 8, "light gas");
        assert_eq!(GasBehavior::new().update(&mut light.context(0, DT), 8, 8), Some((8, 7)));
    }

    fn slides(friction: f32) -> u32 {
        let setup = || {
            let props = MaterialProps { friction, ..MaterialProps::new(MaterialState::Powder, 2.0) };
            let mut bench = bench_with("grit", props, SimConfig::default());
            bench.put(8, 9, "stone");
            bench.put(8, 8, "grit");
            bench
        };
        count_moves(setup, &PowderBehavior::new(), |(_, ty)| ty == 9)
    }

    #[test]
    fn friction_holds_powder_on_a_ledge() {
        let slippery = slides(0.1);
        let sticky = slides(0.9);
        assert!(slippery > 300, "low friction slid {slippery}/{TRIALS}");
        assert!(sticky < 100, "high friction slid {sticky}/{TRIALS}");
    }

    fn spreads(viscosity: f32) -> u32 {
        let setup = || {
            let props = MaterialProps {
                viscosity,
                dispersion: 2,
                ..MaterialProps::new(MaterialState::Liquid, 1.0)
            };
            let mut bench = bench_with("syrup", props, SimConfig::default());
            for x in 0..16 {
                bench.put(x, 9, "stone");
            }
            bench.put(8, 8, "syrup");
            bench
        };
        count_moves(setup, &LiquidBehavior::new(), |(tx, ty)| ty == 8 && tx != 8)
    }

    #[test]
    fn viscosity_slows_liquid_spread() {
        let runny = spreads(0.1);
        let thick = spreads(0.9);
        assert!(runny > 300, "low viscosity spread {runny}/{TRIALS}");
        assert!(thick < 100, "high viscosity spread {thick}/{TRIALS}");
    }

    #[test]
    fn diagonal_between_touching_walls_is_blocked() {
        let mut bench = TestBench::new(16, 16, MaterialRegistry::with_defaults(), SimConfig::default());
        bench.put(8, 9, "stone");
        bench.put(7, 8, "stone");
        bench.put(9, 8, "stone");
        bench.put(8, 8, "sand");
        let ctx = bench.context(0, DT);
        assert!(corner_blocked(&ctx, 8, 8, -1, 1));
        assert!(corner_blocked(&ctx, 8, 8, 1, 1));
        assert_eq!(open_diagonals(&ctx, ctx.grid.ids[ctx.grid.index(8, 8)], 8, 8, 1), (false, false));
    }
}
