//! Per-cell behavior extensions (e.g. a creature or plant layer).
//!
//! Extensions run after movement and reactions. Each non-empty cell whose
//! material an extension claims is visited once per tick, whether or not its
//! chunk is asleep. Extensions may only touch the grid through
//! [`ExtensionContext`], whose writes keep chunk activity current.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::domain::material::{Material, MaterialId, EMPTY};
use crate::systems::random::SALT_EXTENSION;
use crate::systems::PassContext;

pub trait CellExtension {
    fn name(&self) -> &str;

    /// Whether cells of this material are handed to `update`.
    fn applies_to(&self, material: &Material) -> bool;

    fn update(&mut self, ctx: &mut ExtensionContext<'_, '_>, x: u32, y: u32);
}

/// Grid primitives available to extensions. Coordinates are cell coordinates.
pub struct ExtensionContext<'p, 'a> {
    pass: &'p mut PassContext<'a>,
}

impl<'p, 'a> ExtensionContext<'p, 'a> {
    pub fn width(&self) -> u32 {
        self.pass.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.pass.grid.height()
    }

    pub fn tick(&self) -> u64 {
        self.pass.tick
    }

    pub fn dt(&self) -> f32 {
        self.pass.dt
    }

    pub fn material_id(&self, x: i32, y: i32) -> Option<MaterialId> {
        self.pass.grid.id_at(x, y)
    }

    pub fn material(&self, x: i32, y: i32) -> Option<&Material> {
        self.material_id(x, y).and_then(|id| self.pass.materials.material(id))
    }

    pub fn material_named(&self, name: &str) -> Option<MaterialId> {
        self.pass.materials.id(name)
    }

    /// Place a material at its spawn temperature. Returns false off-grid or for an unknown id.
    pub fn set(&mut self, x: i32, y: i32, id: MaterialId) -> bool {
        if !self.pass.materials.is_valid(id) || !self.pass.grid.in_bounds(x, y) {
            return false;
        }
        let t = self
            .pass
            .materials
            .spawn_temperature(id, self.pass.config.ambient_temperature);
        self.pass.transform(x as u32, y as u32, id, t);
        self.visit(x as u32, y as u32);
        true
    }

    pub fn clear(&mut self, x: i32, y: i32) -> bool {
        let Some(idx) = self.pass.grid.checked_index(x, y) else {
            return false;
        };
        if self.pass.grid.is_empty_idx(idx) {
            return true;
        }
        self.pass.clear(x as u32, y as u32);
        true
    }

    /// Move a cell into an empty one. Moved cells are not visited again this tick.
    pub fn move_cell(&mut self, from: (i32, i32), to: (i32, i32)) -> bool {
        let grid = &self.pass.grid;
        let (Some(_), Some(dst)) = (grid.checked_index(from.0, from.1), grid.checked_index(to.0, to.1)) else {
            return false;
        };
        if grid.ids[dst] != EMPTY {
            return false;
        }
        self.pass.swap(from.0 as u32, from.1 as u32, to.0 as u32, to.1 as u32);
        self.visit(to.0 as u32, to.1 as u32);
        true
    }

    pub fn temperature(&self, x: i32, y: i32) -> Option<f32> {
        self.pass.grid.temperature_at(x, y)
    }

    pub fn set_temperature(&mut self, x: i32, y: i32, t: f32) -> bool {
        if !self.pass.grid.in_bounds(x, y) || !t.is_finite() {
            return false;
        }
        self.pass.set_temperature(x as u32, y as u32, t);
        true
    }

    pub fn scratch(&self, x: i32, y: i32) -> Option<f32> {
        self.pass.grid.checked_index(x, y).map(|i| self.pass.grid.scratch[i])
    }

    pub fn set_scratch(&mut self, x: i32, y: i32, value: f32) -> bool {
        let Some(idx) = self.pass.grid.checked_index(x, y) else {
            return false;
        };
        self.pass.grid.scratch[idx] = value;
        self.pass.chunks.touch(x as u32, y as u32);
        true
    }

    /// Per-cell dice; `salt` separates independent decisions.
    pub fn roll(&mut self, x: u32, y: u32, salt: u32) -> u32 {
        self.pass.roll(x, y, SALT_EXTENSION.wrapping_add(salt))
    }

    fn visit(&mut self, x: u32, y: u32) {
        let idx = self.pass.grid.index(x, y);
        self.pass.grid.mark_visited(idx);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub visited: u32,
    pub failed: u32,
}

/// Run every extension over the cells it claims.
pub fn process_extensions(ctx: &mut PassContext, extensions: &mut [Box<dyn CellExtension>]) -> ExtensionStats {
    let mut stats = ExtensionStats::default();
    if extensions.is_empty() {
        return stats;
    }

    // claims[ext][material]
    let claims: Vec<Vec<bool>> = extensions
        .iter()
        .map(|ext| ctx.materials.materials().iter().map(|m| ext.applies_to(m)).collect())
        .collect();

    ctx.grid.begin_pass();
    let width = ctx.grid.width();
    let height = ctx.grid.height();

    // Sleeping chunks included.
    for y in (0..height).rev() {
        for x in 0..width {
            let idx = ctx.grid.index(x, y);
            let id = ctx.grid.ids[idx];
            if id == EMPTY || ctx.grid.is_visited(idx) {
                continue;
            }
            if !claims.iter().any(|c| c[id as usize]) {
                continue;
            }
            ctx.grid.mark_visited(idx);
            stats.visited += 1;
            for (ext, claim) in extensions.iter_mut().zip(&claims) {
                // An earlier extension may have replaced the cell.
                let current = ctx.grid.ids[idx];
                if current == EMPTY || !claim[current as usize] {
                    continue;
                }
                let mut ext_ctx = ExtensionContext { pass: &mut *ctx };
                let result = catch_unwind(AssertUnwindSafe(|| ext.update(&mut ext_ctx, x, y)));
                if result.is_err() {
                    log::error!("extension \"{}\" panicked at ({x}, {y}); skipping", ext.name());
                    stats.failed += 1;
                }
            }
        }
    }
    stats
}
