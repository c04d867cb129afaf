//! Per-tick passes over the grid.
//!
//! Every pass works through [`PassContext`], whose write helpers keep chunk
//! activity in step with the cells they change.

pub mod behaviors;
pub mod extension;
pub mod random;
pub mod reactions;
pub mod temperature;

use crate::config::SimConfig;
use crate::domain::material::MaterialId;
use crate::domain::registry::MaterialRegistry;
use crate::grid::Grid;
use crate::chunks::ChunkGrid;

use random::CellRng;

/// Shared state handed to each pass.
pub struct PassContext<'a> {
    pub grid: &'a mut Grid,
    pub chunks: &'a mut ChunkGrid,
    pub materials: &'a MaterialRegistry,
    pub config: &'a SimConfig,
    pub rng: CellRng,
    pub tick: u64,
    pub dt: f32,
}

impl<'a> PassContext<'a> {
    /// Roll for cell (x, y). Rolling counts as activity for its chunk.
    #[inline]
    pub fn roll(&mut self, x: u32, y: u32, salt: u32) -> u32 {
        self.chunks.touch(x, y);
        let idx = self.grid.index(x, y);
        self.rng.roll(self.tick, idx, salt)
    }

    /// Probability check for cell (x, y). Rolling counts as activity for its chunk.
    #[inline]
    pub fn chance(&mut self, x: u32, y: u32, salt: u32, p: f32) -> bool {
        self.chunks.touch(x, y);
        let idx = self.grid.index(x, y);
        self.rng.chance(self.tick, idx, salt, p)
    }

    /// Replace the material of a cell; its lifetime starts over.
    pub fn transform(&mut self, x: u32, y: u32, id: MaterialId, temperature: f32) {
        let life = self.materials.lifetime(id);
        self.place(x, y, id, temperature, life);
    }

    /// Write every field of a cell and wake around it.
    pub fn place(&mut self, x: u32, y: u32, id: MaterialId, temperature: f32, life: u16) {
        let idx = self.grid.index(x, y);
        let t = self.config.clamp_temperature(temperature);
        self.grid.put(idx, id, t, life);
        self.chunks.wake(x, y);
    }

    /// Empty a cell, keeping its temperature.
    pub fn clear(&mut self, x: u32, y: u32) {
        let idx = self.grid.index(x, y);
        self.grid.clear_idx(idx);
        self.chunks.wake(x, y);
    }

    /// Write a temperature; only the cell's own chunk is refreshed.
    #[inline]
    pub fn set_temperature(&mut self, x: u32, y: u32, temperature: f32) {
        let idx = self.grid.index(x, y);
        self.grid.temperature[idx] = self.config.clamp_temperature(temperature);
        self.chunks.touch(x, y);
    }

    /// Swap two cells and wake around both.
    #[inline]
    pub fn swap(&mut self, x1: u32, y1: u32, x2: u32, y2: u32) {
        self.grid.swap(x1, y1, x2, y2);
        self.chunks.wake(x1, y1);
        self.chunks.wake(x2, y2);
    }
}

/// Owned state for driving a single pass in unit tests.
#[cfg(test)]
pub(crate) struct TestBench {
    pub grid: Grid,
    pub chunks: ChunkGrid,
    pub materials: MaterialRegistry,
    pub config: SimConfig,
}

#[cfg(test)]
impl TestBench {
    pub fn new(width: u32, height: u32, materials: MaterialRegistry, config: SimConfig) -> Self {
        Self {
            grid: Grid::new(width, height, config.ambient_temperature),
            // Sleeping off: every chunk is visited.
            chunks: ChunkGrid::new(width, height, config.inactivity_threshold, false),
            materials,
            config,
        }
    }

    /// Context for one pass; visit stamps start fresh.
    pub fn context(&mut self, tick: u64, dt: f32) -> PassContext<'_> {
        self.materials.ensure_compiled();
        self.grid.begin_pass();
        PassContext {
            grid: &mut self.grid,
            chunks: &mut self.chunks,
            materials: &self.materials,
            config: &self.config,
            rng: CellRng::new(self.config.seed),
            tick,
            dt,
        }
    }

    /// Place a material by name at its spawn temperature.
    pub fn put(&mut self, x: u32, y: u32, name: &str) {
        let id = self.materials.id(name).unwrap_or_else(|| panic!("unknown material {name}"));
        let t = self.materials.spawn_temperature(id, self.config.ambient_temperature);
        self.context(0, 0.0).transform(x, y, id, t);
    }

    pub fn name_at(&self, x: u32, y: u32) -> &str {
        let id = self.grid.ids[self.grid.index(x, y)];
        self.materials.name(id).unwrap_or("?")
    }
}
