//! Grid - Structure of Arrays (SoA) cell storage
//!
//! Instead of: Vec<Cell>                   // one struct per cell
//! We have:    ids[], temperature[], ...   // one contiguous array per field
//!
//! Cells are allocated once and overwritten in place for the grid's lifetime.

use crate::domain::material::{MaterialId, EMPTY};

mod indexing;
mod accessors;
mod moves;
mod stamps;

pub struct Grid {
    width: u32,
    height: u32,
    size: usize,

    pub ids: Vec<MaterialId>,     // Material id (0 = empty)
    pub temperature: Vec<f32>,    // °C
    pub scratch: Vec<f32>,        // Free payload for extension layers
    pub life: Vec<u16>,           // Remaining lifetime in ticks (0 = infinite)

    // Per-pass visit stamps
    stamp: Vec<u32>,
    epoch: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32, ambient: f32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            size,
            ids: vec![EMPTY; size],
            temperature: vec![ambient; size],
            scratch: vec![0.0; size],
            life: vec![0; size],
            stamp: vec![0; size],
            epoch: 0,
        }
    }

    /// Reset every cell to empty at `ambient`.
    pub fn clear(&mut self, ambient: f32) {
        self.ids.fill(EMPTY);
        self.temperature.fill(ambient);
        self.scratch.fill(0.0);
        self.life.fill(0);
        self.stamp.fill(0);
        self.epoch = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty_at_ambient() {
        let grid = Grid::new(8, 4, 20.0);
        assert_eq!(grid.size(), 32);
        assert!(grid.ids.iter().all(|&id| id == EMPTY));
        assert!(grid.temperature.iter().all(|&t| t == 20.0));
    }

    #[test]
    fn swap_moves_every_field() {
        let mut grid = Grid::new(4, 4, 20.0);
        let a = grid.index(0, 0);
        let b = grid.index(3, 3);
        grid.put(a, 7, 500.0, 12);
        grid.scratch[a] = 1.5;

        grid.swap_idx(a, b);

        assert_eq!(grid.ids[b], 7);
        assert_eq!(grid.temperature[b], 500.0);
        assert_eq!(grid.life[b], 12);
        assert_eq!(grid.scratch[b], 1.5);
        assert_eq!(grid.ids[a], EMPTY);
        assert_eq!(grid.temperature[a], 20.0);
    }

    #[test]
    fn stamps_reset_between_passes() {
        let mut grid = Grid::new(2, 2, 20.0);
        grid.begin_pass();
        grid.mark_visited(3);
        assert!(grid.is_visited(3));
        grid.begin_pass();
        assert!(!grid.is_visited(3));
    }

    #[test]
    fn lookups_outside_are_none() {
        let grid = Grid::new(4, 4, 20.0);
        assert_eq!(grid.id_at(-1, 0), None);
        assert_eq!(grid.id_at(0, 4), None);
        assert_eq!(grid.id_at(3, 3), Some(EMPTY));
    }
}
