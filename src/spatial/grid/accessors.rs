use super::*;

impl Grid {
    #[inline]
    pub fn id_at(&self, x: i32, y: i32) -> Option<MaterialId> {
        self.checked_index(x, y).map(|i| self.ids[i])
    }

    #[inline]
    pub fn temperature_at(&self, x: i32, y: i32) -> Option<f32> {
        self.checked_index(x, y).map(|i| self.temperature[i])
    }

    #[inline]
    pub fn is_empty_idx(&self, idx: usize) -> bool {
        self.ids[idx] == EMPTY
    }

    /// Overwrite a cell. Scratch is reset; it belongs to the previous occupant.
    #[inline]
    pub fn put(&mut self, idx: usize, id: MaterialId, temperature: f32, life: u16) {
        self.ids[idx] = id;
        self.temperature[idx] = temperature;
        self.life[idx] = life;
        self.scratch[idx] = 0.0;
    }

    /// Empty a cell, keeping its temperature (air diffuses too).
    #[inline]
    pub fn clear_idx(&mut self, idx: usize) {
        self.ids[idx] = EMPTY;
        self.life[idx] = 0;
        self.scratch[idx] = 0.0;
    }

    /// Count of cells per material id.
    pub fn histogram(&self) -> [u32; 256] {
        let mut counts = [0u32; 256];
        for &id in &self.ids {
            counts[id as usize] += 1;
        }
        counts
    }
}
