use super::*;

impl Grid {
    /// Swap two cells (all fields travel together).
    #[inline]
    pub fn swap_idx(&mut self, a: usize, b: usize) {
        self.ids.swap(a, b);
        self.temperature.swap(a, b);
        self.scratch.swap(a, b);
        self.life.swap(a, b);
    }

    pub fn swap(&mut self, x1: u32, y1: u32, x2: u32, y2: u32) {
        let a = self.index(x1, y1);
        let b = self.index(x2, y2);
        self.swap_idx(a, b);
    }
}
