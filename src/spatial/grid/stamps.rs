use super::*;

impl Grid {
    /// Start a new pass: every cell becomes unvisited.
    pub fn begin_pass(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.stamp.fill(0);
            self.epoch = 1;
        }
    }

    #[inline]
    pub fn is_visited(&self, idx: usize) -> bool {
        self.stamp[idx] == self.epoch
    }

    #[inline]
    pub fn mark_visited(&mut self, idx: usize) {
        self.stamp[idx] = self.epoch;
    }
}
