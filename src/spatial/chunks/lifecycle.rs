use super::*;

impl ChunkGrid {
    // === Tick update ===

    /// Called at the start of each tick: chunks idle for longer than the
    /// threshold go to sleep.
    pub fn begin_tick(&mut self, tick: u64) {
        self.tick = tick;
        if !self.sleeping_enabled {
            return;
        }
        let threshold = self.inactivity_threshold;
        for chunk in self.chunks.iter_mut().filter(|c| c.active) {
            if tick.saturating_sub(chunk.last_active_tick) > threshold {
                chunk.active = false;
            }
        }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Put every chunk to sleep (fresh grid).
    pub fn reset(&mut self, tick: u64) {
        self.tick = tick;
        self.chunks.fill(Chunk::default());
    }

    /// Force every chunk awake, e.g. after a global setting change.
    pub fn activate_all(&mut self) {
        let tick = self.tick;
        for chunk in &mut self.chunks {
            chunk.active = true;
            chunk.last_active_tick = tick;
        }
    }
}
