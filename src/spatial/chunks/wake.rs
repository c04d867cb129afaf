use super::*;

impl ChunkGrid {
    #[inline]
    fn refresh(&mut self, cx: u32, cy: u32) {
        let idx = self.chunk_idx(cx, cy);
        let tick = self.tick;
        let chunk = &mut self.chunks[idx];
        chunk.active = true;
        chunk.last_active_tick = tick;
    }

    /// Refresh the chunk holding cell (x, y) without waking neighbors.
    /// Used when only that cell's own state changed or was rolled on.
    #[inline]
    pub fn touch(&mut self, x: u32, y: u32) {
        self.refresh(x / CHUNK_SIZE, y / CHUNK_SIZE);
    }

    /// Wake the chunk holding cell (x, y) and its 8 neighbors, so effects that
    /// cross a chunk boundary are picked up next to it.
    pub fn wake(&mut self, x: u32, y: u32) {
        let cx = x / CHUNK_SIZE;
        let cy = y / CHUNK_SIZE;
        let x0 = cx.saturating_sub(1);
        let y0 = cy.saturating_sub(1);
        let x1 = (cx + 1).min(self.chunks_x - 1);
        let y1 = (cy + 1).min(self.chunks_y - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                self.refresh(nx, ny);
            }
        }
    }
}
