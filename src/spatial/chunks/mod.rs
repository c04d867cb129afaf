//! Chunk System - activity tracking over fixed-size blocks of cells.
//!
//! A write to a cell wakes its chunk and the 8 around it; a chunk that sees
//! no activity for `inactivity_threshold` ticks goes to sleep and every pass
//! skips it. Activity is never persisted, only re-derived.

mod lifecycle;
mod wake;

/// Chunk size in cells (32x32 is cache-friendly)
pub const CHUNK_SIZE: u32 = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    pub active: bool,
    pub last_active_tick: u64,
}

pub struct ChunkGrid {
    chunks_x: u32,
    chunks_y: u32,
    chunks: Vec<Chunk>,
    tick: u64,
    inactivity_threshold: u64,
    sleeping_enabled: bool,
}

impl ChunkGrid {
    /// Create chunk grid for given grid dimensions (in cells)
    pub fn new(width: u32, height: u32, inactivity_threshold: u64, sleeping_enabled: bool) -> Self {
        let chunks_x = (width + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let chunks_y = (height + CHUNK_SIZE - 1) / CHUNK_SIZE;
        Self {
            chunks_x,
            chunks_y,
            chunks: vec![Chunk::default(); (chunks_x as usize) * (chunks_y as usize)],
            tick: 0,
            inactivity_threshold,
            sleeping_enabled,
        }
    }

    #[inline]
    fn chunk_idx(&self, cx: u32, cy: u32) -> usize {
        (cy as usize) * (self.chunks_x as usize) + cx as usize
    }

    /// Get chunk dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.chunks_x, self.chunks_y)
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, cx: u32, cy: u32) -> Option<Chunk> {
        if cx < self.chunks_x && cy < self.chunks_y {
            Some(self.chunks[self.chunk_idx(cx, cy)])
        } else {
            None
        }
    }

    /// Whether passes should visit this chunk.
    #[inline]
    pub fn is_active(&self, cx: u32, cy: u32) -> bool {
        !self.sleeping_enabled || self.chunks[self.chunk_idx(cx, cy)].active
    }

    #[inline]
    pub fn is_cell_active(&self, x: u32, y: u32) -> bool {
        self.is_active(x / CHUNK_SIZE, y / CHUNK_SIZE)
    }

    /// Number of chunks passes will visit this tick.
    pub fn active_chunk_count(&self) -> usize {
        if !self.sleeping_enabled {
            return self.chunks.len();
        }
        self.chunks.iter().filter(|c| c.active).count()
    }

    pub fn sleeping_enabled(&self) -> bool {
        self.sleeping_enabled
    }

    pub fn set_sleeping_enabled(&mut self, enabled: bool) {
        self.sleeping_enabled = enabled;
    }

    pub fn set_inactivity_threshold(&mut self, ticks: u64) {
        self.inactivity_threshold = ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_round_up() {
        let chunks = ChunkGrid::new(70, 32, 30, true);
        assert_eq!(chunks.dimensions(), (3, 1));
        assert_eq!(chunks.total_chunks(), 3);
        assert_eq!(chunks.active_chunk_count(), 0);
    }

    #[test]
    fn wake_activates_neighborhood_clamped_to_edges() {
        let mut chunks = ChunkGrid::new(96, 96, 30, true);
        chunks.wake(0, 0);
        assert!(chunks.is_active(0, 0));
        assert!(chunks.is_active(1, 0));
        assert!(chunks.is_active(0, 1));
        assert!(chunks.is_active(1, 1));
        assert!(!chunks.is_active(2, 2));
        assert_eq!(chunks.active_chunk_count(), 4);
    }

    #[test]
    fn touch_activates_only_own_chunk() {
        let mut chunks = ChunkGrid::new(96, 96, 30, true);
        chunks.touch(40, 40);
        assert!(chunks.is_active(1, 1));
        assert_eq!(chunks.active_chunk_count(), 1);
    }

    #[test]
    fn chunk_sleeps_after_threshold() {
        let mut chunks = ChunkGrid::new(32, 32, 30, true);
        chunks.wake(5, 5);
        for tick in 1..=30 {
            chunks.begin_tick(tick);
            assert!(chunks.is_active(0, 0), "still active at tick {tick}");
        }
        chunks.begin_tick(31);
        assert!(!chunks.is_active(0, 0));
    }

    #[test]
    fn disabled_sleeping_keeps_everything_active() {
        let mut chunks = ChunkGrid::new(64, 64, 30, false);
        assert_eq!(chunks.active_chunk_count(), 4);
        chunks.begin_tick(1000);
        assert!(chunks.is_active(1, 1));
    }
}
