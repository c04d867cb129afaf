use crate::chunks::ChunkGrid;
use crate::config::SimConfig;
use crate::domain::registry::MaterialRegistry;
use crate::grid::Grid;
use crate::systems::behaviors::BehaviorRegistry;
use crate::systems::random::CellRng;

use super::tick_stats::TickStats;
use super::WorldCore;

/// Grid size in cells for a world of `width` x `height` units.
pub(super) fn cell_dimensions(width: u32, height: u32, cell_size: u32) -> (u32, u32) {
    (width / cell_size, height / cell_size)
}

fn checked_cell_size(cell_size: u32) -> u32 {
    if cell_size == 0 {
        log::warn!("cell size 0 is not usable; using 1");
        1
    } else {
        cell_size
    }
}

pub(super) fn create_world_core(
    width: u32,
    height: u32,
    cell_size: u32,
    mut registry: MaterialRegistry,
    config: SimConfig,
) -> WorldCore {
    let cell_size = checked_cell_size(cell_size);
    let (cells_w, cells_h) = cell_dimensions(width, height, cell_size);
    registry.ensure_compiled();
    log::info!(
        "world {}x{} units -> {}x{} cells ({} materials)",
        width,
        height,
        cells_w,
        cells_h,
        registry.len()
    );

    let mut chunks = ChunkGrid::new(
        cells_w,
        cells_h,
        config.inactivity_threshold,
        config.chunk_sleeping_enabled,
    );
    chunks.reset(0);

    WorldCore {
        grid: Grid::new(cells_w, cells_h, config.ambient_temperature),
        chunks,
        behaviors: BehaviorRegistry::new(),
        extensions: Vec::new(),
        rng: CellRng::new(config.seed),
        world_width: width,
        world_height: height,
        cell_size,
        tick: 0,
        heat_sources: Vec::with_capacity(256),
        stats: TickStats::default(),
        registry,
        config,
    }
}

pub(super) fn reinit(world: &mut WorldCore, width: u32, height: u32, cell_size: u32) {
    let cell_size = checked_cell_size(cell_size);
    let (cells_w, cells_h) = cell_dimensions(width, height, cell_size);
    world.grid = Grid::new(cells_w, cells_h, world.config.ambient_temperature);
    world.chunks = ChunkGrid::new(
        cells_w,
        cells_h,
        world.config.inactivity_threshold,
        world.config.chunk_sleeping_enabled,
    );
    world.world_width = width;
    world.world_height = height;
    world.cell_size = cell_size;
    world.tick = 0;
    world.heat_sources.clear();
    world.stats = TickStats::default();
    log::info!("world reinitialized to {}x{} cells", cells_w, cells_h);
}
