//! WorldCore - one simulated world
//!
//! Owns the grid, chunk activity, material registry and config, and exposes
//! the operations game logic calls: init, material, set/get/clear, fill,
//! circle, explode and update. There is no global engine; every call goes
//! through a `WorldCore` handle.
//!
//! Coordinates passed to commands are world units; `cell_size` world units
//! map to one cell (floor division).

use crate::chunks::ChunkGrid;
use crate::config::SimConfig;
use crate::domain::material::{MaterialId, MaterialProps};
use crate::domain::reactions::ReactionRule;
use crate::domain::registry::MaterialRegistry;
use crate::error::EngineResult;
use crate::grid::Grid;
use crate::systems::behaviors::BehaviorRegistry;
use crate::systems::extension::CellExtension;
use crate::systems::random::CellRng;
use crate::systems::PassContext;

#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "commands/explosion.rs"]
mod explosion;
#[path = "step/step.rs"]
mod step;
#[path = "snapshot/snapshot.rs"]
mod snapshot;
#[path = "stats/tick_stats.rs"]
mod tick_stats;
mod facade;

pub use facade::World;
pub use snapshot::Snapshot;
pub use tick_stats::TickStats;

/// The simulation world
pub struct WorldCore {
    registry: MaterialRegistry,
    config: SimConfig,
    grid: Grid,
    chunks: ChunkGrid,
    behaviors: BehaviorRegistry,
    extensions: Vec<Box<dyn CellExtension>>,
    rng: CellRng,

    // World size in world units
    world_width: u32,
    world_height: u32,
    cell_size: u32,

    tick: u64,
    heat_sources: Vec<usize>,
    stats: TickStats,
}

impl WorldCore {
    /// World with the stock materials and default config.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        init::create_world_core(width, height, cell_size, MaterialRegistry::with_defaults(), SimConfig::default())
    }

    pub fn with_registry(width: u32, height: u32, cell_size: u32, registry: MaterialRegistry, config: SimConfig) -> Self {
        init::create_world_core(width, height, cell_size, registry, config)
    }

    /// World with the stock materials and a validated config.
    pub fn with_config(width: u32, height: u32, cell_size: u32, config: SimConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::with_registry(width, height, cell_size, MaterialRegistry::with_defaults(), config))
    }

    /// Reallocate the grid and chunk arrays. Materials, config and extensions survive.
    pub fn init(&mut self, width: u32, height: u32, cell_size: u32) {
        init::reinit(self, width, height, cell_size);
    }

    // === Content ===

    /// Register a material. The reaction table is rebuilt before the next tick.
    pub fn material(&mut self, name: &str, props: MaterialProps) -> EngineResult<MaterialId> {
        self.registry.register(name, props)
    }

    pub fn add_reaction(&mut self, rule: ReactionRule) -> usize {
        self.registry.add_reaction(rule)
    }

    /// Replace the material set with a JSON bundle; the grid is cleared.
    pub fn load_content_bundle_json(&mut self, json: &str) -> EngineResult<()> {
        self.registry = MaterialRegistry::from_bundle_json(json)?;
        self.reset();
        Ok(())
    }

    pub fn content_manifest_json(&self) -> String {
        self.registry.manifest_json()
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn register_extension(&mut self, extension: Box<dyn CellExtension>) {
        log::debug!("registered extension \"{}\"", extension.name());
        self.extensions.push(extension);
    }

    // === Dimensions ===

    /// Grid width in cells
    pub fn width(&self) -> u32 { self.grid.width() }

    /// Grid height in cells
    pub fn height(&self) -> u32 { self.grid.height() }

    pub fn cell_size(&self) -> u32 { self.cell_size }

    pub fn tick(&self) -> u64 { self.tick }

    pub fn grid(&self) -> &Grid { &self.grid }

    pub fn chunks(&self) -> &ChunkGrid { &self.chunks }

    /// Number of non-empty cells.
    pub fn particle_count(&self) -> u32 {
        self.grid.ids.iter().filter(|&&id| id != crate::domain::material::EMPTY).count() as u32
    }

    // === Commands ===

    /// Place `material` at its declared temperature. False when off-grid or unknown.
    pub fn set(&mut self, x: i32, y: i32, material: &str) -> bool {
        commands::set(self, x, y, material, None)
    }

    pub fn set_with_temperature(&mut self, x: i32, y: i32, material: &str, temperature: f32) -> bool {
        commands::set(self, x, y, material, Some(temperature))
    }

    /// Material name at (x, y); `None` for empty cells and off-grid positions.
    ///
    /// Empty is never reported by name: after `set(x, y, "empty")` this
    /// returns `None`. Use [`WorldCore::material_id_at`] to tell an empty
    /// cell from an off-grid one.
    pub fn get(&self, x: i32, y: i32) -> Option<&str> {
        commands::get(self, x, y)
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        commands::clear(self, x, y);
    }

    /// Fill the inclusive rectangle between two corners. Returns cells written.
    pub fn fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, material: &str) -> u32 {
        commands::fill(self, x1, y1, x2, y2, material)
    }

    /// Fill a disc. Returns cells written.
    pub fn circle(&mut self, cx: i32, cy: i32, radius: f32, material: &str) -> u32 {
        commands::circle(self, cx, cy, radius, material)
    }

    /// Blast everything within `radius` outward with `power` (cells of travel
    /// at the center), heat the area and leave fire at its core.
    pub fn explode(&mut self, x: i32, y: i32, radius: f32, power: f32) {
        explosion::explode(self, x, y, radius, power);
    }

    pub fn material_id_at(&self, x: i32, y: i32) -> Option<MaterialId> {
        commands::cell_at(self, x, y).map(|(cx, cy)| self.grid.ids[self.grid.index(cx, cy)])
    }

    pub fn temperature_at(&self, x: i32, y: i32) -> Option<f32> {
        commands::cell_at(self, x, y).map(|(cx, cy)| self.grid.temperature[self.grid.index(cx, cy)])
    }

    pub fn set_temperature(&mut self, x: i32, y: i32, temperature: f32) -> bool {
        commands::set_temperature(self, x, y, temperature)
    }

    /// Empty every cell and rewind the tick counter.
    pub fn reset(&mut self) {
        commands::reset(self);
    }

    // === Simulation ===

    /// Advance one full tick: thermal, movement, reactions, extensions.
    pub fn update(&mut self, dt: f32) {
        step::update(self, dt);
    }

    /// Run `ceil(time_scale)` ticks (capped at `max_substeps`). Returns ticks run.
    pub fn update_scaled(&mut self, dt: f32, time_scale: f32) -> u32 {
        step::update_scaled(self, dt, time_scale)
    }

    pub fn last_tick_stats(&self) -> TickStats {
        self.stats.clone()
    }

    // === Snapshot ===

    pub fn snapshot(&self) -> Snapshot {
        snapshot::capture(self)
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
        snapshot::restore(self, snapshot)
    }

    pub fn snapshot_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn restore_json(&mut self, json: &str) -> EngineResult<()> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(&snapshot)
    }

    // === Settings ===

    pub fn set_ambient_temperature(&mut self, temp: f32) {
        settings::set_ambient_temperature(self, temp);
    }

    pub fn ambient_temperature(&self) -> f32 {
        self.config.ambient_temperature
    }

    pub fn set_wind(&mut self, wind_x: f32) {
        settings::set_wind(self, wind_x);
    }

    pub fn set_chunk_sleeping_enabled(&mut self, enabled: bool) {
        settings::set_chunk_sleeping_enabled(self, enabled);
    }

    pub fn set_inactivity_threshold(&mut self, ticks: u64) {
        settings::set_inactivity_threshold(self, ticks);
    }

    pub fn set_reactions_enabled(&mut self, enabled: bool) {
        self.config.reactions_enabled = enabled;
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.config.transitions_enabled = enabled;
    }

    pub fn set_seed(&mut self, seed: u32) {
        settings::set_seed(self, seed);
    }

    fn context(&mut self, dt: f32) -> PassContext<'_> {
        PassContext {
            grid: &mut self.grid,
            chunks: &mut self.chunks,
            materials: &self.registry,
            config: &self.config,
            rng: self.rng,
            tick: self.tick,
            dt,
        }
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
