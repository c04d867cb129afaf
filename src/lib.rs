//! Sandfall Engine - falling-sand cellular automaton
//!
//! Every cell holds one material; materials move, heat up, change phase and
//! react purely from their declared physical properties.
//!
//! Architecture:
//! - domain/      - Materials, registry, reaction rules, content bundles
//! - spatial/     - SoA grid and chunk activity tracking
//! - systems/     - Thermal, movement, reaction and extension passes
//! - simulation/  - WorldCore: commands, tick orchestration, snapshots,
//!                  and the wasm-bindgen `World` facade

pub mod config;
pub mod error;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

pub use spatial::chunks;
pub use spatial::grid;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"Sandfall engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use config::SimConfig;
pub use domain::material::{Material, MaterialId, MaterialProps, MaterialState, MaterialTags, EMPTY};
pub use domain::reactions::{MaterialMatcher, ReactionRule};
pub use domain::registry::MaterialRegistry;
pub use error::{EngineError, EngineResult};
pub use simulation::{Snapshot, TickStats, World, WorldCore};
pub use systems::extension::{CellExtension, ExtensionContext};
