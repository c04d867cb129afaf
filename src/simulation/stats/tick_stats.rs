use wasm_bindgen::prelude::*;

/// Counters from the most recent tick.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub(super) heat_sources: u32,
    pub(super) transitions: u32,
    pub(super) cells_moved: u32,
    pub(super) reactions_applied: u32,
    pub(super) reaction_failures: u32,
    pub(super) extension_cells: u32,
    pub(super) extension_failures: u32,
    pub(super) active_chunks: u32,
}

#[wasm_bindgen]
impl TickStats {
    #[wasm_bindgen(getter)]
    pub fn heat_sources(&self) -> u32 { self.heat_sources }
    #[wasm_bindgen(getter)]
    pub fn transitions(&self) -> u32 { self.transitions }
    #[wasm_bindgen(getter)]
    pub fn cells_moved(&self) -> u32 { self.cells_moved }
    #[wasm_bindgen(getter)]
    pub fn reactions_applied(&self) -> u32 { self.reactions_applied }
    /// Reactions whose result material could not be resolved.
    #[wasm_bindgen(getter)]
    pub fn reaction_failures(&self) -> u32 { self.reaction_failures }
    #[wasm_bindgen(getter)]
    pub fn extension_cells(&self) -> u32 { self.extension_cells }
    /// Extension calls that panicked.
    #[wasm_bindgen(getter)]
    pub fn extension_failures(&self) -> u32 { self.extension_failures }
    #[wasm_bindgen(getter)]
    pub fn active_chunks(&self) -> u32 { self.active_chunks }
}
