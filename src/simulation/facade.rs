use wasm_bindgen::prelude::*;

use crate::domain::material::MaterialProps;
use crate::domain::reactions::ReactionRule;
use crate::error::EngineError;

use super::{TickStats, WorldCore};

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create a world of `width` x `height` world units with the stock materials
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            core: WorldCore::new(width, height, cell_size),
        }
    }

    /// Reallocate the grid; registered materials are kept
    pub fn init(&mut self, width: u32, height: u32, cell_size: u32) {
        self.core.init(width, height, cell_size);
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 { self.core.width() }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 { self.core.height() }

    #[wasm_bindgen(getter)]
    pub fn cell_size(&self) -> u32 { self.core.cell_size() }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.core.particle_count() }

    #[wasm_bindgen(getter)]
    pub fn tick(&self) -> u64 { self.core.tick() }

    // === Content ===

    /// Register a material from a JSON property object. Returns its id.
    pub fn material(&mut self, name: String, props_json: String) -> Result<u8, JsValue> {
        let props: MaterialProps = serde_json::from_str(&props_json).map_err(|e| to_js(e.into()))?;
        self.core.material(&name, props).map_err(to_js)
    }

    /// Add a reaction rule from JSON. Returns its index.
    pub fn add_reaction(&mut self, rule_json: String) -> Result<u32, JsValue> {
        let rule: ReactionRule = serde_json::from_str(&rule_json).map_err(|e| to_js(e.into()))?;
        Ok(self.core.add_reaction(rule) as u32)
    }

    pub fn load_content_bundle(&mut self, json: String) -> Result<(), JsValue> {
        self.core.load_content_bundle_json(&json).map_err(to_js)
    }

    pub fn get_content_manifest_json(&self) -> String {
        self.core.content_manifest_json()
    }

    // === Commands ===

    /// Place a material; `temperature` overrides its declared one
    pub fn set(&mut self, x: i32, y: i32, material: String, temperature: Option<f32>) -> bool {
        match temperature {
            Some(t) => self.core.set_with_temperature(x, y, &material, t),
            None => self.core.set(x, y, &material),
        }
    }

    /// Material name at (x, y), `undefined` when empty or off-grid.
    /// Setting `"empty"` reads back as `undefined` too.
    pub fn get(&self, x: i32, y: i32) -> Option<String> {
        self.core.get(x, y).map(str::to_owned)
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        self.core.clear(x, y);
    }

    pub fn fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, material: String) -> u32 {
        self.core.fill(x1, y1, x2, y2, &material)
    }

    pub fn circle(&mut self, cx: i32, cy: i32, radius: f32, material: String) -> u32 {
        self.core.circle(cx, cy, radius, &material)
    }

    pub fn explode(&mut self, x: i32, y: i32, radius: f32, power: f32) {
        self.core.explode(x, y, radius, power);
    }

    pub fn temperature_at(&self, x: i32, y: i32) -> Option<f32> {
        self.core.temperature_at(x, y)
    }

    pub fn set_temperature(&mut self, x: i32, y: i32, temperature: f32) -> bool {
        self.core.set_temperature(x, y, temperature)
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.core.reset();
    }

    // === Simulation ===

    /// Step the simulation forward by one tick
    pub fn update(&mut self, dt: f32) {
        self.core.update(dt);
    }

    /// Run several ticks for fast-forward. Returns ticks run.
    pub fn update_scaled(&mut self, dt: f32, time_scale: f32) -> u32 {
        self.core.update_scaled(dt, time_scale)
    }

    pub fn get_tick_stats(&self) -> TickStats {
        self.core.last_tick_stats()
    }

    // === Snapshot ===

    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.core.snapshot_json().map_err(to_js)
    }

    pub fn restore(&mut self, json: String) -> Result<(), JsValue> {
        self.core.restore_json(&json).map_err(to_js)
    }

    // === Render views ===

    /// Copy of the material id per cell, row-major
    pub fn material_ids(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.core.grid().ids.as_slice())
    }

    /// Copy of the temperature per cell, row-major
    pub fn temperatures(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.core.grid().temperature.as_slice())
    }

    // === Settings ===

    pub fn set_ambient_temperature(&mut self, temp: f32) {
        self.core.set_ambient_temperature(temp);
    }

    pub fn get_ambient_temperature(&self) -> f32 {
        self.core.ambient_temperature()
    }

    pub fn set_wind(&mut self, wind_x: f32) {
        self.core.set_wind(wind_x);
    }

    /// Enable/disable sleeping of idle chunks (perf/debug toggle).
    pub fn set_chunk_sleeping_enabled(&mut self, enabled: bool) {
        self.core.set_chunk_sleeping_enabled(enabled);
    }

    pub fn set_reactions_enabled(&mut self, enabled: bool) {
        self.core.set_reactions_enabled(enabled);
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.core.set_transitions_enabled(enabled);
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.core.set_seed(seed);
    }
}
