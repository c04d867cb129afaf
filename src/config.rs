//! Simulation tunables.
//!
//! Every field has a default, so a config document only needs to name the
//! values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Temperature every cell decays toward (°C).
    pub ambient_temperature: f32,
    /// A cell this far from ambient counts as a heat source.
    pub heat_source_threshold: f32,
    /// Global multiplier on diffusion (per second).
    pub diffusion_rate: f32,
    /// Exponential decay constant toward ambient (per second).
    pub cooling_rate: f32,
    /// Degrees above the source threshold needed for each extra cell of heat radius.
    pub heat_radius_step: f32,
    pub max_heat_radius: u32,
    /// Temperatures closer than this to ambient snap to ambient.
    pub temperature_epsilon: f32,
    pub min_temperature: f32,
    pub max_temperature: f32,
    /// Per-tick probability for reaction rules that do not declare one.
    pub reaction_probability: f32,
    /// Ticks without activity before a chunk goes to sleep.
    pub inactivity_threshold: u64,
    pub chunk_sleeping_enabled: bool,
    /// Horizontal wind bias for gases, -1 (left) to 1 (right).
    pub wind_x: f32,
    pub max_substeps: u32,
    pub seed: u32,
    pub reactions_enabled: bool,
    /// Phase changes, ignition and lifetime decay.
    pub transitions_enabled: bool,
    /// Heat added at the center of an explosion.
    pub explosion_heat: f32,
    /// Fraction of the blast radius filled with fire.
    pub explosion_fire_fraction: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ambient_temperature: 20.0,
            heat_source_threshold: 50.0,
            diffusion_rate: 1.0,
            cooling_rate: 0.05,
            heat_radius_step: 400.0,
            max_heat_radius: 3,
            temperature_epsilon: 0.05,
            min_temperature: -273.15,
            max_temperature: 10_000.0,
            reaction_probability: 0.05,
            inactivity_threshold: 30,
            chunk_sleeping_enabled: true,
            wind_x: 0.0,
            max_substeps: 10,
            seed: 12345,
            reactions_enabled: true,
            transitions_enabled: true,
            explosion_heat: 800.0,
            explosion_fire_fraction: 0.4,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let finite = [
            ("ambient_temperature", self.ambient_temperature),
            ("heat_source_threshold", self.heat_source_threshold),
            ("diffusion_rate", self.diffusion_rate),
            ("cooling_rate", self.cooling_rate),
            ("heat_radius_step", self.heat_radius_step),
            ("temperature_epsilon", self.temperature_epsilon),
            ("min_temperature", self.min_temperature),
            ("max_temperature", self.max_temperature),
            ("reaction_probability", self.reaction_probability),
            ("wind_x", self.wind_x),
            ("explosion_heat", self.explosion_heat),
            ("explosion_fire_fraction", self.explosion_fire_fraction),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(EngineError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if self.min_temperature >= self.max_temperature {
            return Err(EngineError::InvalidConfig(
                "min_temperature must be below max_temperature".to_string(),
            ));
        }
        if !(self.min_temperature..=self.max_temperature).contains(&self.ambient_temperature) {
            return Err(EngineError::InvalidConfig(
                "ambient_temperature outside the temperature range".to_string(),
            ));
        }
        if self.diffusion_rate < 0.0 || self.cooling_rate < 0.0 || self.heat_radius_step <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "diffusion_rate and cooling_rate must be >= 0, heat_radius_step > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reaction_probability)
            || !(0.0..=1.0).contains(&self.explosion_fire_fraction)
        {
            return Err(EngineError::InvalidConfig(
                "probabilities and fractions must lie in 0..=1".to_string(),
            ));
        }
        if self.max_substeps == 0 {
            return Err(EngineError::InvalidConfig("max_substeps must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Clamp a temperature into the configured physical range.
    #[inline]
    pub fn clamp_temperature(&self, t: f32) -> f32 {
        t.clamp(self.min_temperature, self.max_temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "inactivity_threshold": 5, "wind_x": 0.5 }"#)
            .expect("config should parse");
        assert_eq!(config.inactivity_threshold, 5);
        assert_eq!(config.wind_x, 0.5);
        assert_eq!(config.ambient_temperature, 20.0);
        assert_eq!(config.seed, 12345);
    }

    #[test]
    fn rejects_inverted_temperature_range() {
        let err = SimConfig::from_json(r#"{ "min_temperature": 100, "max_temperature": 0 }"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = SimConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::Content(_)));
    }
}
