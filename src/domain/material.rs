//! Material definitions.
//!
//! A material is an immutable bag of physical properties. Behavior is derived
//! from these properties alone; nothing in the simulation special-cases a name.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Material id stored per cell (0 = empty).
pub type MaterialId = u8;

pub const EMPTY: MaterialId = 0;
pub const EMPTY_NAME: &str = "empty";

/// Size of the id space, including the reserved empty id.
pub const MAX_MATERIALS: usize = 256;

/// How a material moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialState {
    /// Never moves on its own (stone, wood, ice)
    #[default]
    Solid,
    /// Falls and piles (sand, dirt)
    Powder,
    /// Falls and spreads sideways (water, oil, lava)
    Liquid,
    /// Rises or sinks by density and drifts with wind (steam, smoke)
    Gas,
}

impl MaterialState {
    /// Liquids and gases can be pushed aside by denser movers.
    #[inline]
    pub fn is_fluid(self) -> bool {
        matches!(self, MaterialState::Liquid | MaterialState::Gas)
    }
}

bitflags! {
    /// Categories reaction rules can match on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MaterialTags: u32 {
        const ORGANIC = 1 << 0;
        const MINERAL = 1 << 1;
        const METALLIC = 1 << 2;
        const CORROSIVE = 1 << 3;
        const HOT = 1 << 4;
        const COLD = 1 << 5;
        const EXPLOSIVE = 1 << 6;
    }
}

/// Declared properties of a material. Anything left out is zero / absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialProps {
    pub state: MaterialState,
    /// Relative density. Negative values make gases rise.
    pub density: f32,
    pub melting_point: Option<f32>,
    pub boiling_point: Option<f32>,
    pub ignition_point: Option<f32>,
    pub thermal_conductivity: f32,
    /// Per-tick chance to ignite once above the ignition point.
    pub flammability: f32,
    /// 0 spreads freely, 1 never spreads sideways.
    pub viscosity: f32,
    /// 0 always slides diagonally, 1 never does.
    pub friction: f32,
    /// Degrees per second added to the cell while it holds this material.
    pub heat_emission: f32,
    /// Cells a liquid may travel sideways per tick.
    pub dispersion: u8,
    /// Ticks before the material decays (0 = never).
    pub lifetime: u16,
    /// Temperature a freshly placed cell starts at (ambient when absent).
    pub temperature: Option<f32>,
    pub solid_form: Option<String>,
    pub liquid_form: Option<String>,
    pub gas_form: Option<String>,
    pub burns_to: Option<String>,
    /// Result of lifetime expiry (empty when absent).
    pub decays_to: Option<String>,
    /// ABGR palette for renderers.
    pub colors: Vec<u32>,
    pub tags: MaterialTags,
}

impl MaterialProps {
    pub fn new(state: MaterialState, density: f32) -> Self {
        Self {
            state,
            density,
            ..Self::default()
        }
    }

    /// Replace non-finite numbers with 0 (or absent) and clamp ratios into 0..=1.
    pub(crate) fn sanitized(mut self) -> Self {
        fn finite_or_zero(v: f32) -> f32 {
            if v.is_finite() { v } else { 0.0 }
        }
        fn finite_opt(v: Option<f32>) -> Option<f32> {
            v.filter(|t| t.is_finite())
        }

        self.density = finite_or_zero(self.density);
        self.thermal_conductivity = finite_or_zero(self.thermal_conductivity).clamp(0.0, 1.0);
        self.flammability = finite_or_zero(self.flammability).clamp(0.0, 1.0);
        self.viscosity = finite_or_zero(self.viscosity).clamp(0.0, 1.0);
        self.friction = finite_or_zero(self.friction).clamp(0.0, 1.0);
        self.heat_emission = finite_or_zero(self.heat_emission);
        self.melting_point = finite_opt(self.melting_point);
        self.boiling_point = finite_opt(self.boiling_point);
        self.ignition_point = finite_opt(self.ignition_point);
        self.temperature = finite_opt(self.temperature);
        self
    }
}

/// A registered material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub props: MaterialProps,
}

impl Material {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY
    }

    #[inline]
    pub fn state(&self) -> MaterialState {
        self.props.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let props: MaterialProps = serde_json::from_str(r#"{ "state": "liquid" }"#)
            .expect("props should parse");
        assert_eq!(props.state, MaterialState::Liquid);
        assert_eq!(props.density, 0.0);
        assert_eq!(props.viscosity, 0.0);
        assert_eq!(props.melting_point, None);
        assert!(props.tags.is_empty());
    }

    #[test]
    fn camel_case_fields_and_tags_parse() {
        let props: MaterialProps = serde_json::from_str(
            r#"{ "state": "powder", "meltingPoint": 1700, "liquidForm": "lava", "tags": "MINERAL | HOT" }"#,
        )
        .expect("props should parse");
        assert_eq!(props.melting_point, Some(1700.0));
        assert_eq!(props.liquid_form.as_deref(), Some("lava"));
        assert!(props.tags.contains(MaterialTags::MINERAL | MaterialTags::HOT));
    }

    #[test]
    fn sanitize_removes_nan() {
        let props = MaterialProps {
            density: f32::NAN,
            friction: 3.0,
            melting_point: Some(f32::INFINITY),
            ..MaterialProps::default()
        }
        .sanitized();
        assert_eq!(props.density, 0.0);
        assert_eq!(props.friction, 1.0);
        assert_eq!(props.melting_point, None);
    }
}
