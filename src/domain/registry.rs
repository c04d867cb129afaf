//! MaterialRegistry - flat per-id property arrays plus the compiled reaction table.
//!
//! Registration appends to the arrays and marks the derived tables stale;
//! `ensure_compiled` rebuilds them before the next tick reads them.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};

use super::material::{
    Material, MaterialId, MaterialProps, MaterialState, EMPTY, EMPTY_NAME, MAX_MATERIALS,
};
use super::reactions::{CompiledReaction, ReactionRule, ResultId};

pub const REACTION_LUT_SIZE: usize = MAX_MATERIALS * MAX_MATERIALS;

/// Phase and decay targets resolved to ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transitions {
    pub solid: Option<MaterialId>,
    pub liquid: Option<MaterialId>,
    pub gas: Option<MaterialId>,
    pub burns_to: Option<MaterialId>,
    /// Always resolves: empty when the material names none.
    pub decays_to: MaterialId,
}

#[derive(Clone)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,

    // Hot-path SoA, indexed by id
    state: Vec<MaterialState>,
    density: Vec<f32>,
    conductivity: Vec<f32>,
    flammability: Vec<f32>,
    viscosity: Vec<f32>,
    friction: Vec<f32>,
    heat_emission: Vec<f32>,
    melting_point: Vec<Option<f32>>,
    boiling_point: Vec<Option<f32>>,
    ignition_point: Vec<Option<f32>>,
    dispersion: Vec<u8>,
    lifetime: Vec<u16>,
    spawn_temperature: Vec<Option<f32>>,

    rules: Vec<ReactionRule>,

    // Derived by `compile`
    transitions: Vec<Transitions>,
    reaction_lut: Vec<Option<u16>>,
    reactions: Vec<CompiledReaction>,
    compiled: bool,
}

impl MaterialRegistry {
    /// Registry holding only the empty material.
    pub fn new() -> Self {
        let mut registry = Self {
            materials: Vec::new(),
            by_name: HashMap::new(),
            state: Vec::new(),
            density: Vec::new(),
            conductivity: Vec::new(),
            flammability: Vec::new(),
            viscosity: Vec::new(),
            friction: Vec::new(),
            heat_emission: Vec::new(),
            melting_point: Vec::new(),
            boiling_point: Vec::new(),
            ignition_point: Vec::new(),
            dispersion: Vec::new(),
            lifetime: Vec::new(),
            spawn_temperature: Vec::new(),
            rules: Vec::new(),
            transitions: Vec::new(),
            reaction_lut: Vec::new(),
            reactions: Vec::new(),
            compiled: false,
        };
        // Air: diffuses heat, never moves or transitions.
        let air = MaterialProps {
            state: MaterialState::Gas,
            thermal_conductivity: 0.05,
            colors: vec![0xFF0A0A0A],
            ..MaterialProps::default()
        };
        registry.push(EMPTY_NAME.to_string(), air);
        registry
    }

    /// Registry with the stock material set and reaction rules.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        if let Err(err) = super::defaults::install(&mut registry) {
            log::error!("default material set incomplete: {err}");
        }
        registry
    }

    /// Register a material and return its id. Ids are sequential from 1.
    pub fn register(&mut self, name: &str, props: MaterialProps) -> EngineResult<MaterialId> {
        if self.by_name.contains_key(name) {
            return Err(EngineError::DuplicateMaterial(name.to_string()));
        }
        if self.materials.len() >= MAX_MATERIALS {
            return Err(EngineError::MaterialIdSpaceExhausted {
                name: name.to_string(),
                max: MAX_MATERIALS,
            });
        }
        if self.compiled {
            log::debug!("material \"{name}\" registered after compile; tables will be rebuilt");
        }
        let id = self.push(name.to_string(), props.sanitized());
        log::debug!("registered material \"{name}\" as id {id}");
        Ok(id)
    }

    fn push(&mut self, name: String, props: MaterialProps) -> MaterialId {
        let id = self.materials.len() as MaterialId;
        self.state.push(props.state);
        self.density.push(props.density);
        self.conductivity.push(props.thermal_conductivity);
        self.flammability.push(props.flammability);
        self.viscosity.push(props.viscosity);
        self.friction.push(props.friction);
        self.heat_emission.push(props.heat_emission);
        self.melting_point.push(props.melting_point);
        self.boiling_point.push(props.boiling_point);
        self.ignition_point.push(props.ignition_point);
        self.dispersion.push(props.dispersion);
        self.lifetime.push(props.lifetime);
        self.spawn_temperature.push(props.temperature);
        self.by_name.insert(name.clone(), id);
        self.materials.push(Material { id, name, props });
        self.compiled = false;
        id
    }

    /// Add a reaction rule. Names are resolved when the table is compiled.
    pub fn add_reaction(&mut self, rule: ReactionRule) -> usize {
        self.rules.push(rule);
        self.compiled = false;
        self.rules.len() - 1
    }

    // === Lookup (setup paths) ===

    pub fn id(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    pub fn require(&self, name: &str) -> EngineResult<MaterialId> {
        self.id(name)
            .ok_or_else(|| EngineError::UnknownMaterial(name.to_string()))
    }

    pub fn name(&self, id: MaterialId) -> Option<&str> {
        self.materials.get(id as usize).map(|m| m.name.as_str())
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id as usize)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    #[inline]
    pub fn is_valid(&self, id: MaterialId) -> bool {
        (id as usize) < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.len() <= 1
    }

    // === Hot-path property arrays ===

    #[inline]
    pub fn state(&self, id: MaterialId) -> MaterialState {
        self.state[id as usize]
    }

    #[inline]
    pub fn density(&self, id: MaterialId) -> f32 {
        self.density[id as usize]
    }

    #[inline]
    pub fn conductivity(&self, id: MaterialId) -> f32 {
        self.conductivity[id as usize]
    }

    #[inline]
    pub fn flammability(&self, id: MaterialId) -> f32 {
        self.flammability[id as usize]
    }

    #[inline]
    pub fn viscosity(&self, id: MaterialId) -> f32 {
        self.viscosity[id as usize]
    }

    #[inline]
    pub fn friction(&self, id: MaterialId) -> f32 {
        self.friction[id as usize]
    }

    #[inline]
    pub fn heat_emission(&self, id: MaterialId) -> f32 {
        self.heat_emission[id as usize]
    }

    #[inline]
    pub fn melting_point(&self, id: MaterialId) -> Option<f32> {
        self.melting_point[id as usize]
    }

    #[inline]
    pub fn boiling_point(&self, id: MaterialId) -> Option<f32> {
        self.boiling_point[id as usize]
    }

    #[inline]
    pub fn ignition_point(&self, id: MaterialId) -> Option<f32> {
        self.ignition_point[id as usize]
    }

    #[inline]
    pub fn dispersion(&self, id: MaterialId) -> u8 {
        self.dispersion[id as usize]
    }

    #[inline]
    pub fn lifetime(&self, id: MaterialId) -> u16 {
        self.lifetime[id as usize]
    }

    /// Temperature a freshly placed cell of `id` starts at.
    #[inline]
    pub fn spawn_temperature(&self, id: MaterialId, ambient: f32) -> f32 {
        self.spawn_temperature[id as usize].unwrap_or(ambient)
    }

    /// Declared spawn temperature, if any.
    #[inline]
    pub fn declared_temperature(&self, id: MaterialId) -> Option<f32> {
        self.spawn_temperature[id as usize]
    }

    #[inline]
    pub fn transitions(&self, id: MaterialId) -> Transitions {
        self.transitions.get(id as usize).copied().unwrap_or_default()
    }

    /// Compiled reaction for `source` reacting into its neighbor `target`.
    #[inline]
    pub fn reaction(&self, source: MaterialId, target: MaterialId) -> Option<&CompiledReaction> {
        let slot = self.reaction_lut.get(reaction_index(source, target))?;
        slot.map(|i| &self.reactions[i as usize])
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Rebuild derived tables if a material or rule was added since the last build.
    pub fn ensure_compiled(&mut self) {
        if !self.compiled {
            self.compile();
        }
    }

    /// Resolve transition names and build the dense reaction table.
    pub fn compile(&mut self) {
        self.transitions = self
            .materials
            .iter()
            .map(|m| self.resolve_transitions(m))
            .collect();

        let mut reactions = Vec::new();
        for (rule_index, rule) in self.rules.iter().enumerate() {
            let lookup = |n: &str| self.id(n);
            let forward = CompiledReaction {
                rule_index,
                source_result: ResultId::resolve(rule.source_becomes.as_deref(), lookup),
                target_result: ResultId::resolve(rule.target_becomes.as_deref(), lookup),
                source_heat: rule.source_heat,
                target_heat: rule.target_heat,
                probability: rule.probability,
            };
            let mirrored = CompiledReaction {
                rule_index,
                source_result: forward.target_result.clone(),
                target_result: forward.source_result.clone(),
                source_heat: rule.target_heat,
                target_heat: rule.source_heat,
                probability: rule.probability,
            };
            for (side, compiled) in [("source", &forward.source_result), ("target", &forward.target_result)] {
                if let ResultId::Unresolved(name) = compiled {
                    log::warn!(
                        "reaction \"{}\": {side} result \"{name}\" is not a registered material",
                        rule.name
                    );
                }
            }
            reactions.push(forward);
            reactions.push(mirrored);
        }

        let mut lut = vec![None; REACTION_LUT_SIZE];
        let mut live_pairs = 0usize;
        for a in &self.materials {
            for b in &self.materials {
                let slot = self.rules.iter().enumerate().find_map(|(i, rule)| {
                    if rule.source.matches(a) && rule.target.matches(b) {
                        Some(2 * i)
                    } else if rule.symmetric && rule.source.matches(b) && rule.target.matches(a) {
                        Some(2 * i + 1)
                    } else {
                        None
                    }
                });
                if let Some(slot) = slot {
                    lut[reaction_index(a.id, b.id)] = Some(slot as u16);
                    live_pairs += 1;
                }
            }
        }

        log::info!(
            "compiled {} reaction rules over {} materials ({} reactive pairs)",
            self.rules.len(),
            self.materials.len(),
            live_pairs
        );
        self.reactions = reactions;
        self.reaction_lut = lut;
        self.compiled = true;
    }

    fn resolve_transitions(&self, material: &Material) -> Transitions {
        let resolve = |kind: &str, target: &Option<String>| -> Option<MaterialId> {
            let name = target.as_deref()?;
            let id = self.id(name);
            if id.is_none() {
                log::warn!(
                    "material \"{}\": {kind} \"{name}\" is not registered, transition disabled",
                    material.name
                );
            }
            id
        };
        let props = &material.props;
        Transitions {
            solid: resolve("solid form", &props.solid_form),
            liquid: resolve("liquid form", &props.liquid_form),
            gas: resolve("gas form", &props.gas_form),
            burns_to: resolve("burn product", &props.burns_to),
            decays_to: resolve("decay product", &props.decays_to).unwrap_or(EMPTY),
        }
    }

    /// Parse a JSON content bundle into a fresh registry.
    pub fn from_bundle_json(json: &str) -> EngineResult<Self> {
        super::content::registry_from_bundle_json(json)
    }
}

impl fmt::Debug for MaterialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.materials.iter().map(|m| m.name.as_str()).collect();
        f.debug_struct("MaterialRegistry")
            .field("materials", &names)
            .field("rules", &self.rules.len())
            .field("compiled", &self.compiled)
            .finish_non_exhaustive()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn reaction_index(source: MaterialId, target: MaterialId) -> usize {
    ((source as usize) << 8) | target as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reactions::MaterialMatcher;

    #[test]
    fn empty_is_id_zero_and_ids_are_sequential() {
        let mut registry = MaterialRegistry::new();
        assert_eq!(registry.id(EMPTY_NAME), Some(EMPTY));
        let a = registry.register("a", MaterialProps::default()).unwrap();
        let b = registry.register("b", MaterialProps::default()).unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = MaterialRegistry::new();
        registry.register("sand", MaterialProps::default()).unwrap();
        let err = registry.register("sand", MaterialProps::default()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMaterial(name) if name == "sand"));
    }

    #[test]
    fn id_space_exhaustion_fails_at_registration() {
        let mut registry = MaterialRegistry::new();
        for i in 1..MAX_MATERIALS {
            let id = registry
                .register(&format!("m{i}"), MaterialProps::default())
                .unwrap();
            assert_ne!(id, EMPTY);
        }
        let err = registry.register("overflow", MaterialProps::default()).unwrap_err();
        assert!(matches!(err, EngineError::MaterialIdSpaceExhausted { max: MAX_MATERIALS, .. }));
        assert_eq!(registry.len(), MAX_MATERIALS);
    }

    #[test]
    fn symmetric_rule_fills_both_orders() {
        let mut registry = MaterialRegistry::new();
        let lava = registry.register("lava", MaterialProps::new(MaterialState::Liquid, 3.0)).unwrap();
        let water = registry.register("water", MaterialProps::new(MaterialState::Liquid, 1.0)).unwrap();
        let rock = registry.register("rock", MaterialProps::default()).unwrap();
        registry.add_reaction(
            ReactionRule::new("quench", MaterialMatcher::named("lava"), MaterialMatcher::named("water"))
                .source_becomes("rock")
                .symmetric(),
        );
        registry.compile();

        let forward = registry.reaction(lava, water).expect("lava -> water");
        assert_eq!(forward.source_result, ResultId::Become(rock));
        assert_eq!(forward.target_result, ResultId::Keep);

        let mirrored = registry.reaction(water, lava).expect("water -> lava");
        assert_eq!(mirrored.source_result, ResultId::Keep);
        assert_eq!(mirrored.target_result, ResultId::Become(rock));

        assert!(registry.reaction(water, water).is_none());
        assert!(registry.reaction(lava, EMPTY).is_none());
    }

    #[test]
    fn late_registration_marks_tables_stale() {
        let mut registry = MaterialRegistry::new();
        registry.add_reaction(ReactionRule::new(
            "melt",
            MaterialMatcher::named("hot"),
            MaterialMatcher::Any,
        ));
        registry.compile();
        assert!(registry.is_compiled());

        let hot = registry.register("hot", MaterialProps::default()).unwrap();
        let cold = registry.register("cold", MaterialProps::default()).unwrap();
        assert!(!registry.is_compiled());
        registry.ensure_compiled();
        assert!(registry.reaction(hot, cold).is_some());
    }

    #[test]
    fn unresolved_transition_is_disabled() {
        let mut registry = MaterialRegistry::new();
        let ice = registry
            .register(
                "ice",
                MaterialProps {
                    melting_point: Some(0.0),
                    liquid_form: Some("nothing".to_string()),
                    ..MaterialProps::default()
                },
            )
            .unwrap();
        registry.compile();
        assert_eq!(registry.transitions(ice).liquid, None);
        assert_eq!(registry.transitions(ice).decays_to, EMPTY);
    }

    #[test]
    fn debug_output_names_materials() {
        let mut registry = MaterialRegistry::new();
        registry.register("salt", MaterialProps::default()).unwrap();
        let text = format!("{registry:?}");
        assert!(text.starts_with("MaterialRegistry"));
        assert!(text.contains("\"salt\""));
        assert!(text.contains("rules: 0"));
    }
}
