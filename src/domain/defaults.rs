//! Stock material set.
//!
//! Colors are ABGR (0xAABBGGRR) so renderers can copy them straight into
//! canvas image data.

use crate::error::EngineResult;

use super::material::{MaterialProps, MaterialState, MaterialTags};
use super::reactions::{MaterialMatcher, ReactionRule};
use super::registry::MaterialRegistry;

fn name(n: &str) -> Option<String> {
    Some(n.to_string())
}

pub(crate) fn install(registry: &mut MaterialRegistry) -> EngineResult<()> {
    use MaterialState::*;

    registry.register("stone", MaterialProps {
        state: Solid,
        density: 5.0,
        melting_point: Some(1000.0),
        liquid_form: name("lava"),
        thermal_conductivity: 0.3,
        colors: vec![0xFF808080, 0xFF757575, 0xFF8A8A8A],
        tags: MaterialTags::MINERAL,
        ..MaterialProps::default()
    })?;

    registry.register("sand", MaterialProps {
        state: Powder,
        density: 3.0,
        melting_point: Some(1700.0),
        liquid_form: name("lava"),
        thermal_conductivity: 0.2,
        friction: 0.3,
        colors: vec![0xFF6EC2E6, 0xFF64B8DC, 0xFF78CCF0],
        tags: MaterialTags::MINERAL,
        ..MaterialProps::default()
    })?;

    registry.register("dirt", MaterialProps {
        state: Powder,
        density: 2.5,
        thermal_conductivity: 0.15,
        friction: 0.6,
        colors: vec![0xFF2D5A8B, 0xFF26507D],
        tags: MaterialTags::MINERAL,
        ..MaterialProps::default()
    })?;

    registry.register("gunpowder", MaterialProps {
        state: Powder,
        density: 2.2,
        ignition_point: Some(150.0),
        burns_to: name("fire"),
        thermal_conductivity: 0.2,
        flammability: 0.9,
        friction: 0.4,
        colors: vec![0xFF3C3C46, 0xFF32323C],
        tags: MaterialTags::EXPLOSIVE,
        ..MaterialProps::default()
    })?;

    registry.register("water", MaterialProps {
        state: Liquid,
        density: 1.0,
        melting_point: Some(0.0),
        boiling_point: Some(100.0),
        solid_form: name("ice"),
        gas_form: name("steam"),
        thermal_conductivity: 0.2,
        viscosity: 0.1,
        dispersion: 5,
        colors: vec![0xFFE08C3C, 0xFFEA9644],
        ..MaterialProps::default()
    })?;

    registry.register("oil", MaterialProps {
        state: Liquid,
        density: 0.8,
        ignition_point: Some(200.0),
        burns_to: name("fire"),
        thermal_conductivity: 0.15,
        flammability: 0.6,
        viscosity: 0.3,
        dispersion: 3,
        colors: vec![0xFF1E2A3C],
        tags: MaterialTags::ORGANIC,
        ..MaterialProps::default()
    })?;

    registry.register("lava", MaterialProps {
        state: Liquid,
        density: 3.0,
        melting_point: Some(1000.0),
        solid_form: name("stone"),
        thermal_conductivity: 0.25,
        viscosity: 0.8,
        dispersion: 2,
        temperature: Some(1400.0),
        colors: vec![0xFF0050FF, 0xFF0064FF, 0xFF003CE6],
        tags: MaterialTags::HOT,
        ..MaterialProps::default()
    })?;

    registry.register("acid", MaterialProps {
        state: Liquid,
        density: 1.1,
        thermal_conductivity: 0.2,
        viscosity: 0.2,
        dispersion: 4,
        colors: vec![0xFF32FF8C],
        tags: MaterialTags::CORROSIVE,
        ..MaterialProps::default()
    })?;

    registry.register("ice", MaterialProps {
        state: Solid,
        density: 0.9,
        melting_point: Some(0.0),
        liquid_form: name("water"),
        thermal_conductivity: 0.5,
        temperature: Some(-10.0),
        colors: vec![0xFFFFE6C8],
        tags: MaterialTags::COLD,
        ..MaterialProps::default()
    })?;

    registry.register("obsidian", MaterialProps {
        state: Solid,
        density: 5.0,
        melting_point: Some(1000.0),
        liquid_form: name("lava"),
        thermal_conductivity: 0.3,
        colors: vec![0xFF2D1E28],
        tags: MaterialTags::MINERAL,
        ..MaterialProps::default()
    })?;

    registry.register("wood", MaterialProps {
        state: Solid,
        density: 0.7,
        ignition_point: Some(300.0),
        burns_to: name("fire"),
        thermal_conductivity: 0.1,
        flammability: 0.4,
        colors: vec![0xFF13458B, 0xFF0F3C7A],
        tags: MaterialTags::ORGANIC,
        ..MaterialProps::default()
    })?;

    registry.register("steam", MaterialProps {
        state: Gas,
        density: -1.0,
        boiling_point: Some(100.0),
        liquid_form: name("water"),
        thermal_conductivity: 0.2,
        temperature: Some(110.0),
        colors: vec![0xC8DCDCDC],
        ..MaterialProps::default()
    })?;

    registry.register("smoke", MaterialProps {
        state: Gas,
        density: -0.5,
        thermal_conductivity: 0.1,
        lifetime: 90,
        colors: vec![0xB4464646],
        ..MaterialProps::default()
    })?;

    registry.register("fire", MaterialProps {
        state: Gas,
        density: -2.0,
        thermal_conductivity: 0.5,
        heat_emission: 300.0,
        lifetime: 30,
        decays_to: name("smoke"),
        temperature: Some(800.0),
        colors: vec![0xFF0050FF, 0xFF00A0FF, 0xFF00DCFF],
        tags: MaterialTags::HOT,
        ..MaterialProps::default()
    })?;

    registry.add_reaction(
        ReactionRule::new("quench", MaterialMatcher::named("lava"), MaterialMatcher::named("water"))
            .source_becomes("obsidian")
            .target_becomes("steam")
            .heat(-1000.0, 0.0)
            .probability(0.3)
            .symmetric(),
    );
    registry.add_reaction(
        ReactionRule::new("douse", MaterialMatcher::named("water"), MaterialMatcher::named("fire"))
            .target_becomes("steam")
            .probability(0.3)
            .symmetric(),
    );
    registry.add_reaction(
        ReactionRule::new("spread fire", MaterialMatcher::named("fire"), MaterialMatcher::Flammable)
            .target_becomes("fire")
            .probability(0.1),
    );
    registry.add_reaction(
        ReactionRule::new(
            "scorch",
            MaterialMatcher::named("lava"),
            MaterialMatcher::Tagged { tags: MaterialTags::ORGANIC },
        )
        .target_becomes("fire")
        .probability(0.1),
    );
    registry.add_reaction(
        ReactionRule::new(
            "corrode",
            MaterialMatcher::Tagged { tags: MaterialTags::CORROSIVE },
            MaterialMatcher::Tagged { tags: MaterialTags::MINERAL },
        )
        .source_becomes("empty")
        .target_becomes("empty"),
    );

    registry.compile();
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::material::EMPTY;
    use crate::domain::reactions::ResultId;
    use crate::domain::registry::MaterialRegistry;

    #[test]
    fn defaults_resolve_every_transition() {
        let registry = MaterialRegistry::with_defaults();
        assert!(registry.is_compiled());
        let water = registry.id("water").unwrap();
        let t = registry.transitions(water);
        assert_eq!(t.solid, registry.id("ice"));
        assert_eq!(t.gas, registry.id("steam"));
        let fire = registry.id("fire").unwrap();
        assert_eq!(registry.transitions(fire).decays_to, registry.id("smoke").unwrap());
        let smoke = registry.id("smoke").unwrap();
        assert_eq!(registry.transitions(smoke).decays_to, EMPTY);
    }

    #[test]
    fn quench_is_reachable_from_both_sides() {
        let registry = MaterialRegistry::with_defaults();
        let lava = registry.id("lava").unwrap();
        let water = registry.id("water").unwrap();
        let obsidian = registry.id("obsidian").unwrap();
        let steam = registry.id("steam").unwrap();

        let r = registry.reaction(lava, water).unwrap();
        assert_eq!(r.source_result, ResultId::Become(obsidian));
        assert_eq!(r.target_result, ResultId::Become(steam));
        let r = registry.reaction(water, lava).unwrap();
        assert_eq!(r.source_result, ResultId::Become(steam));
        assert_eq!(r.target_result, ResultId::Become(obsidian));
    }

    #[test]
    fn fire_spreads_only_into_flammables() {
        let registry = MaterialRegistry::with_defaults();
        let fire = registry.id("fire").unwrap();
        assert!(registry.reaction(fire, registry.id("wood").unwrap()).is_some());
        assert!(registry.reaction(fire, registry.id("stone").unwrap()).is_none());
        assert!(registry.reaction(fire, EMPTY).is_none());
    }
}
