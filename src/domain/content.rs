//! JSON content bundles: materials and reaction rules declared as data.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

use super::material::{MaterialId, MaterialProps, MaterialState, EMPTY_NAME};
use super::reactions::ReactionRule;
use super::registry::MaterialRegistry;

#[derive(Debug, Deserialize)]
struct BundleRoot {
    #[serde(default)]
    materials: Vec<BundleMaterial>,
    #[serde(default)]
    reactions: Vec<ReactionRule>,
}

#[derive(Debug, Deserialize)]
struct BundleMaterial {
    name: String,
    #[serde(flatten)]
    props: MaterialProps,
}

/// Renderer-facing summary of a registered material.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifestMaterial {
    pub id: MaterialId,
    pub name: String,
    pub state: MaterialState,
    pub colors: Vec<u32>,
}

pub(crate) fn registry_from_bundle_json(json: &str) -> EngineResult<MaterialRegistry> {
    let bundle: BundleRoot = serde_json::from_str(json)?;
    let mut registry = MaterialRegistry::new();
    apply_bundle(&mut registry, bundle)?;
    registry.compile();
    log::info!(
        "loaded content bundle: {} materials, {} reaction rules",
        registry.len(),
        registry.rules().len()
    );
    Ok(registry)
}

/// Register every material and rule of a bundle into an existing registry.
pub fn extend_from_bundle_json(registry: &mut MaterialRegistry, json: &str) -> EngineResult<()> {
    let bundle: BundleRoot = serde_json::from_str(json)?;
    apply_bundle(registry, bundle)
}

fn apply_bundle(registry: &mut MaterialRegistry, bundle: BundleRoot) -> EngineResult<()> {
    for entry in bundle.materials {
        if entry.name == EMPTY_NAME {
            log::debug!("content bundle redeclares \"{EMPTY_NAME}\"; keeping the built-in");
            continue;
        }
        registry.register(&entry.name, entry.props)?;
    }
    for rule in bundle.reactions {
        registry.add_reaction(rule);
    }
    Ok(())
}

impl MaterialRegistry {
    pub fn manifest(&self) -> Vec<ContentManifestMaterial> {
        self.materials()
            .iter()
            .map(|m| ContentManifestMaterial {
                id: m.id,
                name: m.name.clone(),
                state: m.props.state,
                colors: m.props.colors.clone(),
            })
            .collect()
    }

    pub fn manifest_json(&self) -> String {
        serde_json::to_string(&self.manifest()).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::EMPTY;
    use crate::error::EngineError;

    const BUNDLE: &str = r#"{
        "materials": [
            { "name": "empty" },
            { "name": "salt", "state": "powder", "density": 2.1, "friction": 0.5 },
            { "name": "brine", "state": "liquid", "density": 1.2, "dispersion": 4 }
        ],
        "reactions": [
            {
                "name": "dissolve",
                "source": { "kind": "named", "name": "brine" },
                "target": { "kind": "named", "name": "salt" },
                "targetBecomes": "brine"
            }
        ]
    }"#;

    #[test]
    fn bundle_registers_materials_and_rules() {
        let registry = MaterialRegistry::from_bundle_json(BUNDLE).expect("bundle should parse");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.id("empty"), Some(EMPTY));
        let salt = registry.id("salt").expect("salt registered");
        let brine = registry.id("brine").expect("brine registered");
        assert_eq!(registry.state(salt), MaterialState::Powder);
        assert_eq!(registry.dispersion(brine), 4);
        assert_eq!(registry.viscosity(brine), 0.0);
        assert!(registry.reaction(brine, salt).is_some());
    }

    #[test]
    fn duplicate_in_bundle_is_an_error() {
        let json = r#"{ "materials": [ { "name": "a" }, { "name": "a" } ] }"#;
        let err = MaterialRegistry::from_bundle_json(json).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMaterial(_)));
    }

    #[test]
    fn manifest_lists_every_material() {
        let registry = MaterialRegistry::from_bundle_json(BUNDLE).expect("bundle should parse");
        let manifest: serde_json::Value =
            serde_json::from_str(&registry.manifest_json()).expect("manifest is json");
        assert_eq!(manifest.as_array().map(|a| a.len()), Some(3));
        assert_eq!(manifest[1]["name"], "salt");
        assert_eq!(manifest[1]["state"], "powder");
    }
}
