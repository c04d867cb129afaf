//! Reaction rules: data-only pair predicates plus effects.
//!
//! Rules are compiled by the registry into a dense `(source, target)` table so
//! the per-tick lookup is a single index.

use serde::{Deserialize, Serialize};

use super::material::{Material, MaterialId, MaterialState, MaterialTags, EMPTY_NAME};

/// Predicate over a single material.
///
/// The empty material only ever matches `Named { name: "empty" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialMatcher {
    Any,
    Named { name: String },
    State { state: MaterialState },
    /// Material carries every listed tag.
    Tagged { tags: MaterialTags },
    Flammable,
    AllOf { of: Vec<MaterialMatcher> },
    AnyOf { of: Vec<MaterialMatcher> },
    Not { of: Box<MaterialMatcher> },
}

impl MaterialMatcher {
    pub fn named(name: impl Into<String>) -> Self {
        MaterialMatcher::Named { name: name.into() }
    }

    pub fn matches(&self, material: &Material) -> bool {
        if material.is_empty() {
            return matches!(self, MaterialMatcher::Named { name } if name == EMPTY_NAME);
        }
        match self {
            MaterialMatcher::Any => true,
            MaterialMatcher::Named { name } => *name == material.name,
            MaterialMatcher::State { state } => material.props.state == *state,
            MaterialMatcher::Tagged { tags } => material.props.tags.contains(*tags),
            MaterialMatcher::Flammable => {
                material.props.flammability > 0.0 && material.props.burns_to.is_some()
            }
            MaterialMatcher::AllOf { of } => of.iter().all(|m| m.matches(material)),
            MaterialMatcher::AnyOf { of } => of.iter().any(|m| m.matches(material)),
            MaterialMatcher::Not { of } => !of.matches(material),
        }
    }
}

/// Declarative reaction between a source cell and one of its 4-neighbors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRule {
    pub name: String,
    pub source: MaterialMatcher,
    pub target: MaterialMatcher,
    #[serde(default)]
    pub source_becomes: Option<String>,
    #[serde(default)]
    pub target_becomes: Option<String>,
    /// Degrees added to the source cell (negative quenches).
    #[serde(default)]
    pub source_heat: f32,
    #[serde(default)]
    pub target_heat: f32,
    /// Per-tick chance; the configured default applies when absent.
    #[serde(default)]
    pub probability: Option<f32>,
    /// Also match with source and target swapped (effects swap with them).
    #[serde(default)]
    pub symmetric: bool,
}

impl ReactionRule {
    pub fn new(name: impl Into<String>, source: MaterialMatcher, target: MaterialMatcher) -> Self {
        Self {
            name: name.into(),
            source,
            target,
            source_becomes: None,
            target_becomes: None,
            source_heat: 0.0,
            target_heat: 0.0,
            probability: None,
            symmetric: false,
        }
    }

    pub fn source_becomes(mut self, name: impl Into<String>) -> Self {
        self.source_becomes = Some(name.into());
        self
    }

    pub fn target_becomes(mut self, name: impl Into<String>) -> Self {
        self.target_becomes = Some(name.into());
        self
    }

    pub fn heat(mut self, source: f32, target: f32) -> Self {
        self.source_heat = source;
        self.target_heat = target;
        self
    }

    pub fn probability(mut self, p: f32) -> Self {
        self.probability = Some(p);
        self
    }

    pub fn symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }
}

/// Outcome for one side of a compiled reaction.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultId {
    Keep,
    Become(MaterialId),
    /// Named result that did not resolve when the table was built.
    Unresolved(String),
}

impl ResultId {
    pub(crate) fn resolve(name: Option<&str>, lookup: impl Fn(&str) -> Option<MaterialId>) -> Self {
        match name {
            None => ResultId::Keep,
            Some(n) => match lookup(n) {
                Some(id) => ResultId::Become(id),
                None => ResultId::Unresolved(n.to_string()),
            },
        }
    }
}

/// A rule resolved against the registry, oriented for one `(source, target)` order.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledReaction {
    pub rule_index: usize,
    pub source_result: ResultId,
    pub target_result: ResultId,
    pub source_heat: f32,
    pub target_heat: f32,
    pub probability: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::material::{MaterialProps, EMPTY};

    fn material(id: MaterialId, name: &str, props: MaterialProps) -> Material {
        Material {
            id,
            name: name.to_string(),
            props,
        }
    }

    #[test]
    fn empty_only_matches_by_name() {
        let empty = material(EMPTY, EMPTY_NAME, MaterialProps::new(MaterialState::Gas, 0.0));
        assert!(!MaterialMatcher::Any.matches(&empty));
        assert!(!MaterialMatcher::State { state: MaterialState::Gas }.matches(&empty));
        assert!(MaterialMatcher::named(EMPTY_NAME).matches(&empty));
    }

    #[test]
    fn composite_matchers() {
        let wood = material(
            3,
            "wood",
            MaterialProps {
                flammability: 0.4,
                burns_to: Some("fire".to_string()),
                tags: MaterialTags::ORGANIC,
                ..MaterialProps::default()
            },
        );
        let organic_solid = MaterialMatcher::AllOf {
            of: vec![
                MaterialMatcher::State { state: MaterialState::Solid },
                MaterialMatcher::Tagged { tags: MaterialTags::ORGANIC },
            ],
        };
        assert!(organic_solid.matches(&wood));
        assert!(MaterialMatcher::Flammable.matches(&wood));
        assert!(!MaterialMatcher::Not { of: Box::new(MaterialMatcher::Flammable) }.matches(&wood));
    }

    #[test]
    fn rule_parses_from_json() {
        let rule: ReactionRule = serde_json::from_str(
            r#"{
                "name": "quench",
                "source": { "kind": "named", "name": "lava" },
                "target": { "kind": "named", "name": "water" },
                "sourceBecomes": "obsidian",
                "targetBecomes": "steam",
                "probability": 0.3,
                "symmetric": true
            }"#,
        )
        .expect("rule should parse");
        assert_eq!(rule.source, MaterialMatcher::named("lava"));
        assert_eq!(rule.target_becomes.as_deref(), Some("steam"));
        assert_eq!(rule.probability, Some(0.3));
        assert!(rule.symmetric);
        assert_eq!(rule.source_heat, 0.0);
    }
}
