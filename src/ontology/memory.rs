use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::{GraphOracle, Iri};

/// One entity as it appears in a knowledge-base snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub iri: Iri,
    #[serde(default)]
    pub types: Vec<Iri>,
    #[serde(default)]
    pub relations: BTreeMap<Iri, Vec<Iri>>,
    #[serde(default)]
    pub literals: BTreeMap<Iri, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, Default)]
struct EntityRecord {
    types: BTreeSet<Iri>,
    relations: BTreeMap<Iri, BTreeSet<Iri>>,
    literals: BTreeMap<Iri, BTreeSet<String>>,
}

/// Knowledge base held entirely in memory.
///
/// Answers only what was asserted: an entity is an instance of a class iff
/// that class was declared as one of its types.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    records: HashMap<Iri, EntityRecord>,
    instances: HashMap<Iri, BTreeSet<Iri>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assert_type(&mut self, entity: impl Into<Iri>, class: impl Into<Iri>) -> &mut Self {
        let entity = entity.into();
        let class = class.into();
        self.instances
            .entry(class.clone())
            .or_default()
            .insert(entity.clone());
        self.records.entry(entity).or_default().types.insert(class);
        self
    }

    pub fn relate(
        &mut self,
        entity: impl Into<Iri>,
        relation: impl Into<Iri>,
        target: impl Into<Iri>,
    ) -> &mut Self {
        self.records
            .entry(entity.into())
            .or_default()
            .relations
            .entry(relation.into())
            .or_default()
            .insert(target.into());
        self
    }

    pub fn assert_literal(
        &mut self,
        entity: impl Into<Iri>,
        relation: impl Into<Iri>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.records
            .entry(entity.into())
            .or_default()
            .literals
            .entry(relation.into())
            .or_default()
            .insert(value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for entity in snapshot.entities {
            graph.records.entry(entity.iri.clone()).or_default();
            for class in entity.types {
                graph.assert_type(entity.iri.clone(), class);
            }
            for (relation, targets) in entity.relations {
                for target in targets {
                    graph.relate(entity.iri.clone(), relation.clone(), target);
                }
            }
            for (relation, values) in entity.literals {
                for value in values {
                    graph.assert_literal(entity.iri.clone(), relation.clone(), value);
                }
            }
        }
        graph
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        let snapshot: GraphSnapshot = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse knowledge base JSON: {}", e))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let snapshot: GraphSnapshot = serde_yaml::from_str(content)
            .map_err(|e| format!("Failed to parse knowledge base YAML: {}", e))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        let snapshot: GraphSnapshot = toml::from_str(content)
            .map_err(|e| format!("Failed to parse knowledge base TOML: {}", e))?;
        Ok(Self::from_snapshot(snapshot))
    }
}

impl GraphOracle for InMemoryGraph {
    fn types_of(&self, entity: &Iri) -> BTreeSet<Iri> {
        self.records
            .get(entity)
            .map(|record| record.types.clone())
            .unwrap_or_default()
    }

    fn related_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<Iri> {
        self.records
            .get(entity)
            .and_then(|record| record.relations.get(relation))
            .cloned()
            .unwrap_or_default()
    }

    fn literals_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<String> {
        self.records
            .get(entity)
            .and_then(|record| record.literals.get(relation))
            .cloned()
            .unwrap_or_default()
    }

    fn all_instances_of(&self, class: &Iri) -> BTreeSet<Iri> {
        self.instances.get(class).cloned().unwrap_or_default()
    }
}
