mod memory;
mod vocabulary;

pub use memory::{EntitySnapshot, GraphSnapshot, InMemoryGraph};
pub use vocabulary::Vocabulary;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an entity, class or relation in the knowledge base
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Query contract consumed from the knowledge base.
///
/// All answers are ordered sets so that every traversal, and therefore every
/// rendered diagram, is deterministic.
pub trait GraphOracle {
    /// Declared classes of an entity
    fn types_of(&self, entity: &Iri) -> BTreeSet<Iri>;

    fn related_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<Iri>;

    fn literals_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<String>;

    /// Every entity declaring `class` among its types
    fn all_instances_of(&self, class: &Iri) -> BTreeSet<Iri>;
}

impl<T: GraphOracle + ?Sized> GraphOracle for &T {
    fn types_of(&self, entity: &Iri) -> BTreeSet<Iri> {
        (**self).types_of(entity)
    }

    fn related_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<Iri> {
        (**self).related_by(entity, relation)
    }

    fn literals_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<String> {
        (**self).literals_by(entity, relation)
    }

    fn all_instances_of(&self, class: &Iri) -> BTreeSet<Iri> {
        (**self).all_instances_of(class)
    }
}
