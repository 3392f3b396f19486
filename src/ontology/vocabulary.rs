use serde::{Deserialize, Serialize};

use super::Iri;
use crate::diagram::Chromosome;

const TRAIT_ASSOCIATION_CLASS: &str = "http://rdf.ebi.ac.uk/terms/gwas/TraitAssociation";
const VARIANT_CLASS: &str = "http://rdf.ebi.ac.uk/terms/gwas/SingleNucleotidePolymorphism";
const BAND_CLASS: &str = "http://purl.obolibrary.org/obo/SO_0000341";
const IS_ABOUT: &str = "http://purl.obolibrary.org/obo/IAO_0000136";
const LOCATED_IN: &str = "http://purl.obolibrary.org/obo/RO_0001025";
const HAS_NAME: &str = "http://rdf.ebi.ac.uk/terms/gwas/has_name";
const CHROMOSOME_NAMESPACE: &str = "http://www.ebi.ac.uk/efo/gwas-diagram/";

/// Offset between a chromosome's grid position and its class number
const CHROMOSOME_CLASS_OFFSET: usize = 5;

/// Classes and relations the renderer queries the knowledge base with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_trait_association_class")]
    pub trait_association_class: Iri,
    #[serde(default = "default_variant_class")]
    pub variant_class: Iri,
    #[serde(default = "default_band_class")]
    pub band_class: Iri,
    #[serde(default = "default_is_about")]
    pub is_about: Iri,
    #[serde(default = "default_located_in")]
    pub located_in: Iri,
    #[serde(default = "default_has_name")]
    pub has_name: Iri,
    #[serde(default = "default_chromosome_namespace")]
    pub chromosome_namespace: String,
}

fn default_trait_association_class() -> Iri {
    Iri::from(TRAIT_ASSOCIATION_CLASS)
}
fn default_variant_class() -> Iri {
    Iri::from(VARIANT_CLASS)
}
fn default_band_class() -> Iri {
    Iri::from(BAND_CLASS)
}
fn default_is_about() -> Iri {
    Iri::from(IS_ABOUT)
}
fn default_located_in() -> Iri {
    Iri::from(LOCATED_IN)
}
fn default_has_name() -> Iri {
    Iri::from(HAS_NAME)
}
fn default_chromosome_namespace() -> String {
    CHROMOSOME_NAMESPACE.to_string()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            trait_association_class: default_trait_association_class(),
            variant_class: default_variant_class(),
            band_class: default_band_class(),
            is_about: default_is_about(),
            located_in: default_located_in(),
            has_name: default_has_name(),
            chromosome_namespace: default_chromosome_namespace(),
        }
    }
}

impl Vocabulary {
    /// Class whose instances are drawn as the ideogram of `chromosome`
    pub fn chromosome_class(&self, chromosome: Chromosome) -> Iri {
        Iri::new(format!(
            "{}EFO_GD{:05}",
            self.chromosome_namespace,
            chromosome.position() + CHROMOSOME_CLASS_OFFSET
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::Vocabulary;
    use crate::diagram::Chromosome;

    #[test]
    fn chromosome_classes_follow_grid_position() {
        let vocabulary = Vocabulary::default();
        let class = |label: &str| {
            vocabulary
                .chromosome_class(Chromosome::parse(label).expect("valid label"))
                .to_string()
        };

        assert_eq!(class("9"), "http://www.ebi.ac.uk/efo/gwas-diagram/EFO_GD00013");
        assert_eq!(class("14"), "http://www.ebi.ac.uk/efo/gwas-diagram/EFO_GD00018");
        assert_eq!(class("22"), "http://www.ebi.ac.uk/efo/gwas-diagram/EFO_GD00026");
        assert_eq!(class("Y"), "http://www.ebi.ac.uk/efo/gwas-diagram/EFO_GD00028");
    }
}
