use std::fmt;

use thiserror::Error;

use super::band::BandError;
use crate::ontology::Iri;

/// Why an association could not be tied to a single band
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BandResolution {
    /// The association is about no genetic variant
    NoVariant,
    /// A variant has no location in the knowledge base
    NoLocation { variant: Iri },
    /// A variant is located in more than one band
    MultipleLocations { variant: Iri, count: usize },
    MissingName { band: Iri },
    MultipleNames { band: Iri, count: usize },
}

impl fmt::Display for BandResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandResolution::NoVariant => write!(f, "it is not about any genetic variant"),
            BandResolution::NoLocation { variant } => {
                write!(f, "no location available for variant '{}'", variant)
            }
            BandResolution::MultipleLocations { variant, count } => write!(
                f,
                "invalid data: variant '{}' has multiple locations ({})",
                variant, count
            ),
            BandResolution::MissingName { band } => write!(f, "band '{}' has no name", band),
            BandResolution::MultipleNames { band, count } => {
                write!(f, "band '{}' has {} names", band, count)
            }
        }
    }
}

/// Failure to render a single entity.
///
/// Every variant is recovered by the nexus: the entity is left out of the
/// diagram and the build carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cannot locate '{entity}' on the diagram: {reason}")]
    UnresolvableBand { entity: Iri, reason: BandResolution },

    #[error("band '{band}' needed by '{entity}' has no placement on the canvas")]
    UnknownPlacement { entity: Iri, band: String },

    #[error("no renderlet can render '{entity}'")]
    NoRenderer { entity: Iri },

    #[error("'{entity}' refers to a malformed band name: {source}")]
    MalformedBandName {
        entity: Iri,
        #[source]
        source: BandError,
    },
}
