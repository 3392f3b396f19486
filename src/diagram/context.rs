use std::cell::OnceCell;
use std::collections::HashMap;

use tracing::{trace, warn};

use super::band::{BandError, BandInformation};
use super::canvas::{SvgArea, SvgCanvas};
use super::chromosome::Chromosome;
use crate::ontology::{GraphOracle, Iri, Vocabulary};

/// Every named band of one knowledge base, in drawing order
#[derive(Debug, Clone, Default)]
pub struct BandOrdering {
    sorted: Vec<BandInformation>,
    previous: HashMap<BandInformation, BandInformation>,
    rejected: Vec<(Iri, BandError)>,
}

impl BandOrdering {
    /// Order the named instances of the band class. Unnamed bands and bands
    /// with unparseable names are left out.
    pub fn build(oracle: &dyn GraphOracle, vocabulary: &Vocabulary) -> Self {
        trace!("retrieving all cytogenetic bands to sort into rendering order");
        let entities = oracle.all_instances_of(&vocabulary.band_class);
        trace!(count = entities.len(), "sorting bands");

        let mut rejected = Vec::new();
        let mut sorted: Vec<BandInformation> = Vec::with_capacity(entities.len());
        for entity in entities {
            let names = oracle.literals_by(&entity, &vocabulary.has_name);
            let Some(name) = names.iter().next() else {
                warn!(band = %entity, "no band name for band entity");
                continue;
            };
            if names.len() > 1 {
                warn!(
                    band = %entity,
                    count = names.len(),
                    "band entity has several names, only using the first"
                );
            }
            match BandInformation::parse(name) {
                Ok(band) => sorted.push(band),
                Err(e) => {
                    warn!(band = %entity, error = %e, "excluding band from ordering");
                    rejected.push((entity, e));
                }
            }
        }

        sorted.sort();
        sorted.dedup();

        let previous: HashMap<BandInformation, BandInformation> = sorted
            .windows(2)
            .map(|pair| (pair[1].clone(), pair[0].clone()))
            .collect();
        trace!(mapped = previous.len(), "mapped bands to their previous band");

        Self {
            sorted,
            previous,
            rejected,
        }
    }

    pub fn bands(&self) -> &[BandInformation] {
        &self.sorted
    }

    /// The band drawn immediately before `band`
    pub fn previous(&self, band: &BandInformation) -> Option<&BandInformation> {
        self.previous.get(band)
    }

    pub fn bands_on(&self, chromosome: Chromosome) -> &[BandInformation] {
        let start = self.sorted.partition_point(|b| b.chromosome() < chromosome);
        let end = self.sorted.partition_point(|b| b.chromosome() <= chromosome);
        &self.sorted[start..end]
    }

    /// Band entities whose names could not be parsed
    pub fn rejected(&self) -> &[(Iri, BandError)] {
        &self.rejected
    }
}

/// State shared by every render call of one diagram build.
///
/// Owns the lazily built band ordering and the cache of bands that already
/// carry an association line. Neither outlives the build, and a context is
/// never shared between builds.
pub struct RenderingContext<'g> {
    oracle: &'g dyn GraphOracle,
    vocabulary: &'g Vocabulary,
    canvas: SvgCanvas,
    band_ordering: OnceCell<BandOrdering>,
    rendered_bands: HashMap<BandInformation, SvgArea>,
}

impl<'g> RenderingContext<'g> {
    pub fn new(oracle: &'g dyn GraphOracle, vocabulary: &'g Vocabulary, canvas: SvgCanvas) -> Self {
        Self {
            oracle,
            vocabulary,
            canvas,
            band_ordering: OnceCell::new(),
            rendered_bands: HashMap::new(),
        }
    }

    pub fn oracle(&self) -> &'g dyn GraphOracle {
        self.oracle
    }

    pub fn vocabulary(&self) -> &'g Vocabulary {
        self.vocabulary
    }

    pub fn canvas(&self) -> SvgCanvas {
        self.canvas
    }

    pub fn has_band_ordering(&self) -> bool {
        self.band_ordering.get().is_some()
    }

    pub fn band_ordering(&self) -> &BandOrdering {
        self.band_ordering
            .get_or_init(|| BandOrdering::build(self.oracle, self.vocabulary))
    }

    pub fn rendered_band(&self, band: &BandInformation) -> Option<&SvgArea> {
        self.rendered_bands.get(band)
    }

    /// Record the area of the first association line drawn to `band`
    pub fn record_rendered_band(&mut self, band: BandInformation, area: SvgArea) {
        self.rendered_bands.entry(band).or_insert(area);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeSet;

    use super::*;
    use crate::ontology::InMemoryGraph;

    struct CountingOracle {
        inner: InMemoryGraph,
        enumerations: Cell<usize>,
    }

    impl GraphOracle for CountingOracle {
        fn types_of(&self, entity: &Iri) -> BTreeSet<Iri> {
            self.inner.types_of(entity)
        }

        fn related_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<Iri> {
            self.inner.related_by(entity, relation)
        }

        fn literals_by(&self, entity: &Iri, relation: &Iri) -> BTreeSet<String> {
            self.inner.literals_by(entity, relation)
        }

        fn all_instances_of(&self, class: &Iri) -> BTreeSet<Iri> {
            self.enumerations.set(self.enumerations.get() + 1);
            self.inner.all_instances_of(class)
        }
    }

    fn graph_with_bands(names: &[&str]) -> InMemoryGraph {
        let vocabulary = Vocabulary::default();
        let mut graph = InMemoryGraph::new();
        for (i, name) in names.iter().enumerate() {
            let iri = format!("ex:band{}", i);
            graph
                .assert_type(iri.as_str(), vocabulary.band_class.clone())
                .assert_literal(iri.as_str(), vocabulary.has_name.clone(), *name);
        }
        graph
    }

    fn band(name: &str) -> BandInformation {
        BandInformation::parse(name).expect("valid band")
    }

    #[test]
    fn ordering_maps_each_band_to_its_predecessor() {
        let vocabulary = Vocabulary::default();
        let graph = graph_with_bands(&["1q21.1", "2p25.3", "1p36.3", "1q12", "chr?"]);
        let ordering = BandOrdering::build(&graph, &vocabulary);

        let names: Vec<&str> = ordering.bands().iter().map(|b| b.name()).collect();
        assert_eq!(names, ["1p36.3", "1q12", "1q21.1", "2p25.3"]);

        assert_eq!(ordering.previous(&band("1p36.3")), None);
        assert_eq!(ordering.previous(&band("1q12")), Some(&band("1p36.3")));
        assert_eq!(ordering.previous(&band("2p25.3")), Some(&band("1q21.1")));
        assert_eq!(ordering.rejected().len(), 1);
    }

    #[test]
    fn bands_on_selects_one_chromosome() {
        let vocabulary = Vocabulary::default();
        let graph = graph_with_bands(&["1q21.1", "2p25.3", "1p36.3", "Xq28"]);
        let ordering = BandOrdering::build(&graph, &vocabulary);

        let on = |label: &str| -> Vec<String> {
            ordering
                .bands_on(Chromosome::parse(label).expect("valid chromosome"))
                .iter()
                .map(|b| b.name().to_string())
                .collect()
        };
        assert_eq!(on("1"), ["1p36.3", "1q21.1"]);
        assert_eq!(on("X"), ["Xq28"]);
        assert!(on("5").is_empty());
    }

    #[test]
    fn unnamed_bands_are_skipped() {
        let vocabulary = Vocabulary::default();
        let mut graph = graph_with_bands(&["3p21.31"]);
        graph.assert_type("ex:nameless", vocabulary.band_class.clone());
        let ordering = BandOrdering::build(&graph, &vocabulary);

        assert_eq!(ordering.bands().len(), 1);
        assert!(ordering.rejected().is_empty());
    }

    #[test]
    fn ordering_is_built_once_per_context() {
        let vocabulary = Vocabulary::default();
        let oracle = CountingOracle {
            inner: graph_with_bands(&["1p36.3", "1q12"]),
            enumerations: Cell::new(0),
        };
        let context = RenderingContext::new(&oracle, &vocabulary, SvgCanvas::new(1200.0, 1000.0));

        assert!(!context.has_band_ordering());
        assert_eq!(context.band_ordering().bands().len(), 2);
        assert_eq!(context.band_ordering().bands().len(), 2);
        assert!(context.has_band_ordering());
        assert_eq!(oracle.enumerations.get(), 1);
    }

    #[test]
    fn first_rendered_area_wins() {
        let vocabulary = Vocabulary::default();
        let graph = InMemoryGraph::new();
        let mut context = RenderingContext::new(&graph, &vocabulary, SvgCanvas::new(1200.0, 1000.0));

        context.record_rendered_band(band("4q12"), SvgArea::new(1.0, 2.0, 3.0, 4.0));
        context.record_rendered_band(band("4q12"), SvgArea::new(9.0, 9.0, 9.0, 9.0));

        assert_eq!(context.rendered_band(&band("4q12")), Some(&SvgArea::new(1.0, 2.0, 3.0, 4.0)));
    }
}
