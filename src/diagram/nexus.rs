use std::collections::{HashMap, HashSet};

use tracing::{debug, error, trace};

use super::band::BandInformation;
use super::canvas::SvgArea;
use super::context::RenderingContext;
use super::error::RenderError;
use super::renderlet::{Renderlet, RenderletKind};
use crate::ontology::Iri;

/// Record of one render call: what was drawn, where, and by whom
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingEvent {
    pub entity: Iri,
    /// SVG fragment; empty when the entity shares a line drawn earlier
    pub svg: String,
    pub area: SvgArea,
    pub renderlet: String,
}

impl RenderingEvent {
    pub fn new(entity: Iri, svg: String, area: SvgArea, renderlet: &str) -> Self {
        Self {
            entity,
            svg,
            area,
            renderlet: renderlet.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.svg.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Rendered { renderlet: String },
    AlreadyPlaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntity {
    pub entity: Iri,
    pub error: RenderError,
}

/// What happened during one rendering pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub drawn: usize,
    /// Events sharing a fragment drawn for an earlier entity
    pub secondary: usize,
    /// Dispatches of entities that were already placed
    pub redundant: usize,
    pub skipped: Vec<SkippedEntity>,
}

impl RenderSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Coordinator of one diagram build.
///
/// Owns where every entity and every band ended up on the canvas, and the
/// ordered stream of rendering events. Entities and bands are placed at
/// most once; later placements are ignored.
#[derive(Debug, Default)]
pub struct RenderletNexus {
    locations: HashMap<Iri, SvgArea>,
    band_locations: HashMap<BandInformation, SvgArea>,
    events: Vec<RenderingEvent>,
    summary: RenderSummary,
}

impl RenderletNexus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location_of(&self, entity: &Iri) -> Option<&SvgArea> {
        self.locations.get(entity)
    }

    pub fn band_location(&self, band: &BandInformation) -> Option<&SvgArea> {
        self.band_locations.get(band)
    }

    /// Record a rendering event. Returns `false`, leaving the existing
    /// placement untouched, if the entity was already placed.
    pub fn publish(&mut self, event: RenderingEvent) -> bool {
        if self.locations.contains_key(&event.entity) {
            debug!(
                entity = %event.entity,
                renderlet = %event.renderlet,
                "redundant rendering event ignored"
            );
            return false;
        }

        trace!(entity = %event.entity, renderlet = %event.renderlet, "rendering event");
        if event.is_empty() {
            self.summary.secondary += 1;
        } else {
            self.summary.drawn += 1;
        }
        self.locations.insert(event.entity.clone(), event.area);
        self.events.push(event);
        true
    }

    /// Record where a band was drawn. First placement wins.
    pub fn publish_band(&mut self, band: BandInformation, area: SvgArea) -> bool {
        if self.band_locations.contains_key(&band) {
            debug!(band = %band, "band already placed");
            return false;
        }
        self.band_locations.insert(band, area);
        true
    }

    /// Hand `entity` to the first renderlet, in registration order, that can
    /// render it.
    pub fn dispatch(
        &mut self,
        renderlets: &[RenderletKind],
        context: &mut RenderingContext<'_>,
        entity: &Iri,
    ) -> Result<Dispatch, RenderError> {
        if self.location_of(entity).is_some() {
            debug!(%entity, "entity already placed, nothing to render");
            self.summary.redundant += 1;
            return Ok(Dispatch::AlreadyPlaced);
        }

        let (chosen, others) = {
            let nexus: &Self = self;
            let context: &RenderingContext<'_> = context;
            let mut capable = renderlets
                .iter()
                .filter(|renderlet| renderlet.can_render(nexus, context, entity));
            (capable.next(), capable.count())
        };
        let Some(renderlet) = chosen else {
            return Err(RenderError::NoRenderer {
                entity: entity.clone(),
            });
        };
        if others > 0 {
            debug!(
                %entity,
                renderlet = renderlet.name(),
                others,
                "several renderlets can render entity, using the first registered"
            );
        }

        renderlet.render(self, context, entity)?;
        Ok(Dispatch::Rendered {
            renderlet: renderlet.name().to_string(),
        })
    }

    /// Dispatch every entity in turn. Failures are logged and recorded in
    /// the summary; they never stop the pass.
    pub fn render_all<I>(
        &mut self,
        renderlets: &[RenderletKind],
        context: &mut RenderingContext<'_>,
        entities: I,
    ) where
        I: IntoIterator<Item = Iri>,
    {
        let mut seen = HashSet::new();
        for entity in entities {
            if !seen.insert(entity.clone()) {
                continue;
            }
            if let Err(e) = self.dispatch(renderlets, context, &entity) {
                error!(%entity, error = %e, "entity left out of the diagram");
                self.summary.skipped.push(SkippedEntity { entity, error: e });
            }
        }
    }

    pub fn events(&self) -> &[RenderingEvent] {
        &self.events
    }

    pub fn summary(&self) -> &RenderSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (Vec<RenderingEvent>, RenderSummary) {
        (self.events, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramStyle;
    use crate::diagram::canvas::SvgCanvas;
    use crate::diagram::chromosome::{Chromosome, ChromosomeRenderlet};
    use crate::ontology::{InMemoryGraph, Vocabulary};

    fn event(entity: &str, svg: &str, area: SvgArea) -> RenderingEvent {
        RenderingEvent::new(Iri::from(entity), svg.to_string(), area, "test")
    }

    fn chromosome_renderlet(label: &str, class: &str) -> RenderletKind {
        let chromosome = Chromosome::parse(label).expect("valid chromosome");
        RenderletKind::Chromosome(ChromosomeRenderlet::new(
            chromosome,
            Iri::from(class),
            DiagramStyle::default(),
        ))
    }

    #[test]
    fn placement_happens_once() {
        let mut nexus = RenderletNexus::new();
        let first = SvgArea::new(1.0, 2.0, 3.0, 4.0);

        assert!(nexus.publish(event("ex:a", "<g/>", first)));
        assert!(!nexus.publish(event("ex:a", "<g/>", SvgArea::new(5.0, 6.0, 7.0, 8.0))));

        assert_eq!(nexus.location_of(&Iri::from("ex:a")), Some(&first));
        assert_eq!(nexus.events().len(), 1);
        assert_eq!(nexus.summary().drawn, 1);
    }

    #[test]
    fn location_is_unknown_until_published() {
        let nexus = RenderletNexus::new();
        assert_eq!(nexus.location_of(&Iri::from("ex:nothing")), None);
    }

    #[test]
    fn empty_events_count_as_secondary() {
        let mut nexus = RenderletNexus::new();
        let area = SvgArea::new(1.0, 2.0, 3.0, 0.0);
        nexus.publish(event("ex:a", "<path/>", area));
        nexus.publish(event("ex:b", "", area));

        assert_eq!(nexus.summary().drawn, 1);
        assert_eq!(nexus.summary().secondary, 1);
        assert!(nexus.events()[1].is_empty());
    }

    #[test]
    fn band_placement_happens_once() {
        let mut nexus = RenderletNexus::new();
        let band = BandInformation::parse("5q31.1").expect("valid band");

        assert!(nexus.publish_band(band.clone(), SvgArea::new(1.0, 1.0, 1.0, 1.0)));
        assert!(!nexus.publish_band(band.clone(), SvgArea::new(2.0, 2.0, 2.0, 2.0)));
        assert_eq!(nexus.band_location(&band), Some(&SvgArea::new(1.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn first_registered_renderlet_wins() {
        let vocabulary = Vocabulary::default();
        let mut graph = InMemoryGraph::new();
        graph.assert_type("ex:chr", "ex:Chromosome");
        let renderlets = vec![
            chromosome_renderlet("7", "ex:Chromosome"),
            chromosome_renderlet("8", "ex:Chromosome"),
        ];
        let mut context = RenderingContext::new(&graph, &vocabulary, SvgCanvas::new(1200.0, 1000.0));
        let mut nexus = RenderletNexus::new();

        let outcome = nexus
            .dispatch(&renderlets, &mut context, &Iri::from("ex:chr"))
            .expect("renderable");

        assert_eq!(
            outcome,
            Dispatch::Rendered {
                renderlet: "Chromosome 7".to_string()
            }
        );
        assert_eq!(nexus.events()[0].renderlet, "Chromosome 7");
    }

    #[test]
    fn rendering_twice_is_a_no_op() {
        let vocabulary = Vocabulary::default();
        let mut graph = InMemoryGraph::new();
        graph.assert_type("ex:chr", "ex:Chromosome");
        let renderlets = vec![chromosome_renderlet("7", "ex:Chromosome")];
        let mut context = RenderingContext::new(&graph, &vocabulary, SvgCanvas::new(1200.0, 1000.0));
        let mut nexus = RenderletNexus::new();
        let entity = Iri::from("ex:chr");

        nexus
            .dispatch(&renderlets, &mut context, &entity)
            .expect("renderable");
        let placed = *nexus.location_of(&entity).expect("placed");
        let again = nexus
            .dispatch(&renderlets, &mut context, &entity)
            .expect("no-op");

        assert_eq!(again, Dispatch::AlreadyPlaced);
        assert_eq!(nexus.location_of(&entity), Some(&placed));
        assert_eq!(nexus.events().len(), 1);
        assert_eq!(nexus.summary().redundant, 1);
    }

    #[test]
    fn unclaimed_entities_are_skipped_and_reported() {
        let vocabulary = Vocabulary::default();
        let mut graph = InMemoryGraph::new();
        graph
            .assert_type("ex:chr", "ex:Chromosome")
            .assert_type("ex:gene", "ex:Gene");
        let renderlets = vec![chromosome_renderlet("7", "ex:Chromosome")];
        let mut context = RenderingContext::new(&graph, &vocabulary, SvgCanvas::new(1200.0, 1000.0));
        let mut nexus = RenderletNexus::new();

        nexus.render_all(
            &renderlets,
            &mut context,
            [Iri::from("ex:gene"), Iri::from("ex:chr")],
        );

        assert_eq!(nexus.events().len(), 1);
        assert_eq!(
            nexus.summary().skipped,
            vec![SkippedEntity {
                entity: Iri::from("ex:gene"),
                error: RenderError::NoRenderer {
                    entity: Iri::from("ex:gene")
                },
            }]
        );
    }
}
