use tracing::info;

use super::canvas::SvgCanvas;
use super::context::RenderingContext;
use super::nexus::{RenderSummary, RenderingEvent, RenderletNexus};
use super::renderlet::{Renderlet, RenderletKind};
use crate::config::{DiagramConfig, DiagramStyle};
use crate::ontology::GraphOracle;
use crate::xml::escape_attr;

/// Outcome of one diagram build
#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    pub canvas: SvgCanvas,
    pub events: Vec<RenderingEvent>,
    pub summary: RenderSummary,
}

/// Render every instance of every registered renderlet's class.
///
/// Candidates are gathered class by class in registration order, so the
/// chromosomes are placed before any association asks for their bands. Each
/// call owns a fresh context and nexus; concurrent builds over one oracle
/// share nothing else.
pub fn build_diagram(
    oracle: &dyn GraphOracle,
    config: &DiagramConfig,
    renderlets: &[RenderletKind],
) -> RenderedDiagram {
    let canvas = config.canvas();
    let mut context = RenderingContext::new(oracle, &config.vocabulary, canvas);
    let mut nexus = RenderletNexus::new();

    let candidates = renderlets
        .iter()
        .flat_map(|renderlet| oracle.all_instances_of(renderlet.target_class()));
    nexus.render_all(renderlets, &mut context, candidates);

    let (events, summary) = nexus.into_parts();
    info!(
        drawn = summary.drawn,
        secondary = summary.secondary,
        skipped = summary.skipped.len(),
        "diagram built"
    );

    RenderedDiagram {
        canvas,
        events,
        summary,
    }
}

impl RenderedDiagram {
    /// Fragments in paint order: ascending z-index, event order within a
    /// layer
    pub fn layers(&self) -> Vec<&RenderingEvent> {
        let mut drawn: Vec<&RenderingEvent> = self.events.iter().filter(|e| !e.is_empty()).collect();
        drawn.sort_by_key(|e| e.area.z_index);
        drawn
    }

    pub fn to_svg(&self, style: &DiagramStyle) -> String {
        let body: String = self.layers().iter().map(|e| e.svg.as_str()).collect();
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}"><rect width="100%" height="100%" fill="{}" />{}</svg>"#,
            self.canvas.width,
            self.canvas.height,
            self.canvas.width,
            self.canvas.height,
            escape_attr(&style.background),
            body
        )
    }
}
