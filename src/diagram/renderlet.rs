use std::path::Path;

use tracing::{debug, warn};

use super::association::AssociationRenderlet;
use super::chromosome::{Chromosome, ChromosomeRenderlet};
use super::context::RenderingContext;
use super::error::RenderError;
use super::ideogram::Ideogram;
use super::nexus::RenderletNexus;
use crate::config::DiagramConfig;
use crate::ontology::Iri;

/// A unit able to draw one class of knowledge-base entity
pub trait Renderlet {
    fn name(&self) -> &str;

    /// Class whose instances this renderlet draws
    fn target_class(&self) -> &Iri;

    /// True iff `entity` is declared an instance of the target class and has
    /// not been placed yet
    fn can_render(
        &self,
        nexus: &RenderletNexus,
        context: &RenderingContext<'_>,
        entity: &Iri,
    ) -> bool {
        nexus.location_of(entity).is_none()
            && context
                .oracle()
                .types_of(entity)
                .contains(self.target_class())
    }

    /// Draw `entity` and publish the outcome to the nexus
    fn render(
        &self,
        nexus: &mut RenderletNexus,
        context: &mut RenderingContext<'_>,
        entity: &Iri,
    ) -> Result<(), RenderError>;
}

/// Every kind of renderlet a diagram can register
#[derive(Debug, Clone)]
pub enum RenderletKind {
    Chromosome(ChromosomeRenderlet),
    Association(AssociationRenderlet),
}

impl Renderlet for RenderletKind {
    fn name(&self) -> &str {
        match self {
            RenderletKind::Chromosome(r) => r.name(),
            RenderletKind::Association(r) => r.name(),
        }
    }

    fn target_class(&self) -> &Iri {
        match self {
            RenderletKind::Chromosome(r) => r.target_class(),
            RenderletKind::Association(r) => r.target_class(),
        }
    }

    fn can_render(
        &self,
        nexus: &RenderletNexus,
        context: &RenderingContext<'_>,
        entity: &Iri,
    ) -> bool {
        match self {
            RenderletKind::Chromosome(r) => r.can_render(nexus, context, entity),
            RenderletKind::Association(r) => r.can_render(nexus, context, entity),
        }
    }

    fn render(
        &self,
        nexus: &mut RenderletNexus,
        context: &mut RenderingContext<'_>,
        entity: &Iri,
    ) -> Result<(), RenderError> {
        match self {
            RenderletKind::Chromosome(r) => r.render(nexus, context, entity),
            RenderletKind::Association(r) => r.render(nexus, context, entity),
        }
    }
}

/// The standard registration order: the 24 chromosomes in grid order, then
/// associations.
///
/// Chromosomes are drawn from `<ideogram_dir>/<label>.svg` when the
/// configuration names a directory and the file exists, schematically
/// otherwise.
pub fn standard_renderlets(config: &DiagramConfig) -> Result<Vec<RenderletKind>, String> {
    let mut renderlets = Vec::with_capacity(25);

    for chromosome in Chromosome::all() {
        let class = config.vocabulary.chromosome_class(chromosome);
        let mut renderlet = ChromosomeRenderlet::new(chromosome, class, config.style.clone());
        if let Some(dir) = config.ideogram_dir.as_deref() {
            if let Some(ideogram) = load_ideogram(dir, chromosome)? {
                renderlet = renderlet.with_ideogram(ideogram);
            }
        }
        renderlets.push(RenderletKind::Chromosome(renderlet));
    }

    renderlets.push(RenderletKind::Association(AssociationRenderlet::new(
        config.vocabulary.trait_association_class.clone(),
        config.style.clone(),
    )));

    Ok(renderlets)
}

fn load_ideogram(dir: &Path, chromosome: Chromosome) -> Result<Option<Ideogram>, String> {
    let path = dir.join(format!("{}.svg", chromosome.label()));
    if !path.is_file() {
        warn!(
            %chromosome,
            path = %path.display(),
            "no ideogram asset, drawing chromosome schematically"
        );
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read ideogram {}: {}", path.display(), e))?;
    let ideogram = Ideogram::parse(chromosome, &content)
        .map_err(|e| format!("{} ({})", e, path.display()))?;
    debug!(
        %chromosome,
        bands = ideogram.bands().len(),
        "loaded ideogram asset"
    );
    Ok(Some(ideogram))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_puts_chromosomes_before_associations() {
        let config = DiagramConfig::default();
        let renderlets = standard_renderlets(&config).expect("no assets to load");

        assert_eq!(renderlets.len(), 25);
        assert_eq!(renderlets[0].name(), "Chromosome 1");
        assert_eq!(renderlets[22].name(), "Chromosome X");
        assert_eq!(renderlets[23].name(), "Chromosome Y");
        assert!(matches!(renderlets[24], RenderletKind::Association(_)));
        assert_eq!(
            renderlets[24].target_class(),
            &config.vocabulary.trait_association_class
        );
    }

    #[test]
    fn missing_asset_directory_falls_back_to_schematic() {
        let config = DiagramConfig {
            ideogram_dir: Some("/nonexistent/ideograms".into()),
            ..DiagramConfig::default()
        };
        let renderlets = standard_renderlets(&config).expect("missing files are not errors");
        assert_eq!(renderlets.len(), 25);
    }

    #[test]
    fn loads_assets_from_directory() {
        let dir = std::env::temp_dir().join(format!("gwas-ideogram-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        std::fs::write(
            dir.join("21.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="21q22.3" x="20" y="400" width="20" height="15"/></svg>"#,
        )
        .expect("write asset");

        let chr21 = Chromosome::parse("21").expect("valid chromosome");
        let ideogram = load_ideogram(&dir, chr21)
            .expect("readable asset")
            .expect("asset present");
        assert_eq!(ideogram.bands().len(), 1);
        assert_eq!(ideogram.bands()[0].0.name(), "21q22.3");

        std::fs::write(dir.join("22.svg"), "<svg><rect").expect("write asset");
        let chr22 = Chromosome::parse("22").expect("valid chromosome");
        assert!(load_ideogram(&dir, chr22).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
