use std::fmt;

use tracing::trace;

use super::canvas::{SvgArea, SvgCanvas, Transform};
use super::context::RenderingContext;
use super::error::RenderError;
use super::ideogram::Ideogram;
use super::nexus::{RenderingEvent, RenderletNexus};
use super::renderlet::Renderlet;
use crate::config::DiagramStyle;
use crate::ontology::Iri;
use crate::xml::escape_attr;

pub const GRID_COLUMNS: usize = 12;
pub const GRID_ROWS: usize = 2;

const CHROMOSOME_COUNT: usize = 24;
const X_POSITION: usize = 22;
const Y_POSITION: usize = 23;

/// One of the 24 human chromosomes, identified by its fixed grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chromosome(u8);

impl Chromosome {
    pub fn parse(label: &str) -> Option<Self> {
        let position = match label.trim() {
            "X" | "x" => X_POSITION,
            "Y" | "y" => Y_POSITION,
            digits => {
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                let number: usize = digits.parse().ok()?;
                if !(1..=22).contains(&number) {
                    return None;
                }
                number - 1
            }
        };
        Some(Self(position as u8))
    }

    pub fn all() -> impl Iterator<Item = Chromosome> {
        (0..CHROMOSOME_COUNT).map(|position| Self(position as u8))
    }

    pub fn position(&self) -> usize {
        self.0 as usize
    }

    pub fn label(&self) -> String {
        match self.position() {
            X_POSITION => "X".to_string(),
            Y_POSITION => "Y".to_string(),
            position => (position + 1).to_string(),
        }
    }

    pub fn row(&self) -> usize {
        self.position() / GRID_COLUMNS
    }

    pub fn column(&self) -> usize {
        self.position() % GRID_COLUMNS
    }

    /// Translation placing this chromosome's frame in its grid cell.
    ///
    /// Every fragment drawn for the chromosome, its bands and the
    /// associations landing on them carries this transform.
    pub fn transform(&self, canvas: &SvgCanvas) -> Transform {
        Transform::Translate(
            self.column() as f64 * canvas.cell_width(),
            self.row() as f64 * canvas.cell_height(),
        )
    }

    /// The grid cell in chromosome-local coordinates
    pub fn cell(&self, canvas: &SvgCanvas) -> SvgArea {
        SvgArea::new(0.0, 0.0, canvas.cell_width(), canvas.cell_height())
            .with_transform(self.transform(canvas))
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Draws the static ideogram of one chromosome and publishes where each of
/// its bands landed
#[derive(Debug, Clone)]
pub struct ChromosomeRenderlet {
    name: String,
    chromosome: Chromosome,
    class: Iri,
    ideogram: Option<Ideogram>,
    style: DiagramStyle,
}

impl ChromosomeRenderlet {
    pub fn new(chromosome: Chromosome, class: Iri, style: DiagramStyle) -> Self {
        Self {
            name: format!("Chromosome {}", chromosome),
            chromosome,
            class,
            ideogram: None,
            style,
        }
    }

    /// Use a pre-drawn ideogram instead of the schematic one
    pub fn with_ideogram(mut self, ideogram: Ideogram) -> Self {
        self.ideogram = Some(ideogram);
        self
    }
}

impl Renderlet for ChromosomeRenderlet {
    fn name(&self) -> &str {
        &self.name
    }

    fn target_class(&self) -> &Iri {
        &self.class
    }

    fn render(
        &self,
        nexus: &mut RenderletNexus,
        context: &mut RenderingContext<'_>,
        entity: &Iri,
    ) -> Result<(), RenderError> {
        trace!(chromosome = %self.chromosome, %entity, "rendering chromosome");

        let canvas = context.canvas();
        let transform = self.chromosome.transform(&canvas);

        let schematic;
        let ideogram = match &self.ideogram {
            Some(ideogram) => ideogram,
            None => {
                let bands = context.band_ordering().bands_on(self.chromosome);
                schematic = Ideogram::schematic(self.chromosome, bands, &canvas, &self.style);
                &schematic
            }
        };

        for (band, rect) in ideogram.bands() {
            nexus.publish_band(band.clone(), rect.with_transform(transform));
        }

        let svg = format!(
            r#"<g id="{}" transform="{}" class="chromosome">{}</g>"#,
            escape_attr(entity.as_str()),
            transform,
            ideogram.body()
        );
        let area = self.chromosome.cell(&canvas);
        nexus.publish(RenderingEvent::new(entity.clone(), svg, area, self.name()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromosome(label: &str) -> Chromosome {
        Chromosome::parse(label).expect("valid chromosome")
    }

    #[test]
    fn labels_map_to_fixed_positions() {
        assert_eq!(chromosome("1").position(), 0);
        assert_eq!(chromosome("3").position(), 2);
        assert_eq!(chromosome("22").position(), 21);
        assert_eq!(chromosome("X").position(), 22);
        assert_eq!(chromosome("Y").position(), 23);

        assert_eq!(Chromosome::parse("0"), None);
        assert_eq!(Chromosome::parse("23"), None);
        assert_eq!(Chromosome::parse("chr1"), None);
        assert_eq!(Chromosome::parse("+1"), None);
        assert_eq!(Chromosome::parse(""), None);
    }

    #[test]
    fn labels_round_trip_through_positions() {
        for c in Chromosome::all() {
            assert_eq!(Chromosome::parse(&c.label()), Some(c));
        }
        assert_eq!(Chromosome::all().count(), 24);
    }

    #[test]
    fn x_sits_in_second_row() {
        let canvas = SvgCanvas::new(1200.0, 1000.0);
        let x = chromosome("X");

        assert_eq!(x.row(), 1);
        assert_eq!(
            x.transform(&canvas),
            Transform::Translate((22.0 - 12.0) * (1200.0 / 12.0), 500.0)
        );
    }

    #[test]
    fn three_sits_in_first_row() {
        let canvas = SvgCanvas::new(1200.0, 1000.0);
        let three = chromosome("3");

        assert_eq!(three.row(), 0);
        assert_eq!(three.transform(&canvas), Transform::Translate(2.0 * 100.0, 0.0));
    }

    #[test]
    fn cell_spans_one_grid_column() {
        let canvas = SvgCanvas::new(960.0, 800.0);
        let cell = chromosome("13").cell(&canvas);

        assert_eq!((cell.x, cell.y, cell.width, cell.height), (0.0, 0.0, 80.0, 400.0));
        assert_eq!(cell.transform, Transform::Translate(0.0, 400.0));
    }
}
