use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::reader::Reader as XmlReader;
use tracing::debug;

use super::band::BandInformation;
use super::canvas::{SvgArea, SvgCanvas};
use super::chromosome::Chromosome;
use crate::config::DiagramStyle;
use crate::xml::{escape_attr, escape_text};

// Schematic proportions, relative to the grid cell
const COLUMN_X: f64 = 0.2;
const COLUMN_WIDTH: f64 = 0.2;
const TOP_MARGIN: f64 = 0.06;
const LABEL_SPACE: f64 = 0.08;

/// Static drawing of one chromosome and the band rectangles it defines, in
/// chromosome-local coordinates
#[derive(Debug, Clone)]
pub struct Ideogram {
    body: String,
    bands: Vec<(BandInformation, SvgArea)>,
}

type Attrs = Vec<(String, String)>;

fn read_attrs(element: &BytesStart<'_>) -> Attrs {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .collect()
}

fn get_number(attrs: &[(String, String)], name: &str) -> Option<f64> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.trim().trim_end_matches("px").parse().ok())
}

impl Ideogram {
    /// Read a pre-drawn chromosome SVG.
    ///
    /// The children of the root `<svg>` element become the drawn fragment.
    /// Every element whose `id` names a band of `chromosome` and which has
    /// `x`, `y`, `width` and `height` attributes marks that band's rectangle.
    pub fn parse(chromosome: Chromosome, svg: &str) -> Result<Self, String> {
        let mut reader = XmlReader::from_str(svg);
        let mut buf = Vec::new();
        let mut body_start = None;
        let mut bands = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            match event {
                Ok(XmlEvent::Start(ref e)) | Ok(XmlEvent::Empty(ref e)) => {
                    let is_empty = matches!(event, Ok(XmlEvent::Empty(_)));
                    if body_start.is_none() {
                        if e.name().as_ref() != b"svg" {
                            return Err(format!(
                                "Chromosome {} ideogram does not start with an <svg> element",
                                chromosome
                            ));
                        }
                        if is_empty {
                            return Ok(Self {
                                body: String::new(),
                                bands,
                            });
                        }
                        body_start = Some(reader.buffer_position() as usize);
                    } else if let Some(band) = band_rect(chromosome, &read_attrs(e)) {
                        bands.push(band);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(format!(
                        "Chromosome {} ideogram is not valid XML: {}",
                        chromosome, e
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        let start = body_start
            .ok_or_else(|| format!("Chromosome {} ideogram has no <svg> element", chromosome))?;
        let end = svg
            .rfind("</svg>")
            .filter(|&end| end >= start)
            .ok_or_else(|| format!("Chromosome {} ideogram has no closing </svg>", chromosome))?;

        Ok(Self {
            body: svg[start..end].trim().to_string(),
            bands,
        })
    }

    /// Plain ideogram drawn from the band names alone: the bands stacked in
    /// order down a column of the chromosome's grid cell, with a label
    /// underneath.
    pub fn schematic(
        chromosome: Chromosome,
        bands: &[BandInformation],
        canvas: &SvgCanvas,
        style: &DiagramStyle,
    ) -> Self {
        let cell_width = canvas.cell_width();
        let cell_height = canvas.cell_height();
        let x = cell_width * COLUMN_X;
        let width = cell_width * COLUMN_WIDTH;
        let top = cell_height * TOP_MARGIN;
        let column_height = cell_height * (1.0 - TOP_MARGIN - LABEL_SPACE);

        let mut body = String::new();
        let mut placed = Vec::with_capacity(bands.len());

        body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="1" rx="{:.2}" />"#,
            x,
            top,
            width,
            column_height,
            escape_attr(&style.band_stroke),
            width / 2.0
        ));

        if !bands.is_empty() {
            let band_height = column_height / bands.len() as f64;
            for (i, band) in bands.iter().enumerate() {
                let y = top + band_height * i as f64;
                let fill = if i % 2 == 0 {
                    escape_attr(&style.band_fill_light)
                } else {
                    escape_attr(&style.band_fill_dark)
                };
                body.push_str(&format!(
                    r#"<rect id="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="0.5" />"#,
                    escape_attr(band.name()),
                    x,
                    y,
                    width,
                    band_height,
                    fill,
                    escape_attr(&style.band_stroke)
                ));
                placed.push((band.clone(), SvgArea::new(x, y, width, band_height)));
            }
        }

        body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="middle">{}</text>"#,
            x + width / 2.0,
            top + column_height + cell_height * LABEL_SPACE / 2.0 + style.font_size / 3.0,
            escape_attr(&style.font_family),
            style.font_size,
            escape_attr(&style.label_color),
            escape_text(&chromosome.label())
        ));

        Self {
            body,
            bands: placed,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn bands(&self) -> &[(BandInformation, SvgArea)] {
        &self.bands
    }
}

fn band_rect(chromosome: Chromosome, attrs: &[(String, String)]) -> Option<(BandInformation, SvgArea)> {
    let id = attrs.iter().find(|(k, _)| k == "id").map(|(_, v)| v.as_str())?;
    let band = match BandInformation::parse(id) {
        Ok(band) => band,
        Err(e) => {
            debug!(%chromosome, id, error = %e, "ideogram element id is not a band");
            return None;
        }
    };
    if band.chromosome() != chromosome {
        debug!(%chromosome, band = %band, "ideogram names a band of another chromosome");
        return None;
    }

    let area = SvgArea::new(
        get_number(attrs, "x")?,
        get_number(attrs, "y")?,
        get_number(attrs, "width")?,
        get_number(attrs, "height")?,
    );
    Some((band, area))
}
