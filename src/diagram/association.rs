use tracing::{trace, warn};

use super::band::{Arm, BandInformation};
use super::canvas::SvgArea;
use super::context::RenderingContext;
use super::error::{BandResolution, RenderError};
use super::nexus::{RenderingEvent, RenderletNexus};
use super::renderlet::Renderlet;
use crate::config::DiagramStyle;
use crate::ontology::Iri;
use crate::xml::escape_attr;

const LENGTH_FACTOR: f64 = 1.75;
/// Horizontal run of the diagonal part of a bent line, in band widths
const ELBOW_FACTOR: f64 = 0.75;
const RADIUS_FACTOR: f64 = 0.35;
const TRAITS_PER_DROP: i64 = 6;
const BASE_DROP: i64 = 2;

const LINE_Z_INDEX: i32 = 1;

const RENDERLET_NAME: &str = "Association renderlet";

/// How far a p-arm line may climb past its neighbour, in units of radius
pub fn drop_for(trait_count: usize) -> i64 {
    // Floor division: an association about no trait climbs one step less
    (trait_count as i64 - 1).div_euclid(TRAITS_PER_DROP) + BASE_DROP
}

/// Geometry of one association line, in the band's coordinate frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanLine {
    pub x: f64,
    /// Height the line leaves the band at: the band's vertical centre
    pub y: f64,
    pub width: f64,
    pub length: f64,
    /// Vertical extent of the bend; zero for a straight line, negative when
    /// bending upwards
    pub height: f64,
}

impl FanLine {
    pub fn layout(
        band: &SvgArea,
        arm: Arm,
        predecessor: Option<&SvgArea>,
        trait_count: usize,
    ) -> Self {
        let new_y = band.center_y();
        let mut height = 0.0;

        if let Some(previous) = predecessor {
            match arm {
                Arm::P => {
                    let radius = RADIUS_FACTOR * band.width;
                    let min = previous.y - drop_for(trait_count) as f64 * radius;
                    if min <= new_y {
                        height = min - new_y;
                    }
                }
                Arm::Q => {
                    let min = previous.bottom();
                    if min >= new_y {
                        height = min - new_y;
                    }
                }
            }
        }

        Self {
            x: band.x,
            y: new_y,
            width: band.width,
            length: LENGTH_FACTOR * band.width,
            height,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.height == 0.0
    }

    /// Relative SVG path: a straight run, or a run of one band width
    /// followed by a diagonal elbow
    pub fn path(&self) -> String {
        if self.is_flat() {
            format!("m {:.2},{:.2} {:.2},0", self.x, self.y, self.length)
        } else {
            format!(
                "m {:.2},{:.2} {:.2},0 {:.2},{:.2}",
                self.x,
                self.y,
                self.width,
                ELBOW_FACTOR * self.width,
                self.height
            )
        }
    }

    pub fn area(&self) -> SvgArea {
        SvgArea::new(self.x, self.y, self.length, self.height)
    }
}

/// Draws trait-association entities as fanned lines from their band
#[derive(Debug, Clone)]
pub struct AssociationRenderlet {
    class: Iri,
    style: DiagramStyle,
}

impl AssociationRenderlet {
    pub fn new(class: Iri, style: DiagramStyle) -> Self {
        Self { class, style }
    }

    /// The single band every variant of `association` lies in
    pub fn resolve_band(
        &self,
        context: &RenderingContext<'_>,
        association: &Iri,
    ) -> Result<BandInformation, RenderError> {
        let oracle = context.oracle();
        let vocabulary = context.vocabulary();

        let variants: Vec<Iri> = oracle
            .related_by(association, &vocabulary.is_about)
            .into_iter()
            .filter(|subject| oracle.types_of(subject).contains(&vocabulary.variant_class))
            .collect();

        let mut chosen: Option<(Iri, BandInformation)> = None;
        for variant in variants {
            let band = self.band_of(context, association, &variant)?;
            match &chosen {
                None => chosen = Some((variant, band)),
                Some((first, first_band)) if *first_band != band => warn!(
                    %association,
                    %first,
                    band = %first_band,
                    other = %variant,
                    other_band = %band,
                    "variants of association lie in different bands, using the first"
                ),
                Some(_) => {}
            }
        }

        chosen
            .map(|(_, band)| band)
            .ok_or_else(|| RenderError::UnresolvableBand {
                entity: association.clone(),
                reason: BandResolution::NoVariant,
            })
    }

    fn band_of(
        &self,
        context: &RenderingContext<'_>,
        association: &Iri,
        variant: &Iri,
    ) -> Result<BandInformation, RenderError> {
        let oracle = context.oracle();
        let vocabulary = context.vocabulary();
        let unresolvable = |reason| RenderError::UnresolvableBand {
            entity: association.clone(),
            reason,
        };

        let locations = oracle.related_by(variant, &vocabulary.located_in);
        if locations.len() > 1 {
            return Err(unresolvable(BandResolution::MultipleLocations {
                variant: variant.clone(),
                count: locations.len(),
            }));
        }
        let Some(band) = locations.into_iter().next() else {
            return Err(unresolvable(BandResolution::NoLocation {
                variant: variant.clone(),
            }));
        };

        let names = oracle.literals_by(&band, &vocabulary.has_name);
        if names.len() > 1 {
            return Err(unresolvable(BandResolution::MultipleNames {
                count: names.len(),
                band,
            }));
        }
        let Some(name) = names.into_iter().next() else {
            return Err(unresolvable(BandResolution::MissingName { band }));
        };

        BandInformation::parse(&name).map_err(|source| RenderError::MalformedBandName {
            entity: association.clone(),
            source,
        })
    }

    /// Distinct traits the association is about: every subject that is not
    /// a genetic variant
    pub fn trait_count(&self, context: &RenderingContext<'_>, association: &Iri) -> usize {
        let oracle = context.oracle();
        let vocabulary = context.vocabulary();
        oracle
            .related_by(association, &vocabulary.is_about)
            .iter()
            .filter(|subject| !oracle.types_of(subject).contains(&vocabulary.variant_class))
            .count()
    }

    fn line_style(&self) -> String {
        format!(
            "fill:none;stroke:{};stroke-width:{};stroke-linecap:butt;stroke-linejoin:miter;stroke-opacity:1",
            escape_attr(&self.style.association_stroke),
            self.style.association_stroke_width
        )
    }
}

impl Renderlet for AssociationRenderlet {
    fn name(&self) -> &str {
        RENDERLET_NAME
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
        trace!(association = %entity, "rendering association");

        let band = self.resolve_band(context, entity)?;
        let ordering = context.band_ordering();

        if let Some(area) = context.rendered_band(&band).copied() {
            trace!(
                association = %entity,
                band = %band,
                "band already has an association line, logging secondary event"
            );
            nexus.publish(RenderingEvent::new(entity.clone(), String::new(), area, self.name()));
            return Ok(());
        }

        let Some(location) = nexus.band_location(&band).copied() else {
            return Err(RenderError::UnknownPlacement {
                entity: entity.clone(),
                band: band.name().to_string(),
            });
        };
        let predecessor = ordering
            .previous(&band)
            .and_then(|previous| nexus.band_location(previous))
            .copied();
        let traits = self.trait_count(context, entity);

        let line = FanLine::layout(&location, band.arm(), predecessor.as_ref(), traits);
        let transform = band.chromosome().transform(&context.canvas());

        let svg = format!(
            r#"<g id="{}" transform="{}" class="gwas-trait"><path d="{}" style="{}" /></g>"#,
            escape_attr(entity.as_str()),
            transform,
            line.path(),
            self.line_style()
        );
        let area = line
            .area()
            .with_transform(transform)
            .with_z_index(LINE_Z_INDEX);

        context.record_rendered_band(band, area);
        nexus.publish(RenderingEvent::new(entity.clone(), svg, area, self.name()));
        Ok(())
    }
}
