pub mod association;
pub mod band;
pub mod canvas;
pub mod chromosome;
pub mod context;
pub mod document;
pub mod error;
pub mod ideogram;
pub mod nexus;
pub mod renderlet;

pub use association::{AssociationRenderlet, FanLine};
pub use band::{Arm, BandError, BandInformation};
pub use canvas::{SvgArea, SvgCanvas, Transform};
pub use chromosome::{Chromosome, ChromosomeRenderlet};
pub use context::{BandOrdering, RenderingContext};
pub use document::{RenderedDiagram, build_diagram};
pub use error::{BandResolution, RenderError};
pub use ideogram::Ideogram;
pub use nexus::{Dispatch, RenderSummary, RenderingEvent, RenderletNexus, SkippedEntity};
pub use renderlet::{Renderlet, RenderletKind, standard_renderlets};
