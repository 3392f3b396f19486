use std::path::Path;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};
use tracing::debug;

const LOCAL_FONTS: &str = "fonts";

/// File format of a written diagram, chosen by output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or("Output file has no extension")?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                ext
            )),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "SVG",
            OutputFormat::Png => "PNG",
            OutputFormat::Pdf => "PDF",
        }
    }
}

pub fn encode(svg: &str, format: OutputFormat, png_scale: f32) -> Result<Vec<u8>, String> {
    match format {
        OutputFormat::Svg => Ok(svg.as_bytes().to_vec()),
        OutputFormat::Png => svg_to_png(svg, png_scale),
        OutputFormat::Pdf => svg_to_pdf(svg),
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("Invalid --png-scale value: {}", scale));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new(LOCAL_FONTS);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let families = fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str()));
        if let Some(family) = pick_sans_family(families) {
            debug!(%family, "sans-serif fallback for PNG export");
            fontdb.set_sans_serif_family(family);
        }
    }

    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or("Failed to create pixmap")?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| format!("Failed to encode PNG: {}", e))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, String> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new(LOCAL_FONTS);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let families = fontdb
        .faces()
        .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str()));
    if let Some(family) = pick_sans_family(families) {
        debug!(%family, "sans-serif fallback for PDF export");
        fontdb.set_sans_serif_family(family);
    }

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = std::sync::Arc::new(fontdb);

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    // Labels as paths: viewers without the font still show them
    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;
    let page_options = svg2pdf::PageOptions::default();

    svg2pdf::to_pdf(&tree, options, page_options)
        .map_err(|e| format!("Failed to convert SVG to PDF: {}", e))
}

/// Family to stand in for the generic `sans-serif`: the first installed
/// family with "sans" in its name, else the first family at all
fn pick_sans_family<'a>(families: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut first: Option<&str> = None;
    for family in families {
        if family.to_ascii_lowercase().contains("sans") {
            return Some(family.to_string());
        }
        first.get_or_insert(family);
    }
    first.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.svg")), Ok(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("OUT.PNG")), Ok(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("a/b.pdf")), Ok(OutputFormat::Pdf));
        assert!(OutputFormat::from_path(Path::new("diagram")).is_err());
        assert!(OutputFormat::from_path(Path::new("diagram.gif")).is_err());
    }

    #[test]
    fn svg_is_written_verbatim() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        assert_eq!(encode(svg, OutputFormat::Svg, 1.0), Ok(svg.as_bytes().to_vec()));
    }

    #[test]
    fn png_scale_must_be_positive() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        assert!(svg_to_png(svg, 0.0).is_err());
        assert!(svg_to_png(svg, f32::NAN).is_err());
    }

    #[test]
    fn sans_fallback_prefers_sans_families() {
        let families = ["DejaVu Serif", "Noto Sans", "Liberation Sans"];
        assert_eq!(pick_sans_family(families.into_iter()), Some("Noto Sans".to_string()));

        let families = ["DejaVu Serif", "Courier"];
        assert_eq!(pick_sans_family(families.into_iter()), Some("DejaVu Serif".to_string()));

        assert_eq!(pick_sans_family(std::iter::empty()), None);
    }
}
