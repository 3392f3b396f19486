use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagram::SvgCanvas;
use crate::ontology::Vocabulary;

const CLASSIC_BACKGROUND: &str = "#ffffff";
const CLASSIC_ASSOCIATION_STROKE: &str = "#000000";
const CLASSIC_BAND_FILL_LIGHT: &str = "#f2f2f2";
const CLASSIC_BAND_FILL_DARK: &str = "#9e9e9e";
const CLASSIC_BAND_STROKE: &str = "#4d4d4d";
const CLASSIC_LABEL: &str = "#000000";
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

const ASSOCIATION_STROKE_WIDTH: f64 = 1.0;
const FONT_SIZE: f64 = 12.0;
const CANVAS_WIDTH: f64 = 1200.0;
const CANVAS_HEIGHT: f64 = 1000.0;

const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("classic", include_str!("../styles/classic.toml")),
    ("dark", include_str!("../styles/dark.toml")),
    ("print", include_str!("../styles/print.toml")),
];

/// Colours and fonts of a diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_association_stroke")]
    pub association_stroke: String,
    #[serde(default = "default_association_stroke_width")]
    pub association_stroke_width: f64,
    #[serde(default = "default_band_fill_light")]
    pub band_fill_light: String,
    #[serde(default = "default_band_fill_dark")]
    pub band_fill_dark: String,
    #[serde(default = "default_band_stroke")]
    pub band_stroke: String,
    #[serde(default = "default_label_color")]
    pub label_color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_background() -> String {
    CLASSIC_BACKGROUND.to_string()
}
fn default_association_stroke() -> String {
    CLASSIC_ASSOCIATION_STROKE.to_string()
}
fn default_association_stroke_width() -> f64 {
    ASSOCIATION_STROKE_WIDTH
}
fn default_band_fill_light() -> String {
    CLASSIC_BAND_FILL_LIGHT.to_string()
}
fn default_band_fill_dark() -> String {
    CLASSIC_BAND_FILL_DARK.to_string()
}
fn default_band_stroke() -> String {
    CLASSIC_BAND_STROKE.to_string()
}
fn default_label_color() -> String {
    CLASSIC_LABEL.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_font_size() -> f64 {
    FONT_SIZE
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            background: default_background(),
            association_stroke: default_association_stroke(),
            association_stroke_width: ASSOCIATION_STROKE_WIDTH,
            band_fill_light: default_band_fill_light(),
            band_fill_dark: default_band_fill_dark(),
            band_stroke: default_band_stroke(),
            label_color: default_label_color(),
            font_family: default_font_family(),
            font_size: FONT_SIZE,
        }
    }
}

impl DiagramStyle {
    pub fn from_builtin(name: &str) -> Result<Self, String> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_STYLES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                format!(
                    "Unknown built-in style '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                )
            })?;
        toml::from_str(content).map_err(|e| format!("Failed to parse built-in style '{}': {}", name, e))
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_STYLES.iter().map(|(n, _)| *n).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    #[serde(default = "default_canvas_height")]
    pub height: f64,
}

fn default_canvas_width() -> f64 {
    CANVAS_WIDTH
}
fn default_canvas_height() -> f64 {
    CANVAS_HEIGHT
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub style: DiagramStyle,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    /// Directory of pre-drawn chromosome ideograms, one `<label>.svg` each
    #[serde(default)]
    pub ideogram_dir: Option<PathBuf>,
}

impl DiagramConfig {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse config YAML: {}", e))
    }

    /// Read a TOML or YAML config file. TOML is tried first.
    ///
    /// A relative `ideogram_dir` is resolved against the config file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        let mut config = match Self::from_toml(&content) {
            Ok(config) => config,
            Err(toml_err) => Self::from_yaml(&content).map_err(|yaml_err| {
                format!(
                    "Failed to parse config {} as TOML ({}) or YAML ({})",
                    path.display(),
                    toml_err,
                    yaml_err
                )
            })?,
        };

        if let (Some(dir), Some(base)) = (config.ideogram_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.ideogram_dir = Some(base.join(dir));
            }
        }
        Ok(config)
    }

    pub fn canvas(&self) -> SvgCanvas {
        SvgCanvas::new(self.canvas.width, self.canvas.height)
    }
}
