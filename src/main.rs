use std::path::{Path, PathBuf};

use clap::Parser;
use gwas_ideogram::config::{DiagramConfig, DiagramStyle};
use gwas_ideogram::diagram::{RenderSummary, build_diagram, standard_renderlets};
use gwas_ideogram::export::{self, OutputFormat};
use gwas_ideogram::ontology::InMemoryGraph;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Draw GWAS trait associations on a genome ideogram
#[derive(Parser, Debug)]
#[command(name = "gwas-ideogram")]
#[command(about = "Render GWAS trait associations on a chromosome ideogram as SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Knowledge-base snapshot (.json, .yaml, .yml or .toml; use "-" for JSON on stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Diagram configuration file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Built-in style, overriding the config's colours
    #[arg(short, long, value_name = "STYLE")]
    style: Option<String>,

    /// Directory of chromosome ideogram SVGs named <label>.svg
    #[arg(long, value_name = "DIR")]
    ideograms: Option<PathBuf>,

    /// Canvas width
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    height: Option<f64>,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match args.config.as_deref() {
        Some(path) if path.is_file() => DiagramConfig::load(path)?,
        Some(path) => return Err(format!("Config file not found: {}", path.display())),
        None => DiagramConfig::default(),
    };
    if let Some(name) = args.style.as_deref() {
        config.style = DiagramStyle::from_builtin(name)?;
    }
    if let Some(dir) = args.ideograms {
        config.ideogram_dir = Some(dir);
    }
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }
    if !(config.canvas.width > 0.0 && config.canvas.height > 0.0) {
        return Err(format!(
            "Invalid canvas size {}x{}",
            config.canvas.width, config.canvas.height
        ));
    }

    let format = OutputFormat::from_path(&args.output)?;
    let graph = load_graph(&args.input)?;

    let renderlets = standard_renderlets(&config)?;
    let diagram = build_diagram(&graph, &config, &renderlets);
    report(&diagram.summary);

    let svg = diagram.to_svg(&config.style);
    let data = export::encode(&svg, format, args.png_scale)?;
    std::fs::write(&args.output, data)
        .map_err(|e| format!("Failed to write {}: {}", format.label(), e))?;
    eprintln!("{} saved to: {}", format.label(), args.output.display());

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(input: &Path) -> Result<InMemoryGraph, String> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        return InMemoryGraph::from_json(&buffer);
    }

    let content = std::fs::read_to_string(input)
        .map_err(|e| format!("Failed to read input file: {}", e))?;
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => InMemoryGraph::from_json(&content),
        Some("yaml") | Some("yml") => InMemoryGraph::from_yaml(&content),
        Some("toml") => InMemoryGraph::from_toml(&content),
        _ => Err(format!(
            "Unsupported input format: {} (use .json, .yaml, .yml or .toml)",
            input.display()
        )),
    }
}

fn report(summary: &RenderSummary) {
    eprintln!(
        "Rendered {} entities ({} sharing an existing line, {} already placed)",
        summary.drawn + summary.secondary,
        summary.secondary,
        summary.redundant
    );
    if !summary.is_complete() {
        eprintln!("Left out {} entities:", summary.skipped.len());
        for skipped in &summary.skipped {
            eprintln!("  {}", skipped.error);
        }
    }
}
