// src/pipeline.rs

//! Load → layout → write, plus the catch-all boundary used by the binary.

use std::backtrace::Backtrace;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::{NetworkError, Result};
use crate::html::{open_in_browser, render_html, write_html, PageOptions};
use crate::layout::{build_network, relayout, LayoutParams};
use crate::network::Network;
use crate::raster::RasterCanvas;
use crate::render::draw_export;
use crate::svg::SvgCanvas;
use crate::table::{load_rows, ColumnNames};
use crate::view::ViewState;

/// Everything needed to go from a correlation table to a rendered network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub input: PathBuf,
    pub central: String,
    pub output: PathBuf,
    pub columns: ColumnNames,
    pub layout: LayoutParams,
    /// `None` draws a fresh seed; it is logged so the run can be repeated.
    pub seed: Option<u64>,
    pub title: Option<String>,
    pub open_browser: bool,
    pub relayout_on_load: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input: PathBuf::from("data/tumor.csv"),
            central: "GCH1".to_string(),
            output: PathBuf::from("Network Tumor/index.html"),
            columns: ColumnNames::default(),
            layout: LayoutParams::default(),
            seed: None,
            title: None,
            open_browser: true,
            relayout_on_load: true,
        }
    }
}

impl NetworkConfig {
    pub fn new(input: impl Into<PathBuf>, central: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        NetworkConfig {
            input: input.into(),
            central: central.into(),
            output: output.into(),
            ..NetworkConfig::default()
        }
    }

    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            format!(
                "Gene Association Network Centered on {} (PCC >= {})",
                self.central, self.layout.threshold
            )
        })
    }
}

/// Size and density of a static export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub width: f64,
    pub height: f64,
    pub density: f64,
    /// Apply the "Optimize Layout" relayout before drawing.
    pub optimize: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            width: 1600.0,
            height: 1000.0,
            density: 3.0,
            optimize: false,
        }
    }
}

/// A finished run: the network as written and the seed that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedNetwork {
    pub network: Network,
    pub seed: u64,
    pub output: PathBuf,
}

pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

/// Load the table and lay the network out with a `ChaCha8Rng` seeded from
/// `seed`.
pub fn build(config: &NetworkConfig, seed: u64, rng: &mut ChaCha8Rng) -> Result<Network> {
    let rows = load_rows(&config.input, &config.columns)?;
    info!("Laying out network around {} with seed {}", config.central, seed);
    build_network(&rows, &config.central, &config.layout, rng)
}

/// Write the interactive page for `config`, opening it afterwards if asked.
pub fn generate(config: &NetworkConfig) -> Result<GeneratedNetwork> {
    let seed = resolve_seed(config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let network = build(config, seed, &mut rng)?;
    report(&network);

    let mut options = PageOptions::new(config.title(), seed);
    options.relayout = config.layout.relayout;
    options.relayout_on_load = config.relayout_on_load;
    let html = render_html(&network, &options)?;
    write_html(&config.output, &html)?;

    if config.open_browser {
        if let Err(err) = open_in_browser(&config.output) {
            warn!(
                "Could not open a browser ({}); open {} manually",
                err,
                config.output.display()
            );
        }
    }

    Ok(GeneratedNetwork {
        network,
        seed,
        output: config.output.clone(),
    })
}

/// Draw the network into a PNG or SVG file, picked by the output extension.
pub fn export(config: &NetworkConfig, export: &ExportOptions) -> Result<GeneratedNetwork> {
    let format = ExportFormat::from_path(&config.output)?;
    let seed = resolve_seed(config.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut network = build(config, seed, &mut rng)?;
    if export.optimize {
        relayout(&mut network, &config.layout.relayout, &mut rng);
    }
    report(&network);

    if let Some(dir) = config.output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let view = ViewState::new(export.width, export.height);
    let title = config.title();
    match format {
        ExportFormat::Png => {
            let mut canvas = RasterCanvas::new(export.width, export.height, export.density)?;
            draw_export(&mut canvas, &view, &network, &title);
            canvas.save_png(&config.output)?;
        }
        ExportFormat::Svg => {
            let mut canvas = SvgCanvas::new(export.width, export.height, export.density);
            draw_export(&mut canvas, &view, &network, &title);
            canvas.save(&config.output)?;
        }
    }

    Ok(GeneratedNetwork {
        network,
        seed,
        output: config.output.clone(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(ExportFormat::Png),
            Some("svg") => Ok(ExportFormat::Svg),
            _ => Err(NetworkError::InvalidConfig(format!(
                "cannot tell the export format of {}; use .png or .svg",
                path.display()
            ))),
        }
    }
}

/// Failure boundary: any error is logged with its causes and a backtrace,
/// and the caller gets `None`.
pub fn create_web_network(config: &NetworkConfig) -> Option<GeneratedNetwork> {
    generate(config).map_err(|e| log_failure(&e)).ok()
}

/// `create_web_network` for static exports.
pub fn create_export(config: &NetworkConfig, export_options: &ExportOptions) -> Option<GeneratedNetwork> {
    export(config, export_options).map_err(|e| log_failure(&e)).ok()
}

fn log_failure(err: &NetworkError) {
    error!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
    error!("{}", Backtrace::force_capture());
}

/// Coloured per-tissue table on stderr: swatch, name, genes passing the
/// threshold and genes placed.
pub fn print_summary(network: &Network) -> std::io::Result<()> {
    let stderr = StandardStream::stderr(ColorChoice::Auto);
    let mut out = stderr.lock();
    write_summary(&mut out, network)
}

pub fn write_summary<W: WriteColor>(out: &mut W, network: &Network) -> std::io::Result<()> {
    writeln!(
        out,
        "\n{} tissues, {} genes, {} edges around {}",
        network.tissues().count(),
        network.genes().count(),
        network.edges.len(),
        network.central().id
    )?;
    for tissue in network.tissues() {
        let mut swatch = ColorSpec::new();
        swatch.set_fg(Some(Color::Rgb(
            tissue.color.red,
            tissue.color.green,
            tissue.color.blue,
        )));
        out.set_color(&swatch)?;
        write!(out, "██")?;
        out.reset()?;
        writeln!(
            out,
            " {:<32} n={:<6} placed={}",
            tissue.name,
            tissue.gene_count.unwrap_or(0),
            network.gene_indices_of(&tissue.id).len()
        )?;
    }
    out.flush()
}

fn report(network: &Network) {
    if let Err(err) = print_summary(network) {
        warn!("Could not print the tissue summary: {}", err);
    }
}
