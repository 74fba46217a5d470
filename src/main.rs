use clap::{Args, Parser, Subcommand};
use coexnet::layout::LayoutParams;
use coexnet::pipeline::{create_export, create_web_network, ExportOptions, NetworkConfig};
use coexnet::table::ColumnNames;
use std::path::PathBuf;

/// coexnet: gene–tissue correlation network renderer
#[derive(Parser, Debug)]
#[command(
    name = "coexnet",
    about = "Render a gene–tissue correlation table as an interactive network",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the interactive HTML page and open it in the browser
    Html(HtmlArgs),
    /// Draw the network into a static PNG or SVG file
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
struct NetworkArgs {
    /// Path to the correlation table (CSV)
    #[arg(short, long, value_name = "CSV", default_value = "data/tumor.csv")]
    input: PathBuf,
    /// Identifier of the central node
    #[arg(short, long, value_name = "GENE", default_value = "GCH1")]
    central: String,
    /// Minimum correlation for a gene to be shown
    #[arg(long, value_name = "PCC", default_value_t = 0.8)]
    threshold: f64,
    /// Maximum number of genes kept per tissue
    #[arg(long, value_name = "N", default_value_t = 150)]
    max_genes: usize,
    /// Seed for the layout jitter (random when omitted)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Column holding the tissue label
    #[arg(long, value_name = "NAME", default_value = "Tumor")]
    tissue_column: String,
    /// Column holding the gene symbol
    #[arg(long, value_name = "NAME", default_value = "Gene Symbol")]
    gene_column: String,
    /// Column holding the correlation coefficient
    #[arg(long, value_name = "NAME", default_value = "PCC")]
    pcc_column: String,
    /// Title shown above the network
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct HtmlArgs {
    #[command(flatten)]
    network: NetworkArgs,
    /// Path of the HTML file to write
    #[arg(short, long, value_name = "FILE", default_value = "Network Tumor/index.html")]
    output: PathBuf,
    /// Do not open the page after writing it
    #[arg(long, default_value_t = false)]
    no_open: bool,
    /// Show the generated layout as is instead of relayouting on page load
    #[arg(long, default_value_t = false)]
    no_relayout_on_load: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    network: NetworkArgs,
    /// Output image (.png or .svg)
    #[arg(short, long, value_name = "FILE", default_value = "gene_association_network.png")]
    output: PathBuf,
    /// Canvas width in screen pixels
    #[arg(long, default_value_t = 1600.0)]
    width: f64,
    /// Canvas height in screen pixels
    #[arg(long, default_value_t = 1000.0)]
    height: f64,
    /// Device pixels per screen pixel
    #[arg(long, default_value_t = 3.0)]
    density: f64,
    /// Apply the "Optimize Layout" relayout before drawing
    #[arg(long, default_value_t = false)]
    optimize: bool,
}

impl NetworkArgs {
    fn into_config(self, output: PathBuf) -> NetworkConfig {
        NetworkConfig {
            input: self.input,
            central: self.central,
            output,
            columns: ColumnNames {
                tissue: self.tissue_column,
                gene: self.gene_column,
                pcc: self.pcc_column,
            },
            layout: LayoutParams {
                threshold: self.threshold,
                max_genes_per_tissue: self.max_genes,
                ..LayoutParams::default()
            },
            seed: self.seed,
            title: self.title,
            ..NetworkConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let generated = match cli.command {
        Command::Html(args) => {
            let HtmlArgs {
                network,
                output,
                no_open,
                no_relayout_on_load,
            } = args;
            let mut config = network.into_config(output);
            config.open_browser = !no_open;
            config.relayout_on_load = !no_relayout_on_load;
            create_web_network(&config)
        }
        Command::Export(args) => {
            let ExportArgs {
                network,
                output,
                width,
                height,
                density,
                optimize,
            } = args;
            let config = network.into_config(output);
            let options = ExportOptions {
                width,
                height,
                density,
                optimize,
            };
            create_export(&config, &options)
        }
    };

    if generated.is_none() {
        std::process::exit(1);
    }
}
