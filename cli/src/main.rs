//! qrbadge CLI - QR codes with a logo badge.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qrbadge_core::constants::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use qrbadge_core::{Color, Config, EcLevel, ExportFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrbadge")]
#[command(about = "Generate QR codes with a community logo in the center", long_about = None)]
struct Cli {
    /// Community list URL
    #[arg(long, global = true)]
    communities_url: Option<String>,

    /// Logo used when the selected one cannot be loaded
    #[arg(long, global = true)]
    fallback_logo: Option<String>,

    /// Directory exported files are written to
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// Exported file name prefix
    #[arg(long, global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(url) = &self.communities_url {
            config.communities_url = url.clone();
        }
        if let Some(logo) = &self.fallback_logo {
            config.fallback_logo = Some(logo.clone());
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.file_prefix = prefix.clone();
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive form session (default)
    Interactive,
    /// Generate once and save the result
    Generate(GenerateArgs),
    /// List communities and the default pick
    Communities,
    /// Show error correction levels
    Levels,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Text, URL or any data to encode
    pub payload: String,

    /// Community logo, by list index or name
    #[arg(short, long, conflicts_with_all = ["logo", "no_logo"])]
    pub community: Option<String>,

    /// Image file to use as the logo
    #[arg(short, long, conflicts_with = "no_logo")]
    pub logo: Option<PathBuf>,

    /// Render the bare symbol
    #[arg(long)]
    pub no_logo: bool,

    /// Module color
    #[arg(long, default_value = DEFAULT_FOREGROUND)]
    pub fg: Color,

    /// Background color
    #[arg(long, default_value = DEFAULT_BACKGROUND)]
    pub bg: Color,

    /// Error correction level (L, M, Q, H)
    #[arg(long, default_value_t = EcLevel::H)]
    pub ec: EcLevel,

    /// Which files to write (png, svg, both)
    #[arg(short, long, default_value_t = ExportFormat::Both)]
    pub format: ExportFormat,

    /// Print a terminal preview of the symbol
    #[arg(long)]
    pub preview: bool,

    /// Print the rendered snapshot and logo outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("qrbadge=info".parse()?)
                .add_directive("qrbadge_core=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => commands::run_interactive(config).await?,
        Commands::Generate(args) => commands::run_generate(config, args).await?,
        Commands::Communities => commands::list_communities(config).await,
        Commands::Levels => commands::show_levels(),
    }

    Ok(())
}
