use clap::{Parser, Subcommand};
use minimal_site::client::HttpContentClient;
use minimal_site::error::PipelineError;
use minimal_site::{build, config, fetch, output, paths, render};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minimal-site")]
#[command(about = "Resolve site and page content from a headless content repository")]
#[command(long_about = "\
Resolve site and page content from a headless content repository

The site item holds the navigation pages and the header/footer logos. Every
page is made of sections; sections that reference an image get a responsive
descriptor (webp and jpg srcsets plus the native upload).

Run 'minimal-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log pipeline progress (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the paths that would be pre-generated
    Paths,
    /// Fetch the site item with its navigation and logos
    Site {
        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch one page with its section images resolved
    Page {
        /// Page slug
        slug: String,
        /// Print the model as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,
        /// Print the sections as HTML, with a <picture> per resolved image
        #[arg(long)]
        html: bool,
    },
    /// Write the props of every path to the output directory
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Paths => {
            let (site_config, client) = connect(&cli.config)?;
            let paths = paths::enumerate_paths(&client, &site_config)?;
            output::print_paths(&paths);
        }
        Command::Site { json } => {
            let (site_config, client) = connect(&cli.config)?;
            let site = fetch::fetch_site(&client, &site_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&site)?);
            } else {
                output::print_site(&site);
            }
        }
        Command::Page { slug, json, html } => {
            let (site_config, client) = connect(&cli.config)?;
            match fetch::fetch_page(&client, &site_config, &slug) {
                Ok(page) if json => println!("{}", serde_json::to_string_pretty(&page)?),
                Ok(page) if html => println!("{}", render::page_sections(&page).into_string()),
                Ok(page) => output::print_page(&page),
                Err(PipelineError::Content(err)) if json => {
                    println!("{}", serde_json::to_string_pretty(&err)?);
                    std::process::exit(1);
                }
                Err(PipelineError::Content(err)) => {
                    println!("{}", render::error_notice(&err).into_string());
                    std::process::exit(1);
                }
                Err(other) => return Err(other.into()),
            }
        }
        Command::Build { output: output_dir } => {
            let (site_config, client) = connect(&cli.config)?;
            println!("==> Building {}", output_dir.display());
            let entries = build::build(&client, &site_config, &output_dir)?;
            output::print_build_output(&entries);
            println!("==> Build complete: {}", output_dir.display());
        }
    }

    Ok(())
}

/// Load and validate the config, size the thread pool, and build the client.
fn connect(
    path: &Path,
) -> Result<(config::SiteConfig, HttpContentClient), config::ConfigError> {
    let site_config = config::load_config(path)?;
    init_thread_pool(&site_config.processing);
    let client = HttpContentClient::new(&site_config.server);
    Ok((site_config, client))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
