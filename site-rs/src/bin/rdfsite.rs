//! rdfsite - build, preview and inspect static sites generated from RDF
//!
//! Command-line interface for the site generator

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rdfsite_core::SiteGenerator;

#[derive(Parser)]
#[command(name = "rdfsite")]
#[command(version)]
#[command(about = "Static site generator for RDF data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level logging (RUST_LOG still wins when set)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// No logging at all
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the site described by a config file
    Build {
        /// Path to the YAML config
        config: PathBuf,
        /// Override site_url, e.g. http://localhost:8000 for a local preview
        #[arg(long)]
        site_url: Option<String>,
        /// Keep existing files in the output directory
        #[arg(long)]
        no_clean: bool,
    },
    /// Serve the generated site locally
    Serve {
        /// Path to the YAML config
        config: PathBuf,
        /// Port to listen on
        #[arg(long, short = 'p', default_value_t = 8000)]
        port: u16,
        /// Build the site before serving
        #[arg(long)]
        build: bool,
        /// Override site_url; defaults to http://localhost:<port> when building
        #[arg(long)]
        site_url: Option<String>,
    },
    /// Print which template each resource resolves to, without rendering
    Index {
        /// Path to the YAML config
        config: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Remove the output directory
    Clean {
        /// Path to the YAML config
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build(generator: &SiteGenerator, clean: bool) -> Result<()> {
    if clean {
        generator.clear_site().context("failed to clear output directory")?;
    }

    let resources = generator.extract_resources()?;
    let report = generator.generate_site(&resources)?;

    println!(
        "Generated {} pages in {}",
        report.rendered.len(),
        generator.config().output_path.display()
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} resources outside the resource prefix", report.skipped.len());
    }
    if !report.is_success() {
        for failure in &report.failed {
            eprintln!(
                "  {} ({}): {}",
                failure.resource, failure.template, failure.message
            );
        }
        bail!("{} pages failed to render", report.failed.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Build {
            config,
            site_url,
            no_clean,
        } => {
            let generator = SiteGenerator::new(&config, site_url.as_deref())
                .with_context(|| format!("failed to set up generator from {}", config.display()))?;
            build(&generator, !no_clean)?;
        }

        Commands::Serve {
            config,
            port,
            build: rebuild,
            site_url,
        } => {
            let site_url = match (site_url, rebuild) {
                (Some(url), _) => Some(url),
                (None, true) => Some(format!("http://localhost:{}", port)),
                (None, false) => None,
            };
            let generator = SiteGenerator::new(&config, site_url.as_deref())
                .with_context(|| format!("failed to set up generator from {}", config.display()))?;

            if rebuild {
                build(&generator, true)?;
            }

            println!(
                "Serving {} at http://localhost:{}",
                generator.config().output_path.display(),
                port
            );
            generator.serve_site(port).await?;
        }

        Commands::Index { config, format } => {
            let generator = SiteGenerator::new(&config, None)
                .with_context(|| format!("failed to set up generator from {}", config.display()))?;
            let resources = generator.extract_resources()?;
            let index = generator.build_template_index(&resources)?.to_string_map();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&index)?),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&index)?),
                OutputFormat::Table => {
                    let width = index.keys().map(String::len).max().unwrap_or(8).max(8);
                    println!("{:<width$}  TEMPLATE", "RESOURCE", width = width);
                    for (resource, template) in &index {
                        println!("{:<width$}  {}", resource, template, width = width);
                    }
                    println!("\n{} resources", index.len());
                }
            }
        }

        Commands::Clean { config } => {
            let generator = SiteGenerator::new(&config, None)
                .with_context(|| format!("failed to set up generator from {}", config.display()))?;
            generator.clear_site()?;
            println!("Removed {}", generator.config().output_path.display());
        }
    }

    Ok(())
}
