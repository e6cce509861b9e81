//! # autoblog CLI
//!
//! Command-line interface for the autoblog post generator.

mod commands;
mod gemini;
mod git;

use clap::{Parser, Subcommand};
use commands::PostArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoblog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "autoblog.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Gemini API key; without it rewriting and image generation are skipped
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(flatten)]
    post: PostArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a post from a script (the default command)
    Post(PostArgs),

    /// Rebuild sitemap.xml from the posts on disk
    Sitemap,

    /// Write a starter autoblog.yml
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing autoblog.yml
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let api_key = cli.api_key.as_deref();
    match cli.command {
        Some(Commands::Post(args)) => commands::create_post(&cli.config, api_key, args),
        Some(Commands::Sitemap) => commands::regenerate_sitemap(&cli.config),
        Some(Commands::Init { path, force }) => commands::init_project(path.as_deref(), force),
        None => commands::create_post(&cli.config, api_key, cli.post),
    }
}
