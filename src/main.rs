//! schoolfinder - search, slug routing and proximity ranking for NSW
//! government schools.

mod cli;
mod config;
mod core;
mod logger;
mod school;
mod source;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, common::Session};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AppConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }
    let session = Session::new(&config, cli.refresh);

    match &cli.command {
        Commands::Fetch { clear } => cli::fetch::run_fetch(&session, *clear),
        Commands::Search { args } => cli::search::run_search(&session, &config, args),
        Commands::Show { slug, code, json } => {
            let found = cli::show::run_show(&session, slug.as_deref(), code.as_deref(), *json)?;
            if !found {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Slugs { json } => cli::slugs::run_slugs(&session, *json),
        Commands::Compare { slugs, json } => cli::compare::run_compare(&session, slugs, *json),
        Commands::Suggest { text, json } => cli::suggest::run_suggest(&session, text, *json),
        Commands::Updated => cli::fetch::run_updated(&session),
        Commands::Serve { .. } => cli::serve::serve(&config, session),
    }
}
