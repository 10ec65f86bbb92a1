//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::geo::GeoPoint;

/// Search, slug and proximity tools for the NSW public schools dataset
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "schoolfinder.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Download the dataset even when the cached copy is fresh
    #[arg(long, global = true)]
    pub refresh: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Download the dataset into the local cache
    #[command(visible_alias = "f")]
    Fetch {
        /// Delete cached snapshots before downloading
        #[arg(long)]
        clear: bool,
    },

    /// Filter, search and sort schools
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        args: SearchArgs,
    },

    /// Show one school by slug or school code
    Show {
        /// URL slug, with or without the leading `/`
        #[arg(required_unless_present = "code")]
        slug: Option<String>,

        /// Look the school up by its code instead
        #[arg(long, conflicts_with = "slug")]
        code: Option<String>,

        /// Print JSON instead of a summary
        #[arg(short, long)]
        json: bool,
    },

    /// List every routable school path
    Slugs {
        /// Print `{slug, code, name}` objects
        #[arg(short, long)]
        json: bool,
    },

    /// Compare up to five schools side by side
    #[command(visible_alias = "c")]
    Compare {
        /// Slugs of the schools to compare
        #[arg(required = true, num_args = 1..)]
        slugs: Vec<String>,

        /// Print JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },

    /// Suggest Australian addresses for a partial query
    Suggest {
        /// Address text (at least three characters)
        text: String,

        /// Print JSON instead of one address per line
        #[arg(short, long)]
        json: bool,
    },

    /// Print when the dataset was last extracted
    Updated,

    /// Serve the search API over HTTP
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Search command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Text matched against school name and suburb (case-insensitive)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Exact level of schooling, e.g. "Primary School"
    #[arg(short, long)]
    pub level: Option<String>,

    /// Reference point as LAT,LON; results are sorted nearest first
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, conflicts_with = "address")]
    pub near: Option<GeoPoint>,

    /// Geocode an address and use it as the reference point
    #[arg(short, long)]
    pub address: Option<String>,

    /// Radius in km around the reference point (0 = no limit)
    #[arg(short, long, default_value_t = 0.0)]
    pub radius: f64,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Results per page (defaults to `[search] per_page`)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Print JSON instead of a table
    #[arg(short, long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pub pretty: bool,

    /// Restrict JSON records to these fields (comma-separated)
    #[arg(short, long, value_delimiter = ',', requires = "json")]
    pub fields: Option<Vec<String>>,
}
