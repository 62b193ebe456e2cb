use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tagsync",
    about = "Reconcile a curated OSM dataset against the live OSM database",
    version,
)]
pub struct Cli {
    /// Input .osm file with the curated dataset
    pub input: PathBuf,

    /// Administrative area the remote data is fetched from
    #[arg(long, default_value = "Norge")]
    pub region: String,

    /// Output file (defaults to <input>_update.osm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log file (defaults to <input>_update_log_<date>.txt)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// TOML file overriding the default merge policy
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Overpass API endpoint
    #[arg(long, default_value = tagsync_overpass::DEFAULT_ENDPOINT)]
    pub overpass_url: String,

    /// Read the remote dataset from a saved Overpass JSON response
    /// instead of querying the API
    #[arg(long)]
    pub cached_remote: Option<PathBuf>,

    /// Overpass query timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
