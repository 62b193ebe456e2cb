use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use colored::Colorize;
use serde::Deserialize;

use tagsync_engine::{build_vocabulary, discover_ref_key, reconcile, MergePolicy};
use tagsync_model::Element;
use tagsync_osm::{read_nodes_file, write_osm_file};
use tagsync_overpass::{build_query, OverpassClient};

use crate::cli::Cli;

/// A saved Overpass JSON response, used with `--cached-remote`.
#[derive(Deserialize)]
struct CachedRemote {
    #[serde(default)]
    elements: Vec<Element>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| derived_output_path(&cli.input));
    let log_path = cli
        .log
        .clone()
        .unwrap_or_else(|| derived_log_path(&cli.input, &today));

    let input = read_nodes_file(&cli.input)
        .with_context(|| format!("reading input file {}", cli.input.display()))?;

    let ref_key = discover_ref_key(&input)?;
    println!("\nUpdating elements with '{}'", ref_key.key.bold());
    if ref_key.count < input.len() {
        println!(
            "{} elements in input file ({} with {} key)",
            input.len(),
            ref_key.count,
            ref_key.key
        );
    } else {
        println!("{} elements in input file", input.len());
    }

    let vocabulary = build_vocabulary(&input, &ref_key.key);
    let policy = load_policy(cli.rules.as_deref())?;

    let mut remote = load_remote(&cli, &ref_key.key)?;
    let with_ref = remote
        .iter()
        .filter(|e| e.tags.contains_key(&ref_key.key))
        .count();
    if remote.len() > with_ref {
        println!(
            "{} elements in OSM with {}, + {} connected elements",
            with_ref,
            ref_key.key,
            remote.len() - with_ref
        );
    } else {
        println!("{} elements in OSM with {}", with_ref, ref_key.key);
    }

    let report = reconcile(&mut remote, &input, &ref_key, &vocabulary, &policy);

    // Output and log are only written once reconciliation has finished,
    // so a failed run never leaves partial files behind.
    let generator = format!("tagsync v{}", env!("CARGO_PKG_VERSION"));
    write_osm_file(&output_path, &remote, &generator)
        .with_context(|| format!("writing output file {}", output_path.display()))?;
    fs::write(
        &log_path,
        report.render(&cli.input.display().to_string(), &today),
    )
    .with_context(|| format!("writing log file {}", log_path.display()))?;

    let stats = report.stats;
    println!(
        "\nSummary of changes written to {}:",
        output_path.display().to_string().bold()
    );
    println!("  Updated:  {}", stats.updated.to_string().green());
    println!("  Added:    {}", stats.added.to_string().green());
    println!(
        "  No match: {} (objects in OSM with {} not found in input file)",
        stats.orphaned.to_string().yellow(),
        ref_key.key
    );
    println!("\nDetails in log file {}", log_path.display());
    Ok(())
}

fn load_policy(rules: Option<&Path>) -> anyhow::Result<MergePolicy> {
    match rules {
        Some(path) => MergePolicy::load(path)
            .with_context(|| format!("loading merge policy {}", path.display())),
        None => Ok(MergePolicy::default()),
    }
}

fn load_remote(cli: &Cli, ref_key: &str) -> anyhow::Result<Vec<Element>> {
    if let Some(path) = &cli.cached_remote {
        println!("Loading cached remote dataset from {}...", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading cached remote {}", path.display()))?;
        let cached: CachedRemote = serde_json::from_str(&text)
            .with_context(|| format!("parsing cached remote {}", path.display()))?;
        return Ok(cached.elements);
    }

    println!("Loading from Overpass...");
    // The HTTP timeout must outlast the server-side query timeout.
    let client = OverpassClient::new(
        cli.overpass_url.clone(),
        Duration::from_secs(cli.timeout_secs + 30),
    )?;
    let query = build_query(ref_key, &cli.region, cli.timeout_secs);
    Ok(client.fetch(&query)?)
}

fn derived_output_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_update.osm", stem(input)))
}

fn derived_log_path(input: &Path, date: &str) -> PathBuf {
    input.with_file_name(format!("{}_update_log_{}.txt", stem(input), date))
}

fn stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "update".to_string())
}
