mod browse;
pub mod config;

use crate::config::CloudnavConfig;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use cloudnav_resource_search::Resource;
use cloudnav_resource_search::SearchEngine;
use cloudnav_resource_search::SearchResult;
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "cloudnav", version, about = "Search a snapshot of cloud resources")]
pub struct Cli {
    /// Resource snapshot: the JSON printed by `az resource list`
    #[arg(short, long, value_name = "FILE")]
    pub resources: PathBuf,

    /// Path to a cloudnav.toml config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank resources matching a query
    Query(QueryArgs),

    /// Autocomplete a partial token
    Suggest(SuggestArgs),

    /// Print one resource with its properties
    Show(ShowArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Interactive search over the snapshot
    Browse,
}

#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Query, e.g. `web type:vm tag:env=prod`
    #[arg(value_name = "QUERY", num_args = 0.., trailing_var_arg = true)]
    pub query: Vec<String>,

    /// Number of results to print
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct SuggestArgs {
    #[arg(value_name = "PARTIAL")]
    pub partial: String,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[arg(value_name = "RESOURCE_ID")]
    pub id: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct StatsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Accepted snapshot shapes: a bare array, or an ARM list page.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    List(Vec<Resource>),
    Page { value: Vec<Resource> },
}

pub fn load_snapshot(path: &Path) -> Result<Vec<Resource>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read resource snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("failed to decode resource snapshot {}", path.display()))?;
    Ok(match snapshot {
        Snapshot::List(resources) | Snapshot::Page { value: resources } => resources,
    })
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = CloudnavConfig::load(self.config.as_deref())?;
        let resources = load_snapshot(&self.resources)?;
        let engine = Arc::new(SearchEngine::new(config.search.clone()));
        engine.set_resources(resources);

        match self.command {
            Command::Query(args) => run_query(&engine, args),
            Command::Suggest(args) => run_suggest(&engine, args),
            Command::Show(args) => run_show(&engine, args),
            Command::Stats(args) => run_stats(&engine, args),
            Command::Browse => browse::run(engine, config.session),
        }
    }
}

fn run_query(engine: &SearchEngine, args: QueryArgs) -> Result<()> {
    let raw = args.query.join(" ");
    let mut results = engine.search(&raw).context("search failed")?;
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No results found", "✗".bright_red());
        return Ok(());
    }

    println!(
        "{} Found {} results\n",
        "✓".bright_green(),
        results.len().to_string().bright_cyan()
    );
    for (idx, result) in results.iter().enumerate() {
        print_result(engine, idx, result);
    }
    Ok(())
}

fn print_result(engine: &SearchEngine, idx: usize, result: &SearchResult) {
    let (resource_type, location) = engine
        .resource(&result.resource_id)
        .map(|resource| (resource.resource_type, resource.location))
        .unwrap_or_default();
    println!(
        "{}. {} {} {}",
        (idx + 1).to_string().bright_yellow(),
        result.name.bright_cyan(),
        resource_type.bright_black(),
        location.bright_black()
    );
    let fields: Vec<String> = result
        .matches
        .iter()
        .map(|hit| format!("{}={}", hit.match_type, hit.match_value))
        .collect();
    println!(
        "   {} {:.1}  {}",
        "Score:".bright_black(),
        result.score,
        fields.join(", ")
    );
}

fn run_suggest(engine: &SearchEngine, args: SuggestArgs) -> Result<()> {
    for suggestion in engine.suggestions(&args.partial) {
        println!("{suggestion}");
    }
    Ok(())
}

fn run_show(engine: &SearchEngine, args: ShowArgs) -> Result<()> {
    let Some(resource) = engine.resource(&args.id) else {
        anyhow::bail!("no resource with id {}", args.id);
    };

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&resource)?);
        return Ok(());
    }

    println!("{}", resource.name.bright_cyan());
    println!("  {} {}", "Id:".bright_black(), resource.id);
    println!("  {} {}", "Type:".bright_black(), resource.resource_type);
    println!("  {} {}", "Location:".bright_black(), resource.location);
    println!("  {} {}", "Resource group:".bright_black(), resource.resource_group);
    if let Some(status) = &resource.status {
        println!("  {} {status}", "Status:".bright_black());
    }
    if !resource.tags.is_empty() {
        let mut tags: Vec<_> = resource.tags.iter().collect();
        tags.sort();
        println!("  {}", "Tags:".bright_black());
        for (key, value) in tags {
            println!("    {key}={value}");
        }
    }
    if !resource.properties.is_empty() {
        println!("  {}", "Properties:".bright_black());
        for (key, value) in &resource.properties {
            println!("    {key}: {value}");
        }
    }
    Ok(())
}

fn run_stats(engine: &SearchEngine, args: StatsArgs) -> Result<()> {
    let stats = engine.stats();
    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("{}", "Index Status".bright_blue());
    println!("  Generation: {}", stats.generation);
    println!("  Resources: {}", stats.resources.bright_cyan());
    println!("  Searchable values: {}", stats.tuples.bright_cyan());
    println!("  Suggestion tokens: {}", stats.tokens.bright_cyan());
    Ok(())
}
