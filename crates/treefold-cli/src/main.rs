#![allow(clippy::doc_markdown)]
//! `treefold` - bounded fan-out trees from lexicon snapshots and directories.

mod local;
mod logging;
mod outline;
mod snapshot;


use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;
use tracing::info;
use treefold_core::files::FileTreeBuilder;
use treefold_core::lexicon::{registry, PartOfSpeech};
use treefold_core::walker::{walk, Query, ShapeFlags};
use treefold_core::TreefoldConfig;

use crate::local::LocalDirectory;

/// Turns cyclic concept graphs and directory trees into bounded fan-out trees
#[derive(Parser, Debug)]
#[command(name = "treefold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./treefold.toml when present)
    #[arg(short, long, global = true, env = "TREEFOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk a lexicon snapshot from a word or concept id
    Walk {
        /// JSON lexicon snapshot
        #[arg(short, long)]
        lexicon: PathBuf,

        /// Word or concept id to start from
        #[arg(short, long)]
        query: String,

        /// Restrict word senses to one part of speech (noun, verb, adj, adv)
        #[arg(long)]
        pos: Option<PartOfSpeech>,

        /// Recursion depth
        #[arg(short, long)]
        depth: Option<usize>,

        /// Targets expanded per relation kind
        #[arg(long)]
        max_links: Option<usize>,

        /// Relation symbols to follow, comma separated (default: all)
        #[arg(short, long, value_delimiter = ',')]
        relations: Vec<String>,

        /// Shaping flags, e.g. "RAISE_RECURSION | EDGE_LABELS"
        #[arg(short, long)]
        shape: Option<String>,

        /// Emit already-expanded concepts as leaves
        #[arg(long)]
        dedup: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,
    },

    /// List a directory as a bounded tree
    Files {
        /// Root directory
        path: PathBuf,

        /// Listed directory levels
        #[arg(short, long)]
        depth: Option<usize>,

        /// Include entries starting with '.'
        #[arg(long)]
        hidden: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,
    },

    /// Show the relation registry
    Relations,

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Indented outline
    Outline,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging)?;

    match cli.command {
        Commands::Walk {
            lexicon,
            query,
            pos,
            depth,
            max_links,
            relations,
            shape,
            dedup,
            format,
        } => {
            let mut config = config;
            let traversal = &mut config.traversal;
            if let Some(depth) = depth {
                traversal.max_depth = depth;
            }
            if let Some(max_links) = max_links {
                traversal.max_links = max_links;
            }
            if !relations.is_empty() {
                traversal.relations = relations;
            }
            if let Some(shape) = shape {
                traversal.shape = ShapeFlags::parse(&shape)?;
            }
            traversal.dedup_visited |= dedup;

            let mut query = Query::new(query);
            query.pos = pos;
            cmd_walk(&config, &lexicon, &query, format)
        }
        Commands::Files {
            path,
            depth,
            hidden,
            format,
        } => {
            let mut settings = config.files;
            if let Some(depth) = depth {
                settings.max_depth = depth;
            }
            settings.show_hidden |= hidden;
            let root = FileTreeBuilder::new(&LocalDirectory, settings)
                .build(&path)
                .with_context(|| format!("Failed to list {}", path.display()))?;
            match format {
                OutputFormat::Json => print_json(&root),
                OutputFormat::Outline => {
                    print!("{}", outline::render(&root));
                    Ok(())
                }
            }
        }
        Commands::Relations => {
            cmd_relations();
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TreefoldConfig> {
    let config = match path {
        Some(path) => TreefoldConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TreefoldConfig::load().context("Failed to load configuration")?,
    };
    config.validate()?;
    Ok(config)
}

fn cmd_walk(
    config: &TreefoldConfig,
    lexicon_path: &Path,
    query: &Query,
    format: OutputFormat,
) -> Result<()> {
    let traversal = config.traversal_config()?;
    let lexicon = snapshot::load(lexicon_path)?;
    let output = walk(&lexicon, query, &traversal)?;
    info!(
        nodes = output.stats.nodes_created,
        interrupted = output.stats.interrupted,
        "Walk finished"
    );

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Outline => {
            print!("{}", outline::render(&output.root));
            if !output.cross_edges.is_empty() {
                println!("{}", "Cross edges:".bold());
                print!("{}", outline::render_edges(&output.cross_edges));
            }
            println!("{}", outline::render_stats(&output.stats).dimmed());
            Ok(())
        }
    }
}

fn cmd_relations() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Symbol", "Label", "Recurses", "Icon", "Color"]);
    for descriptor in registry().iter() {
        table.add_row(vec![
            descriptor.symbol.to_string(),
            descriptor.label.to_string(),
            if descriptor.recurses { "yes" } else { "no" }.to_string(),
            descriptor.icon.to_string(),
            descriptor.color.to_string(),
        ]);
    }
    println!("{table}");
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}
