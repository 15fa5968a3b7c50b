// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nodebind` - plan and apply attribute bindings from scene files.
//!
//! A scene lists node kinds and the nodes to build from them. `plan` prints
//! the edges each node would produce, `apply` builds the nodes in an
//! in-memory graph and prints the result.

mod scene;

use clap::{Parser, Subcommand};
use nodebind_graph::EditMode;
use scene::{AppError, GraphDump, Scene};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nodebind")]
#[command(about = "Resolve attribute bindings into graph edits")]
#[command(version)]
struct Cli {
    /// Log binding decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the edges every node would produce
    Plan {
        /// Path to a .ron scene
        file: PathBuf,

        /// Print plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the scene and print the resulting graph
    Apply {
        /// Path to a .ron scene
        file: PathBuf,

        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the bindable slots of a node kind
    Slots {
        /// Path to a .ron scene
        file: PathBuf,

        /// Node kind to inspect
        kind: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let env_filter = log_filter(EnvFilter::try_from_default_env().ok(), cli.verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Plan { file, json } => plan(&file, json),
        Commands::Apply { file, json } => apply(&file, json),
        Commands::Slots { file, kind } => slots(&file, &kind),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Filter for the fmt layer. A `RUST_LOG` filter is used as is unless
/// `-v` asks for debug output from the nodebind crates.
fn log_filter(from_env: Option<EnvFilter>, verbose: bool) -> EnvFilter {
    let mut filter = match from_env {
        Some(filter) if !verbose => return filter,
        from_env => from_env.unwrap_or_default(),
    };
    let level = if verbose { "debug" } else { "info" };
    for directive in [format!("nodebind_graph={level}"), format!("nodebind_app={level}")] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn plan(file: &std::path::Path, json: bool) -> Result<(), AppError> {
    let plans = Scene::load(file)?.plan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in &plans {
        println!(
            "# {} ({} connect, {} set, {} transfer)",
            plan.node,
            plan.count(EditMode::Connect),
            plan.count(EditMode::Set),
            plan.count(EditMode::Transfer)
        );
        print!("{plan}");
    }
    Ok(())
}

fn apply(file: &std::path::Path, json: bool) -> Result<(), AppError> {
    let (backend, built) = Scene::load(file)?.apply()?;
    let dump = GraphDump::capture(&backend);

    if json {
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    for node in &built {
        let s = &node.summary;
        println!(
            "{}: {} connected, {} set, {} transferred, {} skipped",
            node.name, s.connected, s.set, s.transferred, s.skipped
        );
    }

    println!();
    for node in &dump.nodes {
        println!("{} ({})", node.name, node.kind);
        for (attr, value) in &node.values {
            println!("  {attr} = {value}");
        }
    }

    if !dump.connections.is_empty() {
        println!();
        for (source, dest) in &dump.connections {
            println!("{source} -> {dest}");
        }
    }
    Ok(())
}

fn slots(file: &std::path::Path, kind: &str) -> Result<(), AppError> {
    let template = Scene::load(file)?.slots(kind)?;
    print!("{template}");
    Ok(())
}
