//! Ontopath CLI
//!
//! Front end for the rewriting pipeline: load an ontology, parse a
//! query, rewrite it into a union of conjunctive queries and optionally
//! translate that union to Cypher.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use ontopath_core::Rewriter;
use ontopath_cypher::CypherTranslator;
use ontopath_ontology::Ontology;
use ontopath_parser::parse_query;

#[derive(Parser)]
#[command(name = "ontopath")]
#[command(
    author,
    version,
    about = "Ontology-mediated query rewriting for DL-Lite with paths"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a query against an ontology and print the query union.
    Rewrite {
        /// Ontology document in OWL functional syntax.
        #[arg(short, long)]
        ontology: PathBuf,
        /// The query, e.g. 'q(x):-teaches(x,y),Course(y)'.
        #[arg(short, long)]
        query: String,
        /// Emit the rewritten queries as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a query and translate the result to a Cypher union.
    Translate {
        /// Ontology document in OWL functional syntax.
        #[arg(short, long)]
        ontology: PathBuf,
        /// The query, e.g. 'q(x):-teaches(x,y),Course(y)'.
        #[arg(short, long)]
        query: String,
    },
    /// Print an ontology's signature and normalized axioms.
    Ontology {
        /// Ontology document in OWL functional syntax.
        #[arg(short, long)]
        ontology: PathBuf,
        /// Emit the ontology as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rewrite { ontology, query, json } => cmd_rewrite(&ontology, &query, json),
        Commands::Translate { ontology, query } => cmd_translate(&ontology, &query),
        Commands::Ontology { ontology, json } => cmd_ontology(&ontology, json),
    }
}

fn load_ontology(path: &Path) -> Result<Ontology> {
    Ontology::load(path).with_context(|| format!("failed to load ontology {}", path.display()))
}

fn cmd_rewrite(path: &Path, query: &str, json: bool) -> Result<()> {
    let ontology = load_ontology(path)?;
    let parsed = parse_query(query, &ontology)?;
    let rewritten = Rewriter::new(&ontology).rewrite(&parsed);

    if json {
        println!("{}", serde_json::to_string_pretty(&rewritten)?);
        return Ok(());
    }
    println!(
        "{} rewrites {} into {} queries:",
        "ontopath".bold(),
        parsed.to_string().cyan(),
        rewritten.len().to_string().bold()
    );
    for q in &rewritten {
        println!("  {q}");
    }
    Ok(())
}

fn cmd_translate(path: &Path, query: &str) -> Result<()> {
    let ontology = load_ontology(path)?;
    let parsed = parse_query(query, &ontology)?;
    let rewritten = Rewriter::new(&ontology).rewrite(&parsed);
    let cypher = CypherTranslator::new().translate(&parsed.head, &rewritten)?;
    println!("{cypher}");
    Ok(())
}

fn cmd_ontology(path: &Path, json: bool) -> Result<()> {
    let ontology = load_ontology(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ontology)?);
        return Ok(());
    }
    if let Some(iri) = ontology.iri() {
        println!("{} {}", "ontology".bold(), iri);
    }
    println!("{}", "classes:".bold());
    for class in ontology.classes() {
        println!("  {}", class.name());
    }
    println!("{}", "properties:".bold());
    for prop in ontology.properties() {
        println!("  {}", prop.name());
    }
    println!("{}", "axioms:".bold());
    for axiom in ontology.axioms() {
        println!("  {axiom}");
    }
    Ok(())
}
