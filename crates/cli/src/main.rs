//! Loja BMF CLI - catalog and pricing tools for operators.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered
//! loja catalog list --query turbo
//! loja catalog list --category vip --file catalog.json
//!
//! # Validate a catalog file before deploying it
//! loja catalog validate --file catalog.json
//!
//! # Dump the built-in catalog as JSON (a starting point for edits)
//! loja catalog export > catalog.json
//!
//! # Format an amount as BRL
//! loja price 1234.5
//! ```
//!
//! When `--file` is omitted, `STOREFRONT_CATALOG_PATH` (from the environment
//! or `.env`) is used, then the built-in catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "loja")]
#[command(author, version, about = "Loja BMF CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and check catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Format an amount as Brazilian reais
    Price {
        /// Amount, e.g. `37.7`
        amount: String,

        /// Locale tag (`pt-BR`; others use the fixed fallback)
        #[arg(short, long, default_value = "pt-BR")]
        locale: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print products with formatted prices
    List {
        /// Free-text search over name and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category id (e.g. `vip`)
        #[arg(short, long)]
        category: Option<String>,

        /// Catalog JSON file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Load a catalog file and report problems
    Validate {
        /// Catalog JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Print the built-in catalog as JSON
    Export,
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &mut out);

    if let Err(e) = result.and_then(|()| out.flush().map_err(Into::into)) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                query,
                category,
                file,
            } => {
                let file = file.or_else(commands::catalog::path_from_env);
                commands::catalog::list(out, file.as_deref(), &query, category.as_deref())?;
            }
            CatalogAction::Validate { file } => commands::catalog::validate(out, &file)?,
            CatalogAction::Export => commands::catalog::export(out)?,
        },
        Commands::Price { amount, locale } => commands::price::format(out, &amount, &locale)?,
    }
    Ok(())
}
