//! # ScanPOS Terminal Application
//!
//! Startup and dispatch for the `scanpos` binary.
//!
//! ## Module Organization
//! ```text
//! scanpos_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap arguments
//! ├── config.rs       ◄─── AppConfig (defaults < TOML < env < --db)
//! ├── error.rs        ◄─── ApiError for every command
//! ├── render.rs       ◄─── tabled output
//! ├── session.rs      ◄─── Interactive scan loop
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── product.rs  ◄─── Product CRUD and list
//!     ├── cart.rs     ◄─── Scan and line edits
//!     ├── checkout.rs ◄─── Cart → invoice
//!     └── invoice.rs  ◄─── History and clear
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse arguments (clap)                                              │
//! │  2. Install tracing (stderr, RUST_LOG or default filter)                │
//! │  3. Load AppConfig, apply --db                                          │
//! │  4. Open SQLite, run migrations                                         │
//! │  5. Dispatch the command, print its output on stdout                    │
//! │  6. Close the pool                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod session;

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, InvoiceCommand, ProductCommand};
use config::AppConfig;
use error::ApiError;
use scanpos_core::listing::{InvoiceQuery, ProductQuery};
use scanpos_db::{Database, DbConfig, KeyValueStore};
use session::Session;

/// Parses arguments, runs one command and reports the outcome.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=scanpos=trace` - Trace for scanpos crates only
/// - Default: `info,scanpos=debug,sqlx=warn`
///
/// Logs go to stderr so tables on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scanpos=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(cli: Cli) -> Result<(), ApiError> {
    let config = AppConfig::load(cli.config)?.with_database_path(cli.db);
    let path = config.resolve_database_path()?;
    info!(?path, "Opening database");

    let db = Database::new(DbConfig::new(path)).await?;

    let stdout = std::io::stdout();
    let result = dispatch(&db, &config, cli.command, &mut stdout.lock()).await;

    if let Err(err) = &result {
        error!(code = ?err.code, message = %err.message, "Command failed");
    }

    db.close().await;
    result
}

/// Runs one command against `store`, writing its output to `out`.
pub async fn dispatch<S, W>(
    store: &S,
    config: &AppConfig,
    command: Command,
    out: &mut W,
) -> Result<(), ApiError>
where
    S: KeyValueStore + Clone,
    W: Write,
{
    match command {
        Command::Product(ProductCommand::Add(args)) => {
            let product = commands::add_product(store, args.into_new_product()?).await?;
            writeln!(out, "Added {} ({})", product.name, product.id)?;
            writeln!(out, "{}", render::product_detail(config, &product))?;
        }
        Command::Product(ProductCommand::Show { id }) => {
            let product = commands::get_product(store, &id).await?;
            writeln!(out, "{}", render::product_detail(config, &product))?;
        }
        Command::Product(ProductCommand::Edit(args)) => {
            let id = args.id.clone();
            let product = commands::edit_product(store, &id, args.into_patch()?).await?;
            writeln!(out, "Updated {}", product.id)?;
            writeln!(out, "{}", render::product_detail(config, &product))?;
        }
        Command::Product(ProductCommand::Delete { id }) => {
            commands::delete_product(store, &id).await?;
            writeln!(out, "Deleted {}", id.trim())?;
        }
        Command::Product(ProductCommand::List(args)) => {
            let products = commands::list_products(store, &ProductQuery::from(args)).await?;
            writeln!(out, "{}", render::products_table(config, &products))?;
        }
        Command::Invoice(InvoiceCommand::List(args)) => {
            let invoices = commands::list_invoices(store, &InvoiceQuery::from(args)).await?;
            writeln!(out, "{}", render::invoices_table(config, &invoices))?;
        }
        Command::Invoice(InvoiceCommand::Clear { yes }) => {
            if !yes {
                return Err(ApiError::validation(
                    "Clearing history deletes every invoice; pass --yes to confirm",
                ));
            }
            let removed = commands::clear_history(store).await?;
            writeln!(out, "Removed {removed} invoice(s).")?;
        }
        Command::Session => {
            let mut session = Session::new(store.clone(), config.clone());
            session
                .run(BufReader::new(tokio::io::stdin()), out)
                .await?;
        }
    }

    Ok(())
}
