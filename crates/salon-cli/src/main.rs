//! salon - Admin CLI for the salon CMS.
//!
//! This is a thin wrapper over the salon library crates, covering the
//! admin CRUD tables, the public catalog view and the small site
//! utilities (opening hours, gallery rotation, booking redirect).

mod backend;
mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, blog, book, catalog, gallery, hours, products, services, stylists};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd).await,
        Commands::Services(cmd) => services::handle(cmd).await,
        Commands::Stylists(cmd) => stylists::handle(cmd).await,
        Commands::Products(cmd) => products::handle(cmd).await,
        Commands::Blog(cmd) => blog::handle(cmd).await,
        Commands::Catalog(args) => catalog::run(args).await,
        Commands::Hours(args) => hours::run(args).await,
        Commands::Gallery(args) => gallery::run(args).await,
        Commands::Book(args) => book::run(args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
