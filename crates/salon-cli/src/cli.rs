//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::blog::BlogCommand;
use crate::commands::book::BookArgs;
use crate::commands::catalog::CatalogArgs;
use crate::commands::gallery::GalleryArgs;
use crate::commands::hours::HoursArgs;
use crate::commands::products::ProductsCommand;
use crate::commands::services::ServicesCommand;
use crate::commands::stylists::StylistsCommand;

/// Admin CLI for the salon CMS.
#[derive(Parser, Debug)]
#[command(name = "salon")]
#[command(author, version = env!("SALON_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account operations (sign up, login, logout, whoami)
    Auth(AuthCommand),

    /// Manage salon services
    Services(ServicesCommand),

    /// Manage stylist profiles
    Stylists(StylistsCommand),

    /// Manage retail products
    Products(ProductsCommand),

    /// Manage blog posts
    Blog(BlogCommand),

    /// Browse the public pricelist with filters and sorting
    Catalog(CatalogArgs),

    /// Show the opening-hours status
    Hours(HoursArgs),

    /// Show today's gallery rotation
    Gallery(GalleryArgs),

    /// Print the booking widget link
    Book(BookArgs),
}
