//! Service management commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use salon_core::form::SubmitRequest;
use salon_core::table::Column;
use salon_core::types::RecordId;
use salon_core::{Resource, Service, Session};

use super::resource::{
    self, DeleteArgs, ListArgs, WatchArgs, load_admin_session, submit_and_report,
};

#[derive(Args, Debug)]
pub struct ServicesCommand {
    #[command(subcommand)]
    pub command: ServicesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ServicesSubcommand {
    /// List services
    List(ListArgs),

    /// Follow the services collection live
    Watch(WatchArgs),

    /// Add a new service
    Add(AddArgs),

    /// Edit an existing service
    Edit(EditArgs),

    /// Delete a service
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Service name
    #[arg(long)]
    pub name: String,

    /// Description shown in the catalog
    #[arg(long)]
    pub description: String,

    /// Price in EUR
    #[arg(long, allow_negative_numbers = true)]
    pub price: f64,

    /// Duration in minutes
    #[arg(long)]
    pub duration: u32,

    /// Category (cut, coloring, styling, updo)
    #[arg(long)]
    pub category: String,

    /// Discounted price while a promotion runs
    #[arg(long, allow_negative_numbers = true)]
    pub sale_price: Option<f64>,

    /// Second-level grouping within the category
    #[arg(long)]
    pub subcategory: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the service to edit
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    #[arg(long)]
    pub duration: Option<u32>,

    /// Category (cut, coloring, styling, updo)
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub sale_price: Option<f64>,

    /// Clear the sale price
    #[arg(long, conflicts_with = "sale_price")]
    pub clear_sale_price: bool,

    #[arg(long)]
    pub subcategory: Option<String>,
}

/// Columns of the admin services table.
pub fn columns() -> Vec<Column<Service>> {
    vec![
        Column::new("Name", |s: &Service| s.name.clone()),
        Column::new("Category", |s: &Service| s.category.to_string()),
        Column::numeric("Price", |s: &Service| match s.sale_price {
            Some(sale) => format!("{:.2} € (was {:.2} €)", sale, s.price),
            None => format!("{:.2} €", s.price),
        }),
        Column::numeric("Duration", |s: &Service| format!("{} min", s.duration)),
        Column::new("Id", |s: &Service| s.id.to_string()),
    ]
}

pub async fn handle(cmd: ServicesCommand) -> Result<()> {
    match cmd.command {
        ServicesSubcommand::List(args) => resource::run_list(args, columns()).await,
        ServicesSubcommand::Watch(args) => resource::run_watch(args, columns()).await,
        ServicesSubcommand::Add(args) => add(args).await,
        ServicesSubcommand::Edit(args) => edit(args).await,
        ServicesSubcommand::Delete(args) => resource::run_delete(args, columns()).await,
    }
}

async fn add(args: AddArgs) -> Result<()> {
    let session = load_admin_session().await?;

    let mut draft = Service::draft(
        &args.name,
        &args.description,
        args.price,
        args.duration,
        &args.category,
    );
    if let Some(sale) = args.sale_price {
        draft.insert("salePrice", json!(sale));
    }
    if let Some(subcategory) = &args.subcategory {
        draft.insert("subcategory", json!(subcategory));
    }

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Service::collection(),
            existing: None,
            draft,
            attachment: None,
        },
        Service::schema(),
        &format!("Service added: \"{}\"", args.name),
    )
    .await
}

async fn edit(args: EditArgs) -> Result<()> {
    let session = load_admin_session().await?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    // Pre-populate from the current record so validation sees the full
    // document; the save itself is a merge of the changed fields.
    let current = session
        .get(&Service::collection(), &id)
        .await
        .context("Failed to load service")?;
    let mut draft = current.fields;

    if let Some(name) = &args.name {
        draft.insert("name", json!(name));
    }
    if let Some(description) = &args.description {
        draft.insert("description", json!(description));
    }
    if let Some(price) = args.price {
        draft.insert("price", json!(price));
    }
    if let Some(duration) = args.duration {
        draft.insert("duration", json!(duration));
    }
    if let Some(category) = &args.category {
        draft.insert("category", json!(category));
    }
    if let Some(sale) = args.sale_price {
        draft.insert("salePrice", json!(sale));
    }
    if args.clear_sale_price {
        draft.insert("salePrice", serde_json::Value::Null);
    }
    if let Some(subcategory) = &args.subcategory {
        draft.insert("subcategory", json!(subcategory));
    }

    let label = draft
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&args.id)
        .to_string();

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Service::collection(),
            existing: Some(id),
            draft,
            attachment: None,
        },
        Service::schema(),
        &format!("Service updated: \"{}\"", label),
    )
    .await
}
