//! Product management commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use salon_core::form::{Attachment, SubmitRequest};
use salon_core::table::Column;
use salon_core::types::RecordId;
use salon_core::{Product, Resource, Session};

use super::resource::{
    self, DeleteArgs, ListArgs, WatchArgs, attachment_path, load_admin_session, submit_and_report,
};

#[derive(Args, Debug)]
pub struct ProductsCommand {
    #[command(subcommand)]
    pub command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsSubcommand {
    /// List products
    List(ListArgs),

    /// Follow the products collection live
    Watch(WatchArgs),

    /// Add a new product
    Add(AddArgs),

    /// Edit an existing product
    Edit(EditArgs),

    /// Delete a product
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Description shown on the shop page
    #[arg(long)]
    pub description: String,

    /// Price in EUR
    #[arg(long)]
    pub price: f64,

    /// Product photo to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the product to edit
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    /// Replace the product photo
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Columns of the admin products table.
pub fn columns() -> Vec<Column<Product>> {
    vec![
        Column::new("Name", |p: &Product| p.name.clone()),
        Column::numeric("Price", |p: &Product| format!("{:.2} €", p.price)),
        Column::new("Image", |p: &Product| match &p.image_url {
            Some(_) => "yes".to_string(),
            None => "-".to_string(),
        }),
        Column::new("Id", |p: &Product| p.id.to_string()),
    ]
}

pub async fn handle(cmd: ProductsCommand) -> Result<()> {
    match cmd.command {
        ProductsSubcommand::List(args) => resource::run_list(args, columns()).await,
        ProductsSubcommand::Watch(args) => resource::run_watch(args, columns()).await,
        ProductsSubcommand::Add(args) => add(args).await,
        ProductsSubcommand::Edit(args) => edit(args).await,
        ProductsSubcommand::Delete(args) => resource::run_delete(args, columns()).await,
    }
}

fn image_attachment(image: &PathBuf) -> Result<Attachment> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image '{}'", image.display()))?;
    Ok(Attachment {
        path: attachment_path("products", image),
        bytes,
        url_field: "imageURL",
    })
}

async fn add(args: AddArgs) -> Result<()> {
    let session = load_admin_session().await?;

    let draft = Product::draft(&args.name, &args.description, args.price);
    let attachment = args.image.as_ref().map(image_attachment).transpose()?;

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Product::collection(),
            existing: None,
            draft,
            attachment,
        },
        Product::schema(),
        &format!("Product added: \"{}\"", args.name),
    )
    .await
}

async fn edit(args: EditArgs) -> Result<()> {
    let session = load_admin_session().await?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let current = session
        .get(&Product::collection(), &id)
        .await
        .context("Failed to load product")?;
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

    let attachment = args.image.as_ref().map(image_attachment).transpose()?;

    let label = draft
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&args.id)
        .to_string();

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Product::collection(),
            existing: Some(id),
            draft,
            attachment,
        },
        Product::schema(),
        &format!("Product updated: \"{}\"", label),
    )
    .await
}
