//! Stylist management commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use salon_core::form::{Attachment, SubmitRequest};
use salon_core::table::Column;
use salon_core::types::RecordId;
use salon_core::{Resource, Session, Stylist};

use super::resource::{
    self, DeleteArgs, ListArgs, WatchArgs, attachment_path, load_admin_session, submit_and_report,
};

#[derive(Args, Debug)]
pub struct StylistsCommand {
    #[command(subcommand)]
    pub command: StylistsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StylistsSubcommand {
    /// List stylists
    List(ListArgs),

    /// Follow the stylists collection live
    Watch(WatchArgs),

    /// Add a new stylist
    Add(AddArgs),

    /// Edit an existing stylist
    Edit(EditArgs),

    /// Delete a stylist
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Short biography
    #[arg(long)]
    pub bio: String,

    /// Specialty ("balayage", "barbering")
    #[arg(long)]
    pub specialty: String,

    /// Profile photo to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the stylist to edit
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub specialty: Option<String>,

    /// Replace the profile photo
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

/// Columns of the admin stylists table.
pub fn columns() -> Vec<Column<Stylist>> {
    vec![
        Column::new("Name", |s: &Stylist| s.name.clone()),
        Column::new("Specialty", |s: &Stylist| s.specialty.clone()),
        Column::new("Photo", |s: &Stylist| match &s.photo_url {
            Some(_) => "yes".to_string(),
            None => "-".to_string(),
        }),
        Column::new("Id", |s: &Stylist| s.id.to_string()),
    ]
}

pub async fn handle(cmd: StylistsCommand) -> Result<()> {
    match cmd.command {
        StylistsSubcommand::List(args) => resource::run_list(args, columns()).await,
        StylistsSubcommand::Watch(args) => resource::run_watch(args, columns()).await,
        StylistsSubcommand::Add(args) => add(args).await,
        StylistsSubcommand::Edit(args) => edit(args).await,
        StylistsSubcommand::Delete(args) => resource::run_delete(args, columns()).await,
    }
}

fn photo_attachment(photo: &PathBuf) -> Result<Attachment> {
    let bytes = std::fs::read(photo)
        .with_context(|| format!("Failed to read photo '{}'", photo.display()))?;
    Ok(Attachment {
        path: attachment_path("stylists", photo),
        bytes,
        url_field: "photoURL",
    })
}

async fn add(args: AddArgs) -> Result<()> {
    let session = load_admin_session().await?;

    let draft = Stylist::draft(&args.name, &args.bio, &args.specialty);
    let attachment = args.photo.as_ref().map(photo_attachment).transpose()?;

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Stylist::collection(),
            existing: None,
            draft,
            attachment,
        },
        Stylist::schema(),
        &format!("Stylist added: \"{}\"", args.name),
    )
    .await
}

async fn edit(args: EditArgs) -> Result<()> {
    let session = load_admin_session().await?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let current = session
        .get(&Stylist::collection(), &id)
        .await
        .context("Failed to load stylist")?;
    let mut draft = current.fields;

    if let Some(name) = &args.name {
        draft.insert("name", json!(name));
    }
    if let Some(bio) = &args.bio {
        draft.insert("bio", json!(bio));
    }
    if let Some(specialty) = &args.specialty {
        draft.insert("specialty", json!(specialty));
    }

    let attachment = args.photo.as_ref().map(photo_attachment).transpose()?;

    let label = draft
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&args.id)
        .to_string();

    submit_and_report(
        &session,
        SubmitRequest {
            collection: Stylist::collection(),
            existing: Some(id),
            draft,
            attachment,
        },
        Stylist::schema(),
        &format!("Stylist updated: \"{}\"", label),
    )
    .await
}
