//! Blog post management commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use salon_core::form::{Attachment, SubmitRequest};
use salon_core::table::Column;
use salon_core::types::{RecordId, Slug};
use salon_core::{BlogPost, Resource, Session};

use super::resource::{
    self, DeleteArgs, ListArgs, WatchArgs, attachment_path, load_admin_session, submit_and_report,
};
use crate::session::storage;

#[derive(Args, Debug)]
pub struct BlogCommand {
    #[command(subcommand)]
    pub command: BlogSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BlogSubcommand {
    /// List blog posts
    List(ListArgs),

    /// Follow the blog collection live
    Watch(WatchArgs),

    /// Publish a new post
    Add(AddArgs),

    /// Edit an existing post
    Edit(EditArgs),

    /// Delete a post
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Post title
    #[arg(long)]
    pub title: String,

    /// Post body (markdown); use @path to read from a file
    #[arg(long)]
    pub content: String,

    /// Cover image to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the post to edit
    pub id: String,

    /// New title (the slug is re-derived)
    #[arg(long)]
    pub title: Option<String>,

    /// New body (markdown); use @path to read from a file
    #[arg(long)]
    pub content: Option<String>,

    /// Replace the cover image
    #[arg(long)]
    pub image: Option<PathBuf>,
}

/// Columns of the admin blog table.
pub fn columns() -> Vec<Column<BlogPost>> {
    vec![
        Column::new("Title", |p: &BlogPost| p.title.clone()),
        Column::new("Slug", |p: &BlogPost| p.slug.to_string()),
        Column::new("Author", |p: &BlogPost| {
            p.author_name
                .clone()
                .unwrap_or_else(|| p.author_id.to_string())
        }),
        Column::new("Published", |p: &BlogPost| {
            p.publish_date.format("%Y-%m-%d").to_string()
        }),
        Column::new("Id", |p: &BlogPost| p.id.to_string()),
    ]
}

pub async fn handle(cmd: BlogCommand) -> Result<()> {
    match cmd.command {
        BlogSubcommand::List(args) => resource::run_list(args, columns()).await,
        BlogSubcommand::Watch(args) => resource::run_watch(args, columns()).await,
        BlogSubcommand::Add(args) => add(args).await,
        BlogSubcommand::Edit(args) => edit(args).await,
        BlogSubcommand::Delete(args) => resource::run_delete(args, columns()).await,
    }
}

/// `--content @path` reads the body from a file.
fn resolve_content(content: &str) -> Result<String> {
    if let Some(path) = content.strip_prefix('@') {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file '{}'", path));
    }
    Ok(content.to_string())
}

fn cover_attachment(image: &PathBuf) -> Result<Attachment> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image '{}'", image.display()))?;
    Ok(Attachment {
        path: attachment_path("blog", image),
        bytes,
        url_field: "imageURL",
    })
}

async fn add(args: AddArgs) -> Result<()> {
    let session = load_admin_session().await?;
    let content = resolve_content(&args.content)?;
    let author_name = storage::stored_handle()?;

    let draft = BlogPost::create_draft(
        &args.title,
        &content,
        session.uid(),
        author_name.as_deref(),
    );
    let attachment = args.image.as_ref().map(cover_attachment).transpose()?;

    submit_and_report(
        &session,
        SubmitRequest {
            collection: BlogPost::collection(),
            existing: None,
            draft,
            attachment,
        },
        BlogPost::schema(),
        &format!(
            "Post published: \"{}\" ({})",
            args.title,
            Slug::from_title(&args.title)
        ),
    )
    .await
}

async fn edit(args: EditArgs) -> Result<()> {
    let session = load_admin_session().await?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let current = session
        .get(&BlogPost::collection(), &id)
        .await
        .context("Failed to load post")?;
    let mut draft = current.fields;

    let content = args.content.as_deref().map(resolve_content).transpose()?;
    // The slug tracks the title at write time.
    let changes = BlogPost::update_draft(args.title.as_deref(), content.as_deref());
    draft.merge_from(&changes);

    let attachment = args.image.as_ref().map(cover_attachment).transpose()?;

    let label = draft
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or(&args.id)
        .to_string();

    submit_and_report(
        &session,
        SubmitRequest {
            collection: BlogPost::collection(),
            existing: Some(id),
            draft,
            attachment,
        },
        BlogPost::schema(),
        &format!("Post updated: \"{}\"", label),
    )
    .await
}
