//! Shared plumbing for the admin resource tables.
//!
//! Every collection command (services, stylists, products, blog) reuses
//! the same list/watch/delete flows over the generic resource table; only
//! the column set and the add/edit argument shapes differ per resource.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures_util::StreamExt;

use salon_core::Resource;
use salon_core::documents::decode_all;
use salon_core::form::{FormController, SubmitOutcome, SubmitRequest};
use salon_core::table::{Column, DeleteOutcome, ResourceTable, delete_record, load_into};
use salon_core::traits::ProgressFn;
use salon_core::types::RecordId;

use crate::backend::{CliBackend, CliObjects, objects_for, resolve_store_url};
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Free-text filter over the table rows
    #[arg(long)]
    pub filter: Option<String>,

    /// Page to display (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    /// Comma-separated column headers to show
    #[arg(long)]
    pub columns: Option<String>,

    /// Output rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Store base URL
    #[arg(long)]
    pub store: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Rows per page
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,

    /// Store base URL
    #[arg(long)]
    pub store: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the record to delete
    pub id: String,

    /// Skip the interactive confirmation
    #[arg(long)]
    pub yes: bool,
}

/// One-shot table listing.
pub async fn run_list<T: Resource>(args: ListArgs, columns: Vec<Column<T>>) -> Result<()> {
    let url = resolve_store_url(args.store.as_deref())?;
    let backend = CliBackend::from_url(&url)?;

    let mut table = ResourceTable::new(columns, args.page_size);

    let records = backend
        .list(&T::collection(), &T::default_order())
        .await
        .context("Failed to list records")?;
    let rows: Vec<T> = decode_all(&records).context("Failed to decode records")?;

    if args.json {
        return output::json_pretty(&rows);
    }

    table.apply_snapshot(rows);

    if let Some(filter) = &args.filter {
        table.set_filter(filter.clone());
    }
    if let Some(headers) = &args.columns {
        let keep: Vec<&str> = headers.split(',').map(str::trim).collect();
        table.retain_columns(&keep);
    }
    table.set_page(args.page.saturating_sub(1));

    output::render_table(&table);

    Ok(())
}

/// Live table view over the collection subscription.
pub async fn run_watch<T: Resource>(args: WatchArgs, columns: Vec<Column<T>>) -> Result<()> {
    let url = resolve_store_url(args.store.as_deref())?;
    let backend = CliBackend::from_url(&url)?;

    let mut table: ResourceTable<T> = ResourceTable::new(columns, args.page_size);

    eprintln!("{}", "Watching collection...".dimmed());
    eprintln!("{}", "Press Ctrl+C to stop.".dimmed());
    eprintln!();

    // Structural placeholder until the first snapshot lands.
    output::render_table(&table);

    let mut stream = backend
        .watch(&T::collection(), &T::default_order())
        .context("Failed to start subscription")?;

    while let Some(result) = stream.next().await {
        eprintln!();
        eprintln!(
            "{}",
            format!("[{}]", chrono::Local::now().format("%H:%M:%S")).dimmed()
        );

        match result {
            Ok(snapshot) => match decode_all::<T>(&snapshot) {
                Ok(rows) => table.apply_snapshot(rows),
                Err(e) => table.subscription_failed(e.to_string()),
            },
            Err(e) => table.subscription_failed(e.to_string()),
        }

        output::render_table(&table);
    }

    Ok(())
}

/// Confirm → optimistic removal → store delete, with rollback on failure.
pub async fn run_delete<T: Resource>(args: DeleteArgs, columns: Vec<Column<T>>) -> Result<()> {
    let session = load_admin_session().await?;
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let mut table: ResourceTable<T> = ResourceTable::new(columns, usize::MAX);
    load_into(&session, &mut table)
        .await
        .context("Failed to load records")?;

    let label = table
        .visible_rows()
        .iter()
        .find(|row| row.id() == &id)
        .map(|row| row.label().to_string())
        .with_context(|| format!("No record with id '{}'", id))?;

    let confirmed = args.yes || confirm(&format!("Really delete \"{}\"?", label))?;

    match delete_record(&session, &mut table, &id, confirmed).await {
        DeleteOutcome::Deleted => {
            output::success(&format!("Deleted \"{}\"", label));
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            eprintln!("{}", "Deletion cancelled.".dimmed());
            Ok(())
        }
        DeleteOutcome::Failed(e) => {
            // Distinct from cancellation: the store refused, the row was
            // restored.
            output::error(&format!("Delete failed, record kept: {}", e));
            Err(e.into())
        }
    }
}

/// Interactive y/N confirmation on stderr.
pub fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush().ok();

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Load the persisted admin session or explain how to get one.
pub async fn load_admin_session() -> Result<CliSession> {
    storage::load_session()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'salon auth login' first.")
}

/// Submit a form draft and report the outcome the way the admin UI would.
pub async fn submit_and_report(
    session: &CliSession,
    request: SubmitRequest,
    schema: salon_core::form::Schema,
    saved_message: &str,
) -> Result<()> {
    let objects: Option<CliObjects> = if request.attachment.is_some() {
        Some(objects_for(session)?)
    } else {
        None
    };

    let on_progress: Option<ProgressFn> = request.attachment.as_ref().map(|_| {
        Box::new(|percent: f32| {
            eprint!("\r{}", format!("Uploading... {:>3.0}%", percent).dimmed());
            if percent >= 100.0 {
                eprintln!();
            }
        }) as ProgressFn
    });

    let mut controller = FormController::new(schema);
    let outcome = controller
        .submit(session, objects.as_ref(), request, on_progress, || {})
        .await;

    match outcome {
        SubmitOutcome::Saved { id, .. } => {
            output::success(saved_message);
            output::field("Id", id.as_str());
            Ok(())
        }
        SubmitOutcome::Invalid(violations) => {
            for violation in &violations {
                output::error(&format!("{}: {}", violation.field, violation.message));
            }
            anyhow::bail!("validation failed ({} field(s))", violations.len())
        }
        SubmitOutcome::Failed(e) => {
            output::error(&format!("Save failed: {}", e));
            Err(e.into())
        }
    }
}

/// Object-store path for an attachment: collection prefix, upload time,
/// original file name.
pub fn attachment_path(prefix: &str, file: &std::path::Path) -> String {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin");
    format!(
        "{}/{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        name
    )
}
