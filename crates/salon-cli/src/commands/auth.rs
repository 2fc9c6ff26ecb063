//! Account commands: sign up, login, logout, whoami.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use salon_core::types::Credentials;

use crate::backend::{CliBackend, resolve_store_url};
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Create a new admin account
    Signup(SignupArgs),

    /// Create a new session (login)
    Login(LoginArgs),

    /// Clear the stored session
    Logout,

    /// Display the active session
    Whoami,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Account handle (usually an email address)
    pub handle: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Contact email when it differs from the handle
    #[arg(long)]
    pub email: Option<String>,

    /// Store base URL
    #[arg(long)]
    pub store: Option<String>,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Handle or uid to authenticate with
    #[arg(long)]
    pub identifier: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Store base URL
    #[arg(long)]
    pub store: Option<String>,
}

pub async fn handle(cmd: AuthCommand) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Signup(args) => signup(args).await,
        AuthSubcommand::Login(args) => login(args).await,
        AuthSubcommand::Logout => logout().await,
        AuthSubcommand::Whoami => whoami().await,
    }
}

async fn signup(args: SignupArgs) -> Result<()> {
    let url = resolve_store_url(args.store.as_deref())?;
    let backend = CliBackend::from_url(&url)?;

    let output = backend
        .sign_up(&args.handle, &args.password, args.email.as_deref())
        .await
        .context("Failed to create account")?;

    output::success("Account created");
    println!();
    output::field("Uid", output.uid.as_str());
    output::field("Handle", &output.handle);
    output::field("Store", url.as_str());

    Ok(())
}

async fn login(args: LoginArgs) -> Result<()> {
    let url = resolve_store_url(args.store.as_deref())?;
    let backend = CliBackend::from_url(&url)?;
    let credentials = Credentials::new(&args.identifier, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let session = backend
        .sign_in(credentials)
        .await
        .context("Failed to login")?;

    storage::save_session(&session, Some(&args.identifier))
        .await
        .context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("Uid", session.uid().as_str());
    output::field("Store", session.store_url().as_str());

    Ok(())
}

async fn logout() -> Result<()> {
    storage::clear_session()
        .await
        .context("Failed to clear session")?;

    output::success("Signed out");

    Ok(())
}

async fn whoami() -> Result<()> {
    let session = storage::load_session()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'salon auth login' first.")?;

    output::field("Uid", session.uid().as_str());
    if let Some(handle) = storage::stored_handle()? {
        output::field("Handle", &handle);
    }
    output::field("Store", session.store_url().as_str());

    Ok(())
}
