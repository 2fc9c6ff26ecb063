//! Booking-widget redirect command.

use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use salon_core::booking::{DEFAULT_BOOKING_URL, MIN_INTERVAL_SECS, reservation_allowed};

use crate::output;
use crate::session::storage;

/// Environment variable overriding the booking widget URL.
const BOOKING_ENV: &str = "SALON_BOOKING_URL";

#[derive(Args, Debug)]
pub struct BookArgs {}

pub async fn run(_args: BookArgs) -> Result<()> {
    let stamp_path = storage::data_dir()?.join("last-booking");

    let last: Option<DateTime<Utc>> = fs::read_to_string(&stamp_path)
        .ok()
        .and_then(|s| s.trim().parse().ok());
    let now = Utc::now();

    if !reservation_allowed(last, now) {
        output::error(&format!(
            "You can only start one reservation every {} seconds.",
            MIN_INTERVAL_SECS
        ));
        anyhow::bail!("reservation rate limit");
    }

    fs::write(&stamp_path, now.to_rfc3339()).context("Failed to record the reservation time")?;

    let url = std::env::var(BOOKING_ENV).unwrap_or_else(|_| DEFAULT_BOOKING_URL.to_string());

    println!("{}", url);
    output::success("Opening the booking widget, see you in the chair!");

    Ok(())
}
