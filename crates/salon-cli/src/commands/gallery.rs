//! Daily gallery rotation command.

use anyhow::Result;
use chrono::Local;
use clap::Args;
use colored::Colorize;

use salon_core::gallery::{daily_selection, default_gallery};

use crate::output;

#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Output the selection as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GalleryArgs) -> Result<()> {
    let today = Local::now().date_naive();
    let selection = daily_selection(&default_gallery(), today);

    if args.json {
        return output::json_pretty(&selection);
    }

    println!(
        "{}",
        format!("Gallery rotation for {}", today.format("%Y-%m-%d")).dimmed()
    );
    for image in &selection {
        println!("{}  {}  {}", image.id.dimmed(), image.src, image.alt);
    }

    Ok(())
}
