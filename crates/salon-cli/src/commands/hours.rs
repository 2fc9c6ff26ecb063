//! Opening-hours status command.

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, Weekday};
use clap::Args;
use colored::Colorize;

use salon_core::hours::WeeklyHours;

#[derive(Args, Debug)]
pub struct HoursArgs {
    /// Keep running and refresh the status once a minute
    #[arg(long)]
    pub watch: bool,

    /// Also print the full weekly schedule
    #[arg(long)]
    pub week: bool,
}

pub async fn run(args: HoursArgs) -> Result<()> {
    let hours = WeeklyHours::salon_default();

    if args.week {
        print_week(&hours);
        println!();
    }

    print_status(&hours);

    if args.watch {
        eprintln!("{}", "Press Ctrl+C to stop.".dimmed());
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        interval.tick().await;
        loop {
            interval.tick().await;
            print_status(&hours);
        }
    }

    Ok(())
}

fn print_status(hours: &WeeklyHours) {
    let now = Local::now();
    let status = hours.status_at(now.naive_local());

    let marker = if status.is_open {
        "●".green()
    } else {
        "●".red()
    };
    println!(
        "{} {} {}",
        marker,
        status.text,
        format!("({})", now.format("%a %H:%M")).dimmed()
    );
}

fn print_week(hours: &WeeklyHours) {
    const DAYS: [(Weekday, &str); 7] = [
        (Weekday::Mon, "Monday"),
        (Weekday::Tue, "Tuesday"),
        (Weekday::Wed, "Wednesday"),
        (Weekday::Thu, "Thursday"),
        (Weekday::Fri, "Friday"),
        (Weekday::Sat, "Saturday"),
        (Weekday::Sun, "Sunday"),
    ];

    for (day, label) in DAYS {
        match hours.for_day(day) {
            Some(day_hours) => println!(
                "{:<10} {} - {}",
                label,
                day_hours.open.format("%H:%M"),
                day_hours.close.format("%H:%M")
            ),
            None => println!("{:<10} {}", label, "closed".dimmed()),
        }
    }
}
