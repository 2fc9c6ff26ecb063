//! Public pricelist view with filtering, sorting and export.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;

use salon_core::catalog::{self, CatalogFilter, SortKey};
use salon_core::documents::decode_all;
use salon_core::table::Align;
use salon_core::{Resource, Service};

use crate::backend::{CliBackend, resolve_store_url};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Case-insensitive search over name and description
    #[arg(long)]
    pub search: Option<String>,

    /// Exact category filter (cut, coloring, styling, updo)
    #[arg(long)]
    pub category: Option<String>,

    /// Exact subcategory filter
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Lower price bound in EUR (inclusive)
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Upper price bound in EUR (inclusive)
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Lower duration bound in minutes (inclusive)
    #[arg(long)]
    pub duration_min: Option<f64>,

    /// Upper duration bound in minutes (inclusive)
    #[arg(long)]
    pub duration_max: Option<f64>,

    /// Keep only discounted services
    #[arg(long)]
    pub only_sale: bool,

    /// Sort key (price, duration, title)
    #[arg(long)]
    pub sort: Option<String>,

    /// Multi-column sort; repeat to add tie-breakers, overrides --sort
    #[arg(long = "sort-by")]
    pub sort_by: Vec<String>,

    /// List the available categories and subcategories instead
    #[arg(long)]
    pub list_categories: bool,

    /// Export the filtered list instead of rendering a table
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Store base URL
    #[arg(long)]
    pub store: Option<String>,
}

pub async fn run(args: CatalogArgs) -> Result<()> {
    let url = resolve_store_url(args.store.as_deref())?;
    let backend = CliBackend::from_url(&url)?;

    let records = backend
        .list(&Service::collection(), &Service::default_order())
        .await
        .context("Failed to load the pricelist")?;
    let services: Vec<Service> = decode_all(&records).context("Failed to decode services")?;

    if args.list_categories {
        for category in catalog::categories(&services) {
            println!("{}", category);
            for subcategory in catalog::subcategories(&services, &category) {
                println!("  {}", subcategory);
            }
        }
        return Ok(());
    }

    let filter = build_filter(&args)?;
    let filtered = catalog::select(&services, &filter);

    match args.export {
        Some(ExportFormat::Json) => output::json_pretty(&filtered),
        Some(ExportFormat::Csv) => {
            print!("{}", to_csv(&filtered));
            Ok(())
        }
        None => {
            render(&filtered);
            Ok(())
        }
    }
}

fn build_filter(args: &CatalogArgs) -> Result<CatalogFilter> {
    let price_range = range(args.price_min, args.price_max);
    let duration_range = range(args.duration_min, args.duration_max);

    let sort = args
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()
        .context("Invalid --sort key")?;

    let multi_sort = args
        .sort_by
        .iter()
        .map(|key| key.parse::<SortKey>())
        .collect::<salon_core::Result<Vec<_>>>()
        .context("Invalid --sort-by key")?;

    Ok(CatalogFilter {
        search: args.search.clone().unwrap_or_default(),
        category: args.category.clone(),
        subcategory: args.subcategory.clone(),
        price_range,
        duration_range,
        only_discounted: args.only_sale,
        sort,
        multi_sort,
    })
}

fn range(min: Option<f64>, max: Option<f64>) -> Option<(f64, f64)> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some((min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY)))
}

fn render(services: &[Service]) {
    if services.is_empty() {
        eprintln!("{}", "No services match the current filters.".dimmed());
        return;
    }

    let headers = [
        ("Name", Align::Left),
        ("Category", Align::Left),
        ("Subcategory", Align::Left),
        ("Price", Align::Right),
        ("Duration", Align::Right),
        ("Sale", Align::Left),
    ];

    let rows: Vec<Vec<String>> = services
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.category.to_string(),
                s.subcategory.clone().unwrap_or_else(|| "-".to_string()),
                format!("{:.2} €", s.effective_price()),
                format!("{} min", s.duration),
                if s.sale_price.is_some() {
                    "sale".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    output::grid(&headers, &rows);

    eprintln!();
    eprintln!("{}", format!("{} service(s)", services.len()).dimmed());
}

fn to_csv(services: &[Service]) -> String {
    let mut out = String::from("name,category,subcategory,price,salePrice,duration\n");
    for s in services {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_escape(&s.name),
            s.category,
            csv_escape(s.subcategory.as_deref().unwrap_or("")),
            s.price,
            s.sale_price.map(|p| p.to_string()).unwrap_or_default(),
            s.duration,
        ));
    }
    out
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
