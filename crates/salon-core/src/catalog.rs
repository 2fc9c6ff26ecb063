//! Catalog filtering, sorting and aggregation.
//!
//! One pure pipeline serves every pricelist-style view: the public catalog
//! page and the admin previews both feed a record slice plus a
//! [`CatalogFilter`] through [`select`] and render the result. Items are
//! accessed through the [`CatalogItem`] trait rather than hardcoded field
//! names, so any record shape with a title and optional price/duration can
//! participate.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Accessors the catalog pipeline filters and sorts by.
///
/// Every accessor is optional except the title; an item that lacks a value
/// fails any active filter on that value and orders after items that have
/// one.
pub trait CatalogItem {
    /// Display title (service name, product name).
    fn title(&self) -> &str;

    /// Longer description, searched together with the title.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Top-level category.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Second-level category.
    fn subcategory(&self) -> Option<&str> {
        None
    }

    /// Regular price.
    fn base_price(&self) -> Option<f64> {
        None
    }

    /// Discounted price, when the item is on sale.
    fn sale_price(&self) -> Option<f64> {
        None
    }

    /// Duration in minutes.
    fn duration_minutes(&self) -> Option<f64> {
        None
    }

    /// The price every filter and sort evaluates: the sale price when
    /// present, otherwise the base price.
    fn effective_price(&self) -> Option<f64> {
        self.sale_price().or_else(|| self.base_price())
    }
}

/// A sortable catalog dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Effective price, numeric ascending.
    Price,
    /// Duration in minutes, numeric ascending.
    Duration,
    /// Title, case-folded ascending.
    Title,
}

impl SortKey {
    /// Returns the CLI/wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Duration => "duration",
            SortKey::Title => "title",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(SortKey::Price),
            "duration" => Ok(SortKey::Duration),
            "title" => Ok(SortKey::Title),
            other => Err(InvalidInputError::Other {
                message: format!("unknown sort key '{}' (price, duration, title)", other),
            }
            .into()),
        }
    }
}

/// Transient, caller-owned filter state for one catalog view.
///
/// The default value is neutral on every dimension: passing it to
/// [`select`] returns the input unchanged.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against title and description.
    /// Empty means no text filtering.
    pub search: String,

    /// Exact-match category; `None` passes everything.
    pub category: Option<String>,

    /// Exact-match subcategory; `None` passes everything.
    pub subcategory: Option<String>,

    /// Inclusive effective-price bounds; `None` passes everything.
    pub price_range: Option<(f64, f64)>,

    /// Inclusive duration bounds in minutes; `None` passes everything.
    pub duration_range: Option<(f64, f64)>,

    /// Keep only items with a sale price.
    pub only_discounted: bool,

    /// Single active sort key.
    pub sort: Option<SortKey>,

    /// Ordered multi-key sort; takes precedence over `sort` when
    /// non-empty. Each key breaks ties left by the previous one.
    pub multi_sort: Vec<SortKey>,
}

impl CatalogFilter {
    /// True when every dimension is at its neutral value.
    pub fn is_neutral(&self) -> bool {
        self.search.is_empty()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.price_range.is_none()
            && self.duration_range.is_none()
            && !self.only_discounted
            && self.sort.is_none()
            && self.multi_sort.is_empty()
    }
}

/// Run the full filter/sort pipeline.
///
/// Filters are conjunctive and commute; sorting is stable, so items with
/// equal sort keys keep their input order. The input is never mutated; a
/// fresh `Vec` is returned on every call.
pub fn select<T: CatalogItem + Clone>(items: &[T], filter: &CatalogFilter) -> Vec<T> {
    let mut out: Vec<T> = items
        .iter()
        .filter(|item| passes(*item, filter))
        .cloned()
        .collect();

    if !filter.multi_sort.is_empty() {
        out.sort_by(|a, b| compare_multi(a, b, &filter.multi_sort));
    } else if let Some(key) = filter.sort {
        out.sort_by(|a, b| compare_by(a, b, key));
    }

    out
}

fn passes<T: CatalogItem>(item: &T, filter: &CatalogFilter) -> bool {
    if !filter.search.is_empty() {
        let needle = filter.search.to_lowercase();
        let in_title = item.title().to_lowercase().contains(&needle);
        let in_description = item
            .description()
            .is_some_and(|d| d.to_lowercase().contains(&needle));
        if !in_title && !in_description {
            return false;
        }
    }

    if let Some(category) = &filter.category
        && item.category() != Some(category.as_str())
    {
        return false;
    }

    if let Some(subcategory) = &filter.subcategory
        && item.subcategory() != Some(subcategory.as_str())
    {
        return false;
    }

    if let Some((min, max)) = filter.price_range {
        // Inclusive bounds; items without a price are excluded.
        match item.effective_price() {
            Some(price) if price >= min && price <= max => {}
            _ => return false,
        }
    }

    if let Some((min, max)) = filter.duration_range {
        match item.duration_minutes() {
            Some(duration) if duration >= min && duration <= max => {}
            _ => return false,
        }
    }

    if filter.only_discounted && item.sale_price().is_none() {
        return false;
    }

    true
}

fn compare_multi<T: CatalogItem>(a: &T, b: &T, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = compare_by(a, b, *key);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_by<T: CatalogItem>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => compare_numeric(a.effective_price(), b.effective_price()),
        SortKey::Duration => compare_numeric(a.duration_minutes(), b.duration_minutes()),
        SortKey::Title => a
            .title()
            .to_lowercase()
            .cmp(&b.title().to_lowercase()),
    }
}

fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Unique categories in first-seen order, skipping items without one.
pub fn categories<T: CatalogItem>(items: &[T]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if let Some(category) = item.category()
            && !category.is_empty()
            && !out.iter().any(|c| c == category)
        {
            out.push(category.to_string());
        }
    }
    out
}

/// Unique subcategories of one category, in first-seen order.
pub fn subcategories<T: CatalogItem>(items: &[T], category: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if item.category() != Some(category) {
            continue;
        }
        if let Some(subcategory) = item.subcategory()
            && !subcategory.is_empty()
            && !out.iter().any(|s| s == subcategory)
        {
            out.push(subcategory.to_string());
        }
    }
    out
}
