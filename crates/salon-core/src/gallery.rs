//! Daily gallery rotation.
//!
//! The home page shows six gallery images reshuffled once per day. The
//! shuffle is a Fisher-Yates pass driven by a sine-based pseudo-random
//! generator seeded with the day of month, so every visitor sees the same
//! rotation on the same day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Stable image id.
    pub id: String,
    /// Image source path or URL.
    pub src: String,
    /// Alt text.
    pub alt: String,
}

impl GalleryImage {
    /// Convenience constructor.
    pub fn new(id: &str, src: &str, alt: &str) -> Self {
        Self {
            id: id.to_string(),
            src: src.to_string(),
            alt: alt.to_string(),
        }
    }
}

/// How many images the daily rotation shows.
pub const DAILY_COUNT: usize = 6;

/// Deterministic Fisher-Yates shuffle.
///
/// The generator is `frac(sin(seed) * 10000)` with the seed incremented
/// per draw; equal seeds always produce equal orderings.
pub fn seeded_shuffle<T>(items: &mut [T], seed: u32) {
    let mut state = f64::from(seed);
    let mut pseudo_random = move || {
        let x = state.sin() * 10_000.0;
        state += 1.0;
        x - x.floor()
    };

    let mut current = items.len();
    while current > 0 {
        let pick = (pseudo_random() * current as f64).floor() as usize;
        current -= 1;
        items.swap(current, pick.min(current));
    }
}

/// The six images for a given date, seeded by its day of month.
pub fn daily_selection(images: &[GalleryImage], date: NaiveDate) -> Vec<GalleryImage> {
    let mut shuffled = images.to_vec();
    seeded_shuffle(&mut shuffled, date.day());
    shuffled.truncate(DAILY_COUNT);
    shuffled
}

/// The static gallery set bundled with the site.
pub fn default_gallery() -> Vec<GalleryImage> {
    vec![
        GalleryImage::new("g1", "/gallery/balayage-01.jpg", "Sun-kissed balayage"),
        GalleryImage::new("g2", "/gallery/bob-cut-02.jpg", "Sharp chin-length bob"),
        GalleryImage::new("g3", "/gallery/updo-03.jpg", "Braided wedding updo"),
        GalleryImage::new("g4", "/gallery/color-04.jpg", "Copper gloss refresh"),
        GalleryImage::new("g5", "/gallery/mens-05.jpg", "Textured crop fade"),
        GalleryImage::new("g6", "/gallery/waves-06.jpg", "Soft glam waves"),
        GalleryImage::new("g7", "/gallery/pixie-07.jpg", "Platinum pixie"),
        GalleryImage::new("g8", "/gallery/highlights-08.jpg", "Face-framing highlights"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_order() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        seeded_shuffle(&mut a, 17);
        seeded_shuffle(&mut b, 17);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b: Vec<u32> = (0..20).collect();
        seeded_shuffle(&mut a, 3);
        seeded_shuffle(&mut b, 4);
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..50).collect();
        seeded_shuffle(&mut items, 9);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn daily_selection_is_stable_within_a_day() {
        let gallery = default_gallery();
        let day = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();

        let first = daily_selection(&gallery, day);
        let second = daily_selection(&gallery, day);

        assert_eq!(first, second);
        assert_eq!(first.len(), DAILY_COUNT);
    }
}
