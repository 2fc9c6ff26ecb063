//! URL slug type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated URL slug.
///
/// Slugs are lowercase ASCII kebab-case and are derived deterministically
/// from a post title at write time. Uniqueness across posts is not
/// enforced; the record id remains the primary key.
///
/// # Example
///
/// ```
/// use salon_core::Slug;
///
/// let slug = Slug::from_title("Summer Hair Trends 2025!");
/// assert_eq!(slug.as_str(), "summer-hair-trends-2025");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Create a slug from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, or is not lowercase ASCII
    /// kebab-case (letters, digits and single `-` separators).
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Derive a slug from a free-form title.
    ///
    /// Lowercases, strips everything outside `[a-z0-9 -]`, trims, converts
    /// whitespace runs to `-` and collapses repeated dashes. Titles with no
    /// usable characters produce the slug `untitled`.
    pub fn from_title(title: &str) -> Self {
        let lowered = title.to_lowercase();
        let kept: String = lowered
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
            .collect();

        let mut out = String::with_capacity(kept.len());
        let mut last_dash = true;
        for c in kept.trim().chars() {
            let mapped = if c.is_whitespace() { '-' } else { c };
            if mapped == '-' {
                if !last_dash {
                    out.push('-');
                    last_dash = true;
                }
            } else {
                out.push(mapped);
                last_dash = false;
            }
        }
        let trimmed = out.trim_matches('-');

        if trimmed.is_empty() {
            Self("untitled".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Slug {
                value: s.to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(InvalidInputError::Slug {
                value: s.to_string(),
                reason: "dashes must separate non-empty segments".to_string(),
            }
            .into());
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(InvalidInputError::Slug {
                value: s.to_string(),
                reason: "must contain only lowercase ASCII letters, digits and '-'".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Slug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
