//! Collection name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated collection name.
///
/// Collections are the top-level document groupings in the record store
/// (`services`, `stylists`, `products`, `blogPosts`).
///
/// # Example
///
/// ```
/// use salon_core::Collection;
///
/// let posts = Collection::new("blogPosts").unwrap();
/// assert_eq!(posts.as_str(), "blogPosts");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Collection(String);

impl Collection {
    /// Create a new collection name from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name does not start with an ASCII letter,
    /// contains characters other than ASCII letters and digits, or exceeds
    /// 64 characters.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the collection name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let mut chars = s.chars();

        let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        if !valid_start {
            return Err(InvalidInputError::Collection {
                value: s.to_string(),
                reason: "must start with an ASCII letter".to_string(),
            }
            .into());
        }

        if s.len() > 64 {
            return Err(InvalidInputError::Collection {
                value: s.to_string(),
                reason: "must be at most 64 characters".to_string(),
            }
            .into());
        }

        if !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidInputError::Collection {
                value: s.to_string(),
                reason: "must contain only ASCII letters and digits".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Collection {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Collection> for String {
    fn from(collection: Collection) -> Self {
        collection.0
    }
}

impl AsRef<str> for Collection {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(Collection::new("services").is_ok());
        assert!(Collection::new("blogPosts").is_ok());
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(Collection::new("1services").is_err());
    }

    #[test]
    fn rejects_separator_characters() {
        assert!(Collection::new("blog-posts").is_err());
        assert!(Collection::new("blog/posts").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(Collection::new("").is_err());
    }
}
