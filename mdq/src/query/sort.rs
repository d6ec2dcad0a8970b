//! Sort specification parsing

use crate::error::{Error, Result};
use serde::Serialize;
use std::str::FromStr;

/// Attribute a result set can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Date,
    Size,
    Created,
}

/// `name|date|size|created`, with a leading `-` for descending order.
///
/// Without `-` the order is ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (descending, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let key = match name.to_lowercase().as_str() {
            "name" => SortKey::Name,
            "date" => SortKey::Date,
            "size" => SortKey::Size,
            "created" => SortKey::Created,
            _ => return Err(Error::InvalidSort(s.to_string())),
        };

        Ok(SortSpec { key, descending })
    }
}
