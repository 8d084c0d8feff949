use crate::error::ParseError;
use crate::models::{Listing, ListingTable};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Upper bound on pages requested for one search
pub const MAX_PAGES: u32 = 500;

/// One page of the search endpoint
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Total matching listings
    pub total: u64,
    /// Listings returned in this page
    pub total2: u64,
    pub listings: Vec<Value>,
}

impl SearchPage {
    /// Read a page body. Counts may be JSON numbers or numeric strings;
    /// a missing `listings` array means an empty page.
    pub fn from_json(body: Value) -> Result<Self, ParseError> {
        let mut record = match body {
            Value::Object(map) => map,
            Value::Array(_) => return Err(ParseError::NotAnObject("an array")),
            _ => return Err(ParseError::NotAnObject("a scalar")),
        };

        let total = count(&record, "total")?;
        let total2 = count(&record, "total2")?;
        let listings = match record.remove("listings") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ParseError::InvalidField {
                    field: "listings",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            total,
            total2,
            listings,
        })
    }

    /// Pages still to request after page 0
    ///
    /// Assumes every page has the size of page 0. A result that would need
    /// more than [`MAX_PAGES`] pages is rejected.
    pub fn remaining_pages(&self) -> Result<u32, ParseError> {
        if self.total2 == 0 {
            return Ok(0);
        }
        let pages = self.total.div_ceil(self.total2);
        match u32::try_from(pages) {
            Ok(pages) if pages <= MAX_PAGES => Ok(pages.saturating_sub(1)),
            _ => Err(ParseError::InvalidField {
                field: "total",
                value: format!(
                    "{} listings at {} per page exceeds {} pages",
                    self.total, self.total2, MAX_PAGES
                ),
            }),
        }
    }
}

fn count(record: &Map<String, Value>, field: &'static str) -> Result<u64, ParseError> {
    let value = match record.get(field) {
        None | Some(Value::Null) => return Err(ParseError::MissingField(field)),
        Some(value) => value,
    };
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Response of the metadata endpoint
#[derive(Debug, Clone)]
pub struct FieldsResponse {
    pub neighborhood: Value,
}

impl FieldsResponse {
    pub fn from_json(body: Value) -> Result<Self, ParseError> {
        match body {
            Value::Object(mut map) => Ok(Self {
                neighborhood: map.remove("neighborhood").unwrap_or(Value::Null),
            }),
            Value::Array(_) => Err(ParseError::NotAnObject("an array")),
            _ => Err(ParseError::NotAnObject("a scalar")),
        }
    }

    /// Neighborhood names, from either a list of names or an object keyed by name
    pub fn neighborhoods(&self) -> Vec<String> {
        match &self.neighborhood {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect(),
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Per-search options
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Write the raw first-page JSON here
    pub dump: Option<PathBuf>,
}

impl FetchOptions {
    pub fn dump_to(path: impl Into<PathBuf>) -> Self {
        Self {
            dump: Some(path.into()),
        }
    }
}

/// Every listing gathered by one search
///
/// Listings from page 0 come first; the remaining pages follow in
/// completion order.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub listings: Vec<Listing>,
    /// Total reported by the provider
    pub total: u64,
    pub page_size: u64,
    pub pages_expected: u32,
    pub pages_fetched: u32,
    pub failed_pages: Vec<u32>,
    /// Records dropped because they could not be normalized
    pub skipped_records: usize,
    pub fetched_at: DateTime<Utc>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// True when every expected page was fetched
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && self.pages_fetched == self.pages_expected
    }

    pub fn table(&self) -> ListingTable {
        ListingTable::from_listings(&self.listings)
    }
}
