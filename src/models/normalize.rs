//! Raw provider records to [`Listing`].
//!
//! Provider records are loosely typed: ids and prices arrive as numbers or
//! strings, flags as `0`/`1`, booleans or strings. Each field is coerced on
//! its own and anything unrecognised becomes `None`. Only `ref_id` and
//! `price` are required. Unknown keys are ignored.

use crate::error::ParseError;
use crate::models::{Listing, Location};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::warn;

/// Parse a price that is either an integer or a `"from - to"` range,
/// keeping the lower bound
pub fn parse_price(raw: &str) -> Result<i64, ParseError> {
    let trimmed = raw.trim();
    if let Ok(price) = trimmed.parse::<i64>() {
        return Ok(price);
    }

    trimmed
        .split('-')
        .next()
        .map(str::trim)
        .and_then(|lower| lower.parse::<i64>().ok())
        .ok_or_else(|| ParseError::InvalidPrice(raw.to_string()))
}

fn price_field(record: &Map<String, Value>) -> Result<i64, ParseError> {
    match record.get("price") {
        None | Some(Value::Null) => Err(ParseError::MissingField("price")),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| ParseError::InvalidPrice(n.to_string())),
        Some(Value::String(s)) => parse_price(s),
        Some(other) => Err(ParseError::InvalidPrice(other.to_string())),
    }
}

fn id_field(record: &Map<String, Value>) -> Result<String, ParseError> {
    match record.get("ref_id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        None | Some(Value::Null) => Err(ParseError::MissingField("ref_id")),
        Some(other) => Err(ParseError::InvalidField {
            field: "ref_id",
            value: other.to_string(),
        }),
    }
}

fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(record: &Map<String, Value>, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn list(record: &Map<String, Value>, key: &str) -> Vec<String> {
    match record.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn square_feet(record: &Map<String, Value>) -> Option<u32> {
    number(record, "sq_feet")
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u32)
}

fn resolve_link(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Normalize one raw record; relative links are resolved against `base_url`
pub fn normalize(raw: &Value, base_url: &str) -> Result<Listing, ParseError> {
    let record = match raw {
        Value::Object(map) => map,
        Value::Array(_) => return Err(ParseError::NotAnObject("an array")),
        _ => return Err(ParseError::NotAnObject("a scalar")),
    };

    Ok(Listing {
        id: id_field(record)?,
        title: text(record, "title"),
        price: price_field(record)?,
        property_type: text(record, "type"),
        sq_feet: square_feet(record),
        availability: text(record, "availability"),
        rented: text(record, "rented"),
        location: Location {
            label: text(record, "location"),
            address: text(record, "address"),
            address_hidden: flag(record, "address_hidden"),
            city: text(record, "city"),
            province: text(record, "province"),
            community: text(record, "community"),
            quadrant: text(record, "quadrant"),
            latitude: number(record, "latitude"),
            longitude: number(record, "longitude"),
        },
        thumb: text(record, "thumb"),
        thumb2: text(record, "thumb2"),
        slide: text(record, "slide"),
        link: text(record, "link").map(|path| resolve_link(base_url, &path)),
        phone: text(record, "phone"),
        preferred_contact: text(record, "preferred_contact"),
        website: text(record, "website"),
        smoking: text(record, "smoking"),
        lease_term: text(record, "lease_term"),
        parking: text(record, "garage_size"),
        bedrooms: text(record, "bedrooms"),
        den: text(record, "den"),
        baths: text(record, "baths"),
        cats: flag(record, "cats"),
        dogs: flag(record, "dogs"),
        utilities_included: list(record, "utilities_included"),
        fetched_at: Utc::now(),
    })
}

/// Normalize every record of a page, skipping (and logging) the ones that
/// fail. Returns the listings and the number of skipped records.
pub fn normalize_page(records: &[Value], base_url: &str, page: u32) -> (Vec<Listing>, usize) {
    let mut listings = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (idx, raw) in records.iter().enumerate() {
        match normalize(raw, base_url) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                skipped += 1;
                warn!(page, record = idx, error = %e, "Skipping malformed listing");
            }
        }
    }

    (listings, skipped)
}
