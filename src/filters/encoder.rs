//! Provider query-string encoding for a [`FilterSpec`].
//!
//! The provider expects a minimal escaping: only space, `+` and `/` are
//! percent-encoded, everything else is sent as-is. Keys are emitted in a
//! fixed order and every key is present even when its dimension is absent.

use crate::filters::spec::{Dimension, FilterSpec};
use crate::filters::vocabulary::Vocabulary;

pub const PRICE_FROM_KEY: &str = "price_range_adv%5Bfrom%5D";
pub const PRICE_TO_KEY: &str = "price_range_adv%5Bto%5D";

/// Escape a single provider value
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ' ' => escaped.push_str("%20"),
            '+' => escaped.push_str("%2B"),
            '/' => escaped.push_str("%2F"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn join_escaped<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(escape_value)
        .collect::<Vec<_>>()
        .join(",")
}

fn dimension<T: Vocabulary>(values: &Option<Dimension<T>>) -> String {
    values
        .as_ref()
        .map(|d| join_escaped(d.provider_values()))
        .unwrap_or_default()
}

/// Render the filter as `key=value&...&`, ready for a trailing `cur_page=N`
pub fn encode(spec: &FilterSpec) -> String {
    let neighborhood = spec
        .neighborhood
        .as_ref()
        .map(|n| join_escaped(n.iter().map(String::as_str)))
        .unwrap_or_default();

    let pairs = [
        ("type", dimension(&spec.property_type)),
        ("beds", dimension(&spec.beds)),
        ("baths", dimension(&spec.baths)),
        ("utilities_included", dimension(&spec.utilities_included)),
        ("garage_size", dimension(&spec.parking)),
        ("furnishing", dimension(&spec.furnishing)),
        ("pet", dimension(&spec.pet)),
        ("smoking", dimension(&spec.smoking)),
        (PRICE_FROM_KEY, spec.price_from.to_string()),
        (PRICE_TO_KEY, spec.price_to.to_string()),
        ("home_features", dimension(&spec.home_features)),
        ("availability", dimension(&spec.availability)),
        ("neighborhood", neighborhood),
    ];

    let mut fragment = String::new();
    for (key, value) in pairs {
        fragment.push_str(key);
        fragment.push('=');
        fragment.push_str(&value);
        fragment.push('&');
    }
    fragment
}
