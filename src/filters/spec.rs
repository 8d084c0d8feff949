use crate::error::{Error, Result};
use crate::filters::encoder;
use crate::filters::vocabulary::{
    Availability, Baths, Beds, Furnishing, HomeFeature, Parking, Pets, PropertyType, Smoking,
    Utility, Vocabulary,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_PRICE_FROM: i64 = 0;
pub const DEFAULT_PRICE_TO: i64 = 10_000;
pub const DEFAULT_FILTER_FILE: &str = "filter.json";

/// Values selected for one filter dimension
///
/// Either typed vocabulary members or provider strings passed through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension<T> {
    Known(Vec<T>),
    Raw(Vec<String>),
}

impl<T: Vocabulary> Dimension<T> {
    pub fn raw<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dimension::Raw(values.into_iter().map(Into::into).collect())
    }

    /// Resolve provider strings to members when every one is known,
    /// otherwise keep them raw
    pub fn from_provider_strings(values: Vec<String>) -> Self {
        let known: Option<Vec<T>> = values.iter().map(|v| T::from_provider_str(v)).collect();
        match known {
            Some(members) => Dimension::Known(members),
            None => Dimension::Raw(values),
        }
    }

    pub fn provider_values(&self) -> Vec<&str> {
        match self {
            Dimension::Known(members) => members.iter().map(|m| m.as_provider_str()).collect(),
            Dimension::Raw(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl<T: Vocabulary> From<Vec<T>> for Dimension<T> {
    fn from(members: Vec<T>) -> Self {
        Dimension::Known(members)
    }
}

impl<T: Vocabulary, const N: usize> From<[T; N]> for Dimension<T> {
    fn from(members: [T; N]) -> Self {
        Dimension::Known(members.to_vec())
    }
}

/// Search constraints before provider encoding
///
/// Absent dimensions are sent empty. `price_from <= price_to` is left to the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub property_type: Option<Dimension<PropertyType>>,
    pub beds: Option<Dimension<Beds>>,
    pub baths: Option<Dimension<Baths>>,
    pub utilities_included: Option<Dimension<Utility>>,
    pub furnishing: Option<Dimension<Furnishing>>,
    pub pet: Option<Dimension<Pets>>,
    pub smoking: Option<Dimension<Smoking>>,
    pub parking: Option<Dimension<Parking>>,
    pub price_from: i64,
    pub price_to: i64,
    pub home_features: Option<Dimension<HomeFeature>>,
    pub availability: Option<Dimension<Availability>>,
    pub neighborhood: Option<Vec<String>>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            property_type: None,
            beds: None,
            baths: None,
            utilities_included: None,
            furnishing: None,
            pet: None,
            smoking: None,
            parking: None,
            price_from: DEFAULT_PRICE_FROM,
            price_to: DEFAULT_PRICE_TO,
            home_features: None,
            availability: None,
            neighborhood: None,
        }
    }
}

impl FilterSpec {
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    /// Query-string fragment for this filter, ending in `&`
    pub fn encode(&self) -> String {
        encoder::encode(self)
    }

    /// Write the filter as pretty JSON, dimensions as provider strings
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&PersistedFilter::from(self))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Saved filter");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let persisted: PersistedFilter = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "Loaded filter");
        persisted.into_spec()
    }

    /// Load the filter at `path`, or the default filter when the file is missing
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No filter file, using default filter");
            Ok(Self::default())
        }
    }
}

/// Fluent construction of a [`FilterSpec`]
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    spec: FilterSpec,
}

impl FilterBuilder {
    pub fn property_type(mut self, values: impl Into<Dimension<PropertyType>>) -> Self {
        self.spec.property_type = Some(values.into());
        self
    }

    pub fn beds(mut self, values: impl Into<Dimension<Beds>>) -> Self {
        self.spec.beds = Some(values.into());
        self
    }

    pub fn baths(mut self, values: impl Into<Dimension<Baths>>) -> Self {
        self.spec.baths = Some(values.into());
        self
    }

    pub fn utilities_included(mut self, values: impl Into<Dimension<Utility>>) -> Self {
        self.spec.utilities_included = Some(values.into());
        self
    }

    pub fn furnishing(mut self, values: impl Into<Dimension<Furnishing>>) -> Self {
        self.spec.furnishing = Some(values.into());
        self
    }

    pub fn pet(mut self, values: impl Into<Dimension<Pets>>) -> Self {
        self.spec.pet = Some(values.into());
        self
    }

    pub fn smoking(mut self, values: impl Into<Dimension<Smoking>>) -> Self {
        self.spec.smoking = Some(values.into());
        self
    }

    pub fn parking(mut self, values: impl Into<Dimension<Parking>>) -> Self {
        self.spec.parking = Some(values.into());
        self
    }

    pub fn price_from(mut self, price: i64) -> Self {
        self.spec.price_from = price;
        self
    }

    pub fn price_to(mut self, price: i64) -> Self {
        self.spec.price_to = price;
        self
    }

    pub fn home_features(mut self, values: impl Into<Dimension<HomeFeature>>) -> Self {
        self.spec.home_features = Some(values.into());
        self
    }

    pub fn availability(mut self, values: impl Into<Dimension<Availability>>) -> Self {
        self.spec.availability = Some(values.into());
        self
    }

    pub fn neighborhood<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.neighborhood = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> FilterSpec {
        self.spec
    }

    /// Build the filter and persist it for reuse
    pub fn build_and_save(self, path: impl AsRef<Path>) -> Result<FilterSpec> {
        let spec = self.build();
        spec.save(path)?;
        Ok(spec)
    }
}

/// On-disk shape of a filter: lists of provider strings plus price bounds
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PersistedFilter {
    property_type: Option<Vec<Value>>,
    beds: Option<Vec<Value>>,
    baths: Option<Vec<Value>>,
    utilities_included: Option<Vec<Value>>,
    furnishing: Option<Vec<Value>>,
    pet: Option<Vec<Value>>,
    smoking: Option<Vec<Value>>,
    parking: Option<Vec<Value>>,
    price_from: Option<i64>,
    price_to: Option<i64>,
    home_features: Option<Vec<Value>>,
    availability: Option<Vec<Value>>,
    neighborhood: Option<Vec<Value>>,
}

fn persist<T: Vocabulary>(dimension: &Option<Dimension<T>>) -> Option<Vec<Value>> {
    dimension.as_ref().map(|d| {
        d.provider_values()
            .into_iter()
            .map(|v| Value::String(v.to_string()))
            .collect()
    })
}

fn strings(dimension: &str, values: Vec<Value>) -> Result<Vec<String>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) => Ok(s),
            other => Err(Error::Encoding {
                dimension: dimension.to_string(),
                index,
                found: json_kind(&other).to_string(),
            }),
        })
        .collect()
}

fn restore<T: Vocabulary>(key: &str, values: Option<Vec<Value>>) -> Result<Option<Dimension<T>>> {
    values
        .map(|v| strings(key, v).map(Dimension::from_provider_strings))
        .transpose()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<&FilterSpec> for PersistedFilter {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            property_type: persist(&spec.property_type),
            beds: persist(&spec.beds),
            baths: persist(&spec.baths),
            utilities_included: persist(&spec.utilities_included),
            furnishing: persist(&spec.furnishing),
            pet: persist(&spec.pet),
            smoking: persist(&spec.smoking),
            parking: persist(&spec.parking),
            price_from: Some(spec.price_from),
            price_to: Some(spec.price_to),
            home_features: persist(&spec.home_features),
            availability: persist(&spec.availability),
            neighborhood: spec
                .neighborhood
                .as_ref()
                .map(|n| n.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl PersistedFilter {
    fn into_spec(self) -> Result<FilterSpec> {
        Ok(FilterSpec {
            property_type: restore("property_type", self.property_type)?,
            beds: restore("beds", self.beds)?,
            baths: restore("baths", self.baths)?,
            utilities_included: restore("utilities_included", self.utilities_included)?,
            furnishing: restore("furnishing", self.furnishing)?,
            pet: restore("pet", self.pet)?,
            smoking: restore("smoking", self.smoking)?,
            parking: restore("parking", self.parking)?,
            price_from: self.price_from.unwrap_or(DEFAULT_PRICE_FROM),
            price_to: self.price_to.unwrap_or(DEFAULT_PRICE_TO),
            home_features: restore("home_features", self.home_features)?,
            availability: restore("availability", self.availability)?,
            neighborhood: self
                .neighborhood
                .map(|n| strings("neighborhood", n))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_filter() {
        let spec = FilterSpec::builder().build();
        assert_eq!(spec, FilterSpec::default());
        assert_eq!(spec.price_from, 0);
        assert_eq!(spec.price_to, 10_000);
        assert!(spec.beds.is_none());
    }

    #[test]
    fn test_provider_strings_resolve_to_members() {
        let dim = Dimension::<Beds>::from_provider_strings(vec!["1".into(), "2 + Den".into()]);
        assert_eq!(dim, Dimension::Known(vec![Beds::One, Beds::TwoPlusDen]));

        let dim = Dimension::<Beds>::from_provider_strings(vec!["1".into(), "Penthouse".into()]);
        assert_eq!(dim, Dimension::Raw(vec!["1".into(), "Penthouse".into()]));
    }

    #[test]
    fn test_non_string_element_is_encoding_error() {
        let persisted: PersistedFilter = serde_json::from_value(json!({
            "beds": ["1", 2],
        }))
        .unwrap();

        match persisted.into_spec() {
            Err(Error::Encoding {
                dimension,
                index,
                found,
            }) => {
                assert_eq!(dimension, "beds");
                assert_eq!(index, 1);
                assert_eq!(found, "a number");
            }
            other => panic!("expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognised_keys_are_ignored() {
        let persisted: PersistedFilter = serde_json::from_value(json!({
            "price_to": 1800,
            "sort": "price",
        }))
        .unwrap();
        let spec = persisted.into_spec().unwrap();
        assert_eq!(spec.price_to, 1800);
        assert_eq!(spec.price_from, DEFAULT_PRICE_FROM);
    }
}
