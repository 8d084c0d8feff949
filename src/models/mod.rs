pub mod normalize;
pub mod table;

use crate::filters::{PropertyType, Vocabulary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use normalize::{normalize, normalize_page, parse_price};
pub use table::{ListingTable, TableRow};

/// Where a listing is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Free-text location line shown by the provider
    pub label: Option<String>,
    pub address: Option<String>,
    pub address_hidden: Option<bool>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub community: Option<String>,
    pub quadrant: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One normalized rental listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: Option<String>,
    /// Monthly rent; the lower bound when the provider gives a range
    pub price: i64,
    pub property_type: Option<String>,
    pub sq_feet: Option<u32>,
    pub availability: Option<String>,
    pub rented: Option<String>,
    pub location: Location,
    pub thumb: Option<String>,
    pub thumb2: Option<String>,
    pub slide: Option<String>,
    /// Absolute URL of the detail page
    pub link: Option<String>,
    pub phone: Option<String>,
    pub preferred_contact: Option<String>,
    pub website: Option<String>,
    pub smoking: Option<String>,
    pub lease_term: Option<String>,
    pub parking: Option<String>,
    pub bedrooms: Option<String>,
    pub den: Option<String>,
    pub baths: Option<String>,
    pub cats: Option<bool>,
    pub dogs: Option<bool>,
    pub utilities_included: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

impl Listing {
    /// Property type as a vocabulary member, `None` for values the
    /// vocabulary does not know
    pub fn kind(&self) -> Option<PropertyType> {
        self.property_type
            .as_deref()
            .and_then(PropertyType::from_provider_str)
    }
}
