//! Rental Scout - search client for the RentFaster listings API
//!
//! Encodes typed search filters into the provider's query string, pages
//! through the results concurrently and normalizes each listing into a
//! uniform record that can be viewed as a table keyed by listing id.

pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod scrapers;

pub use error::{Error, ParseError, Result};
pub use filters::{CityId, Dimension, FilterSpec};
pub use models::{Listing, ListingTable};
pub use scrapers::{FetchOptions, ListingSource, RentFaster, ResultSet};
