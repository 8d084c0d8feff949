use crate::models::Listing;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Flat tabular view of a listing
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableRow {
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Type")]
    pub property_type: Option<String>,
    #[serde(rename = "Community")]
    pub community: Option<String>,
    #[serde(rename = "Parking")]
    pub parking: Option<String>,
    #[serde(rename = "Utilities")]
    pub utilities: String,
    #[serde(rename = "Square Feet")]
    pub square_feet: Option<u32>,
    #[serde(rename = "Bedrooms")]
    pub bedrooms: Option<String>,
    #[serde(rename = "Link")]
    pub link: Option<String>,
    #[serde(rename = "Thumbnail")]
    pub thumbnail: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
}

impl From<&Listing> for TableRow {
    fn from(listing: &Listing) -> Self {
        Self {
            price: listing.price,
            property_type: listing.property_type.clone(),
            community: listing.location.community.clone(),
            parking: listing.parking.clone(),
            utilities: listing.utilities_included.join(","),
            square_feet: listing.sq_feet,
            bedrooms: listing.bedrooms.clone(),
            link: listing.link.clone(),
            thumbnail: listing.thumb.clone(),
            latitude: listing.location.latitude,
            longitude: listing.location.longitude,
        }
    }
}

/// Listings indexed by listing id
///
/// Rows keep the position of the first occurrence of an id; a later listing
/// with the same id replaces the row's contents.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    ids: Vec<String>,
    rows: Vec<TableRow>,
    index: HashMap<String, usize>,
}

impl ListingTable {
    pub fn from_listings<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Self {
        let mut table = Self::default();
        for listing in listings {
            table.insert(listing);
        }
        table
    }

    pub fn insert(&mut self, listing: &Listing) {
        let row = TableRow::from(listing);
        match self.index.get(&listing.id) {
            Some(&pos) => self.rows[pos] = row,
            None => {
                self.index.insert(listing.id.clone(), self.rows.len());
                self.ids.push(listing.id.clone());
                self.rows.push(row);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TableRow> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableRow)> {
        self.ids.iter().map(String::as_str).zip(self.rows.iter())
    }
}

/// Serializes as a JSON object of id -> row, in row order
impl Serialize for ListingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (id, row) in self.iter() {
            map.serialize_entry(id, row)?;
        }
        map.end()
    }
}
