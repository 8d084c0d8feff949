use crate::error::Result;
use crate::filters::FilterSpec;
use crate::scrapers::types::ResultSet;
use async_trait::async_trait;

/// Common trait for all listing providers
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run one search and collect every page of results
    async fn search(&self, filter: &FilterSpec) -> Result<ResultSet>;

    /// Get the name of the provider
    fn source_name(&self) -> &'static str;
}
