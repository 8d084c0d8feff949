use crate::config::Settings;
use crate::error::{Error, ParseError, Result};
use crate::filters::{CityId, FilterSpec};
use crate::models::normalize_page;
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::{FetchOptions, FieldsResponse, ResultSet, SearchPage};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// RentFaster search API client
///
/// The first page is fetched alone to learn the result count and page size;
/// the remaining pages are fetched concurrently, bounded by
/// `fetch.concurrency`.
pub struct RentFaster {
    client: Client,
    base_url: String,
    city: CityId,
    concurrency: usize,
    neighborhoods: Vec<String>,
    filter: FilterSpec,
}

impl RentFaster {
    /// Create a client for `city` and load the city's neighborhood list
    pub async fn connect(city: CityId, settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.provider.timeout_secs))
            .user_agent(settings.provider.user_agent.as_str())
            .build()
            .map_err(Error::Client)?;

        let base_url = settings.provider.base_url.trim_end_matches('/').to_string();
        let fields_url = format!("{}/api/fields.json?city_id={}&", base_url, city.id());

        info!(city = %city, "Loading search fields");
        let body = fetch_json(&client, &fields_url).await?;
        let fields = FieldsResponse::from_json(body)?;
        let neighborhoods = fields.neighborhoods();
        debug!(count = neighborhoods.len(), "Loaded neighborhoods");

        Ok(Self {
            client,
            base_url,
            city,
            concurrency: settings.fetch.concurrency.max(1),
            neighborhoods,
            filter: FilterSpec::default(),
        })
    }

    pub fn city(&self) -> CityId {
        self.city
    }

    /// Neighborhood names the provider knows for this city
    pub fn neighborhoods(&self) -> &[String] {
        &self.neighborhoods
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterSpec::default();
    }

    /// Use the filter saved at `path`, or the default filter if there is none
    pub fn set_filter_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.filter = FilterSpec::load_or_default(path)?;
        Ok(())
    }

    /// Search with the current filter
    pub async fn request_properties(&self, options: &FetchOptions) -> Result<ResultSet> {
        self.search_with(&self.filter, options).await
    }

    /// Neighborhoods in `filter` that the provider did not list
    pub fn unknown_neighborhoods<'a>(&self, filter: &'a FilterSpec) -> Vec<&'a str> {
        filter
            .neighborhood
            .iter()
            .flatten()
            .filter(|n| !self.neighborhoods.contains(n))
            .map(String::as_str)
            .collect()
    }

    fn search_url(&self) -> String {
        format!(
            "{}/api/search.json?city_id={}&novacancy=1&",
            self.base_url,
            self.city.id()
        )
    }

    pub async fn search_with(
        &self,
        filter: &FilterSpec,
        options: &FetchOptions,
    ) -> Result<ResultSet> {
        let unknown = self.unknown_neighborhoods(filter);
        if !unknown.is_empty() {
            warn!(neighborhoods = ?unknown, "Filter has neighborhoods the provider did not list");
        }

        let prefix = format!("{}{}", self.search_url(), filter.encode());

        // Page 0 sizes the rest of the search; any failure here is fatal
        let first_url = format!("{}cur_page=0", prefix);
        debug!(url = %first_url, "Fetching first page");
        let body = fetch_json(&self.client, &first_url).await?;

        if let Some(path) = &options.dump {
            match dump_json(path, &body).await {
                Ok(()) => info!(path = %path.display(), "Dumped first page"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to dump first page"),
            }
        }

        let first = SearchPage::from_json(body)?;
        let remaining = first.remaining_pages()?;
        info!(
            total = first.total,
            page_size = first.total2,
            remaining_pages = remaining,
            "{} properties found...",
            first.total
        );
        if first.total2 == 0 && first.total > 0 {
            warn!(
                total = first.total,
                "Provider reported an empty first page, not paging further"
            );
        }

        let (seed, mut skipped_records) = normalize_page(&first.listings, &self.base_url, 0);
        let collected = Arc::new(Mutex::new(seed));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let mut handles = Vec::with_capacity(remaining as usize);
        for page in 1..=remaining {
            let client = self.client.clone();
            let base_url = self.base_url.clone();
            let url = format!("{}cur_page={}", prefix, page);
            let semaphore = semaphore.clone();
            let collected = collected.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();

                debug!(url = %url, page, "Fetching page");
                let body = fetch_json(&client, &url).await?;
                let data = SearchPage::from_json(body)?;
                let (listings, skipped) = normalize_page(&data.listings, &base_url, page);
                collected
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(listings);
                Ok::<usize, Error>(skipped)
            });
            handles.push((page, handle));
        }

        let mut pages_fetched = 1;
        let mut failed_pages = Vec::new();
        for (page, handle) in handles {
            match handle.await {
                Ok(Ok(skipped)) => {
                    pages_fetched += 1;
                    skipped_records += skipped;
                }
                Ok(Err(e)) => {
                    warn!(page, error = %e, "Page request failed, skipping");
                    failed_pages.push(page);
                }
                Err(e) => {
                    warn!(page, error = %e, "Page task aborted, skipping");
                    failed_pages.push(page);
                }
            }
        }

        let pages_expected = remaining + 1;
        if pages_fetched != pages_expected {
            warn!(
                pages_fetched,
                pages_expected,
                failed = ?failed_pages,
                "Search finished with missing pages"
            );
        }

        let listings = std::mem::take(
            &mut *collected.lock().unwrap_or_else(PoisonError::into_inner),
        );
        info!(
            listings = listings.len(),
            pages_fetched,
            skipped_records,
            "Search complete"
        );

        Ok(ResultSet {
            listings,
            total: first.total,
            page_size: first.total2,
            pages_expected,
            pages_fetched,
            failed_pages,
            skipped_records,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl ListingSource for RentFaster {
    async fn search(&self, filter: &FilterSpec) -> Result<ResultSet> {
        self.search_with(filter, &FetchOptions::default()).await
    }

    fn source_name(&self) -> &'static str {
        "RentFaster"
    }
}

/// GET `url` and parse the body as JSON
async fn fetch_json(client: &Client, url: &str) -> Result<Value> {
    let transport = |source: reqwest::Error| Error::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            url: url.to_string(),
            status,
        });
    }

    let text = response.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|source| {
        ParseError::InvalidJson {
            url: url.to_string(),
            source,
        }
        .into()
    })
}

/// Write `body` pretty-printed to `path`
async fn dump_json(path: &Path, body: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(body)?;
    tokio::fs::write(path, pretty).await?;
    Ok(())
}
