mod error;
pub mod key;
pub mod model;
pub mod pending;
pub mod query;


use ::utils::surf_logging::SurfLogging;
use futures::future::join_all;
use pending::{PendingConfig, PendingRequests};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use surf::{Client, Response, StatusCode, Url};

pub use error::{Error, ErrorKind};
pub use key::QueryKey;
pub use model::character::{Character, LocationRef};
pub use model::episode::{Episode, EpisodeCode};
pub use model::page::{Page, PageInfo};
pub use pending::PendingStats;
pub use query::filters::Filters;
pub use query::gender::Gender;
pub use query::status::Status;
pub use query::QueryOptions;

/// Public Rick and Morty catalog.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Root of the catalog API, without the `/character` suffix
    pub base_url: String,
    pub pending: PendingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pending: PendingConfig::default(),
        }
    }
}

/// Client for the character catalog.
///
/// Clones share the same pending request tables, so identical listings
/// requested through any clone are coalesced into one network call.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    pages: Arc<PendingRequests<QueryKey, Page>>,
    episodes: Arc<PendingRequests<String, Episode>>,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Create a new CatalogClient against the public catalog with default settings
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http: Client::new().with(SurfLogging),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pages: Arc::new(PendingRequests::new(config.pending.clone())),
            episodes: Arc::new(PendingRequests::new(config.pending)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of characters. Empty filters are left out of the
    /// request and a 404 from the catalog comes back as [`Page::empty`].
    pub async fn fetch_page(&self, page: u32, name: &str, filters: &Filters) -> Result<Page, Error> {
        self.fetch_options(&QueryOptions::new(page, name, filters.clone()))
            .await
    }

    pub async fn fetch_options(&self, options: &QueryOptions) -> Result<Page, Error> {
        let key = QueryKey::from_options(options);
        let url = format!("{}/character?{}", self.base_url, key);
        let http = self.http.clone();

        self.pages
            .execute(key, move || Self::get_page(http, url))
            .await
    }

    /// Fetch a single character. Unlike listings, a 404 here is an error of
    /// kind [`ErrorKind::NotFound`].
    pub async fn fetch_character(&self, id: u32) -> Result<Character, Error> {
        let url = format!("{}/character/{}", self.base_url, id);
        let mut response = Self::get(&self.http, &url).await?;
        Self::decode(&mut response, &url).await
    }

    /// Dereference one episode locator taken from [`Character::episode`].
    pub async fn fetch_episode(&self, url: &str) -> Result<Episode, Error> {
        let http = self.http.clone();
        let target = url.to_string();

        self.episodes
            .execute(url.to_string(), move || async move {
                let mut response = Self::get(&http, &target).await?;
                Self::decode(&mut response, &target).await
            })
            .await
    }

    /// Fetch every episode the character appears in, in the character's own
    /// order. Fails if any single episode fails.
    pub async fn fetch_episodes(&self, character: &Character) -> Result<Vec<Episode>, Error> {
        let futures = character
            .episode
            .iter()
            .map(|url| self.fetch_episode(url));

        join_all(futures).await.into_iter().collect()
    }

    /// Get statistics for the listing table
    pub fn pending_stats(&self) -> PendingStats {
        self.pages.stats()
    }

    pub fn clear_pending(&self) {
        self.pages.clear();
        self.episodes.clear();
    }

    async fn get_page(http: Client, url: String) -> Result<Page, Error> {
        let mut response = Self::get(&http, &url).await?;

        if response.status() == StatusCode::NotFound {
            log::info!("No characters matched {}", url);
            return Ok(Page::empty());
        }

        Self::decode(&mut response, &url).await
    }

    async fn get(http: &Client, url: &str) -> Result<Response, Error> {
        // surf panics on unparsable urls, so check first
        let parsed = Url::parse(url).map_err(|err| Error::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        http.get(parsed).await.map_err(|err| Error::Transport {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: &mut Response, url: &str) -> Result<T, Error> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status as u16,
            });
        }

        response.body_json::<T>().await.map_err(|err| Error::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}
