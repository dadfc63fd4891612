use crate::config::Config;
use crate::state::scope::ViewScope;
use catalog_client::CatalogClient;
use getset::Getters;
use log::info;
use std::sync::Arc;

#[derive(Getters)]
#[get = "pub"]
pub struct Context {
    catalog_client: CatalogClient,
    config: Config,
    listing_scope: ViewScope,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let catalog_client = CatalogClient::with_config(config.client_config());

        info!(
            "Initialized CatalogClient (base: {}, retention: {}ms, coalescing: {})",
            catalog_client.base_url(),
            config.retention_ms(),
            config.coalescing()
        );

        Self {
            catalog_client,
            config,
            listing_scope: ViewScope::new(),
        }
    }
}

pub type ContextPointer = Arc<Context>;
