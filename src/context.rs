use std::sync::Arc;

use tracing::info;

use crate::{
    cache::Cache,
    config::{ApiConfig, CacheConfig},
    error::Result,
    http::{MusicApi, transport::Transport},
    state::{PlayerState, Store, new_store},
};

pub struct AppContext<T: Transport = crate::http::transport::HttpTransport> {
    pub api: Arc<MusicApi<T>>,
    pub cache: Arc<Cache>,
    pub store: Store,
}

impl AppContext {
    pub fn new(api_config: ApiConfig, cache_config: &CacheConfig) -> Result<Self> {
        let api = MusicApi::new(api_config)?;
        Self::with_api(api, cache_config)
    }
}

impl<T: Transport> AppContext<T> {
    pub fn with_api(api: MusicApi<T>, cache_config: &CacheConfig) -> Result<Self> {
        let cache = Cache::open(cache_config)?;
        let state = PlayerState::load(&cache);
        info!(
            searches = state.search_history.len(),
            plays = state.play_history.len(),
            favorites = state.favorite_list.len(),
            "player state loaded"
        );

        Ok(Self {
            api: Arc::new(api),
            cache: Arc::new(cache),
            store: new_store(state),
        })
    }
}
