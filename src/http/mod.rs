pub mod params;
pub mod transport;

use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::{ApiConfig, COMMON_PARAMS, jsonp_options},
    error::Result,
};

use params::{QueryParams, QueryValue};
use transport::{HttpTransport, Transport};

pub const DISC_LIST_PATH: &str = "/api/getDiscList";
pub const SONG_LIST_PATH: &str = "/api/getSongList";

pub struct MusicApi<T: Transport = HttpTransport> {
    pub config: ApiConfig,
    transport: T,
}

impl MusicApi<HttpTransport> {
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> MusicApi<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Home page recommendation sliders, fetched over JSONP.
    pub async fn get_recommend(&self) -> Result<Value> {
        let params = recommend_params();
        debug!(url = %self.config.recommend_url, "fetching recommendations");
        self.transport
            .jsonp(&self.config.recommend_url, &params, &jsonp_options())
            .await
    }

    /// Playlist collections. The service checks host and referer, so this goes
    /// through the local proxy instead of JSONP.
    pub async fn get_disc_list(&self) -> Result<Value> {
        let url = self.config.proxy_url(DISC_LIST_PATH);
        let params = disc_list_params(rand::rng().random::<f64>());
        debug!(%url, "fetching disc list");
        self.transport.get(&url, &params).await
    }

    pub async fn get_song_list(&self) -> Result<Value> {
        let url = self.config.proxy_url(SONG_LIST_PATH);
        let params = song_list_params(self.config.song_list_disstid);
        debug!(%url, disstid = self.config.song_list_disstid, "fetching song list");
        self.transport.get(&url, &params).await
    }
}

pub fn recommend_params() -> QueryParams {
    QueryParams::merged(
        &COMMON_PARAMS,
        [
            ("platform", QueryValue::from("h5")),
            ("uin", 0.into()),
            ("needNewCode", 1.into()),
        ],
    )
}

pub fn disc_list_params(rnd: f64) -> QueryParams {
    QueryParams::merged(
        &COMMON_PARAMS,
        [
            ("platform", QueryValue::from("yqq")),
            ("hostUin", 0.into()),
            ("sin", 0.into()),
            ("ein", 29.into()),
            ("sortId", 5.into()),
            ("needNewCode", 0.into()),
            ("categoryId", 10000000.into()),
            ("rnd", rnd.into()),
            ("format", "json".into()),
        ],
    )
}

pub fn song_list_params(disstid: i64) -> QueryParams {
    QueryParams::merged(
        &COMMON_PARAMS,
        [
            ("uin", QueryValue::from(0)),
            ("platform", "h5".into()),
            ("needNewCode", 1.into()),
            ("new_format", 1.into()),
            ("pic", 500.into()),
            ("disstid", disstid.into()),
            ("type", 1.into()),
            ("json", 1.into()),
            ("utf8", 1.into()),
            ("onlysong", 0.into()),
            ("picmid", 1.into()),
            ("nosign", 1.into()),
            ("song_begin", 0.into()),
            ("song_num", 15.into()),
        ],
    )
}
