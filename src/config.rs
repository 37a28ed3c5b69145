use std::path::PathBuf;

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::http::{params::QueryParams, transport::JsonpOptions};

pub const ERR_OK: i64 = 0;

pub const DEFAULT_RECOMMEND_URL: &str =
    "https://c.y.qq.com/musichall/fcgi-bin/fcg_yqqhomepagerecommend.fcg";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:8080";
pub const DEFAULT_SONG_LIST_DISSTID: i64 = 4182163707;

lazy_static! {
    /// Platform and auth constants sent with every request.
    pub static ref COMMON_PARAMS: QueryParams = QueryParams::new()
        .with("g_tk", 1928093487)
        .with("inCharset", "utf-8")
        .with("outCharset", "utf-8")
        .with("notice", 0)
        .with("format", "jsonp");
}

pub fn jsonp_options() -> JsonpOptions {
    JsonpOptions {
        param: "jsonpCallback".to_string(),
        prefix: "__jp".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayMode {
    #[default]
    Sequence,
    Loop,
    Random,
}

impl From<PlayMode> for u8 {
    fn from(mode: PlayMode) -> Self {
        match mode {
            PlayMode::Sequence => 0,
            PlayMode::Loop => 1,
            PlayMode::Random => 2,
        }
    }
}

impl TryFrom<u8> for PlayMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlayMode::Sequence),
            1 => Ok(PlayMode::Loop),
            2 => Ok(PlayMode::Random),
            other => Err(format!("unknown play mode {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub recommend_url: String,
    pub proxy_base_url: String,
    pub song_list_disstid: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            recommend_url: DEFAULT_RECOMMEND_URL.to_string(),
            proxy_base_url: DEFAULT_PROXY_URL.to_string(),
            song_list_disstid: DEFAULT_SONG_LIST_DISSTID,
        }
    }
}

impl ApiConfig {
    /// Reads `QMUSIC_RECOMMEND_URL` and `QMUSIC_PROXY_URL`, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            recommend_url: std::env::var("QMUSIC_RECOMMEND_URL")
                .unwrap_or(defaults.recommend_url),
            proxy_base_url: std::env::var("QMUSIC_PROXY_URL")
                .unwrap_or(defaults.proxy_base_url),
            song_list_disstid: defaults.song_list_disstid,
        }
    }

    pub fn proxy_url(&self, path: &str) -> String {
        format!("{}{}", self.proxy_base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: data_dir().join("cache.json"),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        match std::env::var("QMUSIC_CACHE_FILE") {
            Ok(path) => Self { path: path.into() },
            Err(_) => Self::default(),
        }
    }
}

pub fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "qmusic", env!("CARGO_PKG_NAME"))
}

pub fn data_dir() -> PathBuf {
    project_directory()
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_params_carry_platform_constants() {
        assert_eq!(COMMON_PARAMS.len(), 5);
        let value = |key| COMMON_PARAMS.get(key).map(|v| v.to_string());
        assert_eq!(value("g_tk").as_deref(), Some("1928093487"));
        assert_eq!(value("format").as_deref(), Some("jsonp"));
    }

    #[test]
    fn proxy_url_joins_without_double_slash() {
        let config = ApiConfig {
            proxy_base_url: "http://127.0.0.1:9000/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.proxy_url("/api/getDiscList"),
            "http://127.0.0.1:9000/api/getDiscList"
        );
    }

    #[test]
    fn play_mode_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PlayMode::Random).unwrap(), "2");
        let mode: PlayMode = serde_json::from_str("1").unwrap();
        assert_eq!(mode, PlayMode::Loop);
        assert!(serde_json::from_str::<PlayMode>("7").is_err());
    }
}
