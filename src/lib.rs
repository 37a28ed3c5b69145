pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod model;
pub mod state;
pub mod util;

pub use cache::Cache;
pub use config::{ApiConfig, CacheConfig, PlayMode};
pub use context::AppContext;
pub use error::{Error, Result};
pub use http::{
    MusicApi,
    params::{QueryParams, QueryValue},
    transport::{HttpTransport, JsonpOptions, Transport},
};
pub use state::{PlayerState, Store};
