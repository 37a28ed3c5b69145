use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    http::params::QueryParams,
};

static CALLBACK_COUNT: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, PartialEq)]
pub struct JsonpOptions {
    /// Query parameter the callback name is sent under.
    pub param: String,
    pub prefix: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn jsonp(
        &self,
        url: &str,
        params: &QueryParams,
        options: &JsonpOptions,
    ) -> Result<Value>;

    async fn get(&self, url: &str, params: &QueryParams) -> Result<Value>;
}

pub struct HttpTransport {
    pub client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        trace!(url, bytes = body.len(), "response received");
        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn jsonp(
        &self,
        url: &str,
        params: &QueryParams,
        options: &JsonpOptions,
    ) -> Result<Value> {
        let callback = next_callback_name(&options.prefix);
        let params = params
            .clone()
            .with(options.param.as_str(), callback.as_str());
        let url = params.append_to(url);
        debug!(%url, "jsonp request");

        let body = self.fetch_text(&url).await?;
        let json = strip_padding(&body, &callback).ok_or_else(|| {
            Error::MalformedJsonp {
                url: url.clone(),
                reason: format!("expected {callback}(...) wrapper"),
            }
        })?;
        Ok(serde_json::from_str(json)?)
    }

    async fn get(&self, url: &str, params: &QueryParams) -> Result<Value> {
        let url = params.append_to(url);
        debug!(%url, "get request");

        let body = self.fetch_text(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub fn next_callback_name(prefix: &str) -> String {
    format!("{prefix}{}", CALLBACK_COUNT.fetch_add(1, Ordering::Relaxed))
}

/// Returns the JSON inside `callback(...)`. A body that already starts like
/// plain JSON is passed through untouched.
pub fn strip_padding<'a>(body: &'a str, callback: &str) -> Option<&'a str> {
    let body = body.trim();
    if body.starts_with('{') || body.starts_with('[') {
        return Some(body);
    }

    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    let inner = body
        .strip_prefix(callback)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(inner.trim())
}
