use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{EntryDetail, EntryPage};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_TIMEOUT_SECONDS: usize = 10;

const USER_AGENT: &str = concat!("gamedex/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub api_url: String,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            proxy: None,
        }
    }
}

/// Thin async wrapper over the entry list and entry detail endpoints.
#[derive(Clone, Debug)]
pub struct DexClient {
    http: reqwest::Client,
    api_url: String,
}

impl DexClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let api_url = options.api_url.trim().trim_end_matches('/').to_string();
        if reqwest::Url::parse(&api_url).is_err() {
            return Err(ClientError::InvalidUrl { url: api_url });
        }
        let http = build_http_client(options.proxy.as_deref(), options.timeout_seconds)?;
        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn list_url(&self, limit: u32, offset: u32) -> Result<reqwest::Url, ClientError> {
        let raw = format!("{}/pokemon", self.api_url);
        let mut url = reqwest::Url::parse(&raw).map_err(|_| ClientError::InvalidUrl { url: raw })?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    pub fn detail_url_for_id(&self, id: u64) -> String {
        format!("{}/pokemon/{}", self.api_url, id)
    }

    pub async fn fetch_list(&self, limit: u32, offset: u32) -> Result<EntryPage, ClientError> {
        let url = self.list_url(limit, offset)?;
        self.get_json(url.as_str()).await
    }

    /// Follows a `next`/`previous` link returned by a previous page.
    pub async fn fetch_page(&self, url: &str) -> Result<EntryPage, ClientError> {
        self.get_json(url).await
    }

    pub async fn fetch_details(&self, url: &str) -> Result<EntryDetail, ClientError> {
        self.get_json(url).await
    }

    pub async fn fetch_by_id(&self, id: u64) -> Result<EntryDetail, ClientError> {
        let url = self.detail_url_for_id(id);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| ClientError::InvalidUrl {
            url: url.to_string(),
        })?;
        let resp = self
            .http
            .get(parsed)
            .send()
            .await
            .map_err(|e| ClientError::Request {
                url: url.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.json::<T>().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

fn build_http_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
) -> Result<reqwest::Client, ClientError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| ClientError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ClientError::HttpClientBuild { source: e })
}
