use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::asset_source::AssetSource;
use crate::config::WikiConfig;
use crate::error::{FetchError, ProxyError};

pub const FETCH_IMAGE_PATH: &str = "/fetchImage";
pub const MISSING_URL_MESSAGE: &str = "No url provided.";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds the proxy route for a wiki-relative image path.
#[must_use]
pub fn fetch_image_route(image_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", image_path)
        .finish();
    format!("{FETCH_IMAGE_PATH}?{query}")
}

/// A parsed `/fetchImage` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub url: Option<String>,
}

impl ProxyRequest {
    /// # Errors
    ///
    /// Returns `FetchError::BadRoute` when the path is not `/fetchImage`.
    pub fn from_route(route: &str) -> Result<Self, FetchError> {
        let (path, query) = route.split_once('?').unwrap_or((route, ""));
        if path != FETCH_IMAGE_PATH {
            return Err(FetchError::BadRoute(route.to_string()));
        }
        let url = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned());
        Ok(Self { url })
    }
}

/// What the proxy hands back: the upstream status, content type and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            body: value.to_string().into_bytes(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with(JSON_CONTENT_TYPE))
    }
}

/// Re-fetches wiki images by relative path and passes the response through.
#[derive(Clone)]
pub struct AssetProxy {
    client: Client,
    config: WikiConfig,
}

impl AssetProxy {
    #[must_use]
    pub fn new(config: WikiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: WikiConfig) -> Self {
        Self { client, config }
    }

    /// Serve one `/fetchImage` request.
    ///
    /// A missing `url` answers with a JSON message instead of an image; a path
    /// that does not start with `/` answers 400. Everything else is fetched from
    /// `<wiki base> + url` and returned verbatim, whatever the upstream status.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError` when the upstream url is invalid or the transfer fails.
    pub async fn handle(&self, url: Option<&str>) -> Result<ProxyResponse, ProxyError> {
        let Some(path) = url else {
            return Ok(ProxyResponse::json(200, &json!(MISSING_URL_MESSAGE)));
        };
        if !path.starts_with('/') {
            return Ok(ProxyResponse::json(400, &json!(format!("Invalid url: {path}"))));
        }

        let upstream = Url::parse(&format!("{}{path}", self.config.base()))?;
        debug!(%upstream, "proxying image");
        let response = self.client.get(upstream).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(ProxyResponse {
            status,
            content_type,
            body,
        })
    }

    /// # Errors
    ///
    /// Returns `FetchError::BadRoute` for unknown routes and `FetchError::Proxy`
    /// for transport failures.
    pub async fn handle_route(&self, route: &str) -> Result<ProxyResponse, FetchError> {
        let request = ProxyRequest::from_route(route)?;
        Ok(self.handle(request.url.as_deref()).await?)
    }
}

#[async_trait]
impl AssetSource for AssetProxy {
    async fn fetch(&self, route: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.handle_route(route).await?;
        if !response.is_success() {
            return Err(FetchError::HttpStatus(response.status));
        }
        if response.is_json() {
            return Err(FetchError::NotAnImage {
                content_type: JSON_CONTENT_TYPE.to_string(),
            });
        }
        Ok(response.body)
    }
}
