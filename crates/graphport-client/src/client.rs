//! Graph client implementation for the Zep Cloud API.

use async_trait::async_trait;
use graphport_core::error::{ErrorCode, ZepError, ZepResult};
use graphport_core::{ClientConfig, Edge, Episode, GraphClient};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use url::{Host, Url};

/// Client for the Zep Cloud graph API.
#[derive(Clone)]
pub struct ZepClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    edges: Option<Vec<Edge>>,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    #[serde(default)]
    episodes: Option<Vec<Episode>>,
}

impl ZepClient {
    /// Create a new client from a config.
    pub fn new(config: ClientConfig) -> ZepResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Api-Key {}", config.api_key.expose_secret()))
            .map_err(|_| ZepError::configuration("ZEP_API_KEY contains invalid header characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout);
        // Local endpoints are never reached through a system proxy.
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ZepError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Base URL with the given path segments appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> ZepResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ZepError::configuration(format!("base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> ZepResult<Response> {
        let response = request.send().await.map_err(|e| transport_error(action, e))?;
        check_status(response).await
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Turn a non-success response into a typed error carrying status and body.
async fn check_status(response: Response) -> ZepResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let content_length = response.content_length();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), ?content_length, "Request failed");
    Err(ZepError::from_http_status(status.as_u16(), body, content_length))
}

fn transport_error(action: &str, err: reqwest::Error) -> ZepError {
    let code = if err.is_timeout() {
        ErrorCode::NetTimeout
    } else {
        ErrorCode::NetConnectionFailed
    };
    ZepError::Network {
        message: format!("Failed to {}: {}", action, err),
        code,
        source: Some(Box::new(err)),
    }
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> ZepResult<T> {
    response
        .json()
        .await
        .map_err(|e| ZepError::parse(format!("Failed to parse response: {}", e)))
}

#[async_trait]
impl GraphClient for ZepClient {
    async fn add_episode(&self, user_id: &str, data: &str) -> ZepResult<Episode> {
        let body = json!({
            "user_id": user_id,
            "type": "text",
            "data": data,
        });

        let request = self.client.post(self.url(&["graph"])?).json(&body);
        let response = self.send(request, "add episode").await?;
        parse(response).await
    }

    async fn search_edges(&self, user_id: &str, query: &str, limit: usize) -> ZepResult<Vec<Edge>> {
        let body = json!({
            "user_id": user_id,
            "query": query,
            "limit": limit,
            "scope": "edges",
        });

        let request = self.client.post(self.url(&["graph", "search"])?).json(&body);
        let response = self.send(request, "search graph").await?;
        let result: SearchResponse = parse(response).await?;
        Ok(result.edges.unwrap_or_default())
    }

    async fn episodes_by_user(&self, user_id: &str, lastn: usize) -> ZepResult<Vec<Episode>> {
        let request = self
            .client
            .get(self.url(&["graph", "episodes", "user", user_id])?)
            .query(&[("lastn", lastn)]);
        let response = self.send(request, "list episodes").await?;
        let result: EpisodesResponse = parse(response).await?;
        Ok(result.episodes.unwrap_or_default())
    }

    async fn add_user(&self, user_id: &str) -> ZepResult<()> {
        let request = self
            .client
            .post(self.url(&["users"])?)
            .json(&json!({ "user_id": user_id }));
        self.send(request, "add user").await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> ZepResult<()> {
        let request = self.client.delete(self.url(&["users", user_id])?);
        self.send(request, "delete user").await?;
        Ok(())
    }
}
