use std::env;

use serde::{Deserialize, Serialize};

use model::query::QueryPairs;

use crate::ApiError;

pub const BASE_URL_VAR: &str = "DZR_BASE_URL";
pub const PROXY_VAR: &str = "DZR_PROXY";

pub enum Accept {
    Json,
    Text,
}

impl Accept {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }
}

/// Where the routing server lives. All endpoints are resolved against
/// `base_url`, e.g. `http://localhost:8000`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DzrApiConfig {
    pub base_url: String,
    pub proxy: Option<String>,
}

impl DzrApiConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            proxy: None,
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var(BASE_URL_VAR).map_err(|_| ApiError::MissingConfig(BASE_URL_VAR))?;
        Ok(Self {
            base_url,
            proxy: env::var(PROXY_VAR).ok().filter(|proxy| !proxy.is_empty()),
        })
    }
}

pub struct DzrApiClient {
    pub config: DzrApiConfig,
    http: reqwest::Client,
}

impl DzrApiClient {
    /// Builds the http client once, with the optional proxy applied to every
    /// request.
    pub fn new(config: &DzrApiConfig) -> Result<Self, ApiError> {
        let http = match &config.proxy {
            Some(proxy_url) => {
                log::info!("Using proxy '{proxy_url}'.");
                reqwest::Client::builder()
                    .proxy(reqwest::Proxy::all(proxy_url)?)
                    .build()?
            }
            None => reqwest::Client::new(),
        };
        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    async fn send(
        &self,
        endpoint: &str,
        query: &QueryPairs,
        accept: &Accept,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(endpoint);
        log::debug!("Requesting Endpoint '{endpoint}'.");
        let response = self
            .http
            .get(&url)
            .query(query)
            .header("accept", accept.text())
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(response),
            other => {
                let url = response.url().to_string();
                Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: response.text().await.ok(),
                })
            }
        }
    }

    /// Fetch a json document from an endpoint using this client.
    pub async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &QueryPairs,
    ) -> Result<T, ApiError> {
        let response = self.send(endpoint, query, &Accept::Json).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the plain text body of an endpoint.
    pub async fn get_text(&self, endpoint: &str, query: &QueryPairs) -> Result<String, ApiError> {
        let response = self.send(endpoint, query, &Accept::Text).await?;
        Ok(response.text().await?)
    }
}
