use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use geojson::Geometry;
use map_client::{Backend, FetchError, FetchResult};
use model::{
    query::{AreaQuery, NodeQuery, RouteQuery},
    route::RouteResult,
    tower::Tower,
    BoundingBox,
};

pub mod boundary;
pub mod client;
pub mod coverage;
pub mod node;
pub mod route;
pub mod towers;

pub use client::{DzrApiClient, DzrApiConfig};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    NotFound {
        url: String,
        reason: String,
    },
    MissingConfig(&'static str),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, url, text)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::NotFound { url, reason } => write!(f, "Not found {}: {}", url, reason),
            ApiError::MissingConfig(variable) => {
                write!(f, "environment variable {} is not set", variable)
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<ApiError> for FetchError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::RequestError(why) if why.is_decode() => FetchError::Decode(why.to_string()),
            ApiError::RequestError(why) => FetchError::Transport(why),
            ApiError::JsonError(why) => FetchError::Decode(why.to_string()),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => FetchError::Status {
                status: status_code.as_u16(),
                url,
                body: response,
            },
            ApiError::NotFound { url, reason } => FetchError::Status {
                status: reqwest::StatusCode::NOT_FOUND.as_u16(),
                url,
                body: Some(reason),
            },
            other @ ApiError::MissingConfig(_) => FetchError::transport(other),
        }
    }
}

#[async_trait]
impl Backend for DzrApiClient {
    async fn node_at(&self, query: NodeQuery) -> FetchResult<String> {
        Ok(node::get_node_at(self, &query).await?)
    }

    async fn route(&self, query: RouteQuery) -> FetchResult<RouteResult> {
        Ok(route::get_route(self, &query).await?)
    }

    async fn towers(&self, query: AreaQuery) -> FetchResult<Vec<Tower>> {
        Ok(towers::get_towers(self, &query).await?)
    }

    async fn coverage_gaps(&self, query: AreaQuery) -> FetchResult<Vec<Geometry>> {
        Ok(coverage::get_low_coverage(self, &query).await?)
    }

    async fn map_bounds(&self) -> FetchResult<BoundingBox> {
        Ok(boundary::get_map_coords(self).await?)
    }
}
