pub mod context;
pub mod qiita_api;

#[cfg(test)]
pub(crate) mod fake_transport;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Body, Client, Method, Request, StatusCode, Url,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::constants::FORM_URLENCODED;
use context::FetchContext;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
    #[error("Deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to retrieve the user's directories")]
    NotFoundUserDir,
    #[error("Couldn't parse the config: {0}")]
    InvalidConfig(String),
    #[error("The string entered must be a URL")]
    InvalidUrl,
    #[error("per_page must be between 1 and 100, got {0}")]
    InvalidPerPage(u32),
    #[error("Unsupported sort key: {0}")]
    InvalidSort(String),
}

impl ApiError {
    /// Bad base URL or malformed request
    pub fn is_construction(&self) -> bool {
        matches!(self, ApiError::Parse(_))
    }

    /// Network failure, timeout or cancellation
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Reqwest(_) | ApiError::Cancelled | ApiError::DeadlineExceeded
        )
    }

    /// Malformed response body
    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Serde(_))
    }
}

/// Body of a response, released when dropped
#[async_trait]
pub trait ResponseBody: Send {
    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError>;
}

pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

/// Sends a request and hands back the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<TransportResponse, ApiError>;
}

struct ReqwestBody(Option<reqwest::Response>);

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError> {
        match self.0.take() {
            Some(response) => Ok(response.bytes().await?.to_vec()),
            None => Ok(Vec::new()),
        }
    }
}

/// Transport backed by a reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse, ApiError> {
        let response = self.client.execute(request).await?;
        Ok(TransportResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Box::new(ReqwestBody(Some(response))),
        })
    }
}

/// Basic api client
pub struct BaseApiClient {
    transport: Arc<dyn Transport>,
    pub base_url: Url,
}

impl BaseApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        let parse_base_url = Url::parse(base_url).map_err(|e| ApiError::Parse(e.to_string()))?;
        if parse_base_url.cannot_be_a_base() {
            return Err(ApiError::Parse(format!("{base_url} cannot be a base URL")));
        }

        Ok(Self {
            transport,
            base_url: parse_base_url,
        })
    }

    /// Appends the endpoint path to the base url path
    ///
    /// `https://qiita.com/api/v2` + `/tags` == `https://qiita.com/api/v2/tags`
    fn build_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Parse(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Builds a request bound to the deadline of `ctx`
    pub fn new_request(
        &self,
        ctx: &FetchContext,
        method: Method,
        endpoint: &str,
        body: Option<Body>,
    ) -> Result<Request, ApiError> {
        ctx.check()?;
        let url = self.build_url(endpoint)?;

        let mut request = Request::new(method, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        *request.timeout_mut() = ctx.remaining();
        *request.body_mut() = body;
        Ok(request)
    }

    pub async fn send(
        &self,
        ctx: &FetchContext,
        request: Request,
    ) -> Result<TransportResponse, ApiError> {
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = ctx.run(self.transport.send(request)).await?;
        debug!(status = %response.status, "received response");
        Ok(response)
    }
}

/// Reads the whole body and deserializes it.
/// The response is consumed, so its body is released on every path.
pub async fn decode_body<T: serde::de::DeserializeOwned>(
    response: TransportResponse,
) -> Result<T, ApiError> {
    let TransportResponse { mut body, .. } = response;
    let bytes = body.read_all().await?;
    drop(body);

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => Err(ApiError::Serde(e)),
    }
}
