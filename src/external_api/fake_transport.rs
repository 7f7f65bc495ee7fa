use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Request, StatusCode, Url};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{ApiError, ResponseBody, Transport, TransportResponse};
use crate::constants::TOTAL_COUNT_HEADER;

/// Canned reply for one request
pub(crate) enum FakeReply {
    Response {
        status: StatusCode,
        total_count: Option<u64>,
        body: String,
    },
    /// Never answers
    Hang,
}

impl FakeReply {
    pub(crate) fn ok(body: &str) -> Self {
        FakeReply::Response {
            status: StatusCode::OK,
            total_count: None,
            body: body.to_string(),
        }
    }

    pub(crate) fn page(total_count: u64, body: &str) -> Self {
        FakeReply::Response {
            status: StatusCode::OK,
            total_count: Some(total_count),
            body: body.to_string(),
        }
    }

    pub(crate) fn status(status: u16) -> Self {
        FakeReply::Response {
            status: StatusCode::from_u16(status).unwrap(),
            total_count: None,
            body: String::new(),
        }
    }
}

struct FakeBody {
    data: Vec<u8>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl ResponseBody for FakeBody {
    async fn read_all(&mut self) -> Result<Vec<u8>, ApiError> {
        Ok(std::mem::take(&mut self.data))
    }
}

impl Drop for FakeBody {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory transport that replays canned replies in order
/// and records every request it receives.
#[derive(Clone)]
pub(crate) struct FakeTransport {
    replies: Arc<Mutex<VecDeque<FakeReply>>>,
    requests: Arc<Mutex<Vec<Url>>>,
    content_types: Arc<Mutex<Vec<Option<HeaderValue>>>>,
    released: Arc<AtomicUsize>,
}

impl FakeTransport {
    pub(crate) fn new(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            content_types: Arc::new(Mutex::new(Vec::new())),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    /// Value of the `page` query parameter of each request, in order
    pub(crate) fn requested_pages(&self) -> Vec<u64> {
        self.requests()
            .iter()
            .map(|url| {
                url.query_pairs()
                    .find(|(key, _)| key == "page")
                    .and_then(|(_, value)| value.parse().ok())
                    .unwrap_or(0)
            })
            .collect()
    }

    pub(crate) fn content_types(&self) -> Vec<Option<HeaderValue>> {
        self.content_types.lock().unwrap().clone()
    }

    pub(crate) fn released_bodies(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse, ApiError> {
        self.requests.lock().unwrap().push(request.url().clone());
        self.content_types
            .lock()
            .unwrap()
            .push(request.headers().get(reqwest::header::CONTENT_TYPE).cloned());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {}", request.url()));

        match reply {
            FakeReply::Response {
                status,
                total_count,
                body,
            } => {
                let mut headers = HeaderMap::new();
                if let Some(total_count) = total_count {
                    headers.insert(
                        HeaderName::from_bytes(TOTAL_COUNT_HEADER.as_bytes()).unwrap(),
                        HeaderValue::from(total_count),
                    );
                }
                Ok(TransportResponse {
                    status,
                    headers,
                    body: Box::new(FakeBody {
                        data: body.into_bytes(),
                        released: self.released.clone(),
                    }),
                })
            }
            FakeReply::Hang => std::future::pending().await,
        }
    }
}
