pub mod models;

use reqwest::{header::HeaderMap, Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::context::FetchContext;
use super::{decode_body, ApiError, BaseApiClient, ReqwestTransport, Transport};
use crate::config::Config;
use crate::constants::{TAGS_ENDPOINT, TOTAL_COUNT_HEADER};
use models::page_outcome::PageOutcome;
use models::page_request::PageRequest;
use models::tag::Tag;

/// Last page index of a listing of `total_count` items
pub fn max_page(total_count: u64, per_page: u32) -> u64 {
    total_count / u64::from(per_page.max(1))
}

/// `Total-Count` header value, `None` if missing or not a number
fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

pub struct QiitaApi {
    pub client: BaseApiClient,
    per_page: u32,
    sort: String,
    max_pages: Option<u32>,
}

impl QiitaApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        let config = config.clone().validate()?;
        let client = BaseApiClient::new(&config.base_url, transport)?;
        Ok(Self {
            client,
            per_page: config.per_page,
            sort: config.sort,
            max_pages: config.max_pages.filter(|max_pages| *max_pages > 0),
        })
    }

    /// Client for a mock server, without a page limit
    #[cfg(test)]
    pub fn mock(url: &str) -> Self {
        let config = Config {
            base_url: url.to_string(),
            max_pages: None,
            ..Config::default()
        };
        Self::new(&config).unwrap()
    }

    pub async fn get_tags_page(
        &self,
        ctx: &FetchContext,
        page: u64,
    ) -> Result<PageOutcome, ApiError> {
        let page_request = PageRequest::new(page, self.per_page, &self.sort);
        let mut request = self.client.new_request(ctx, Method::GET, TAGS_ENDPOINT, None)?;
        page_request.apply(request.url_mut());

        let response = self.client.send(ctx, request).await?;
        if response.status != StatusCode::OK {
            return Ok(PageOutcome::Unavailable(response.status));
        }

        let total_count = total_count(&response.headers);
        let tags: Vec<Tag> = ctx.run(decode_body(response)).await?;
        debug!(page, tags = tags.len(), ?total_count, "decoded page");
        Ok(PageOutcome::Fetched { tags, total_count })
    }

    /// Last page to request given the total from the first page
    fn last_page(&self, total_count: Option<u64>) -> Option<u64> {
        let limit = self.max_pages.map(u64::from);
        match total_count {
            Some(total_count) => {
                let max_page = max_page(total_count, self.per_page);
                Some(limit.map_or(max_page, |limit| max_page.min(limit)))
            }
            None => limit,
        }
    }

    /// All tags across pages, in page order.
    ///
    /// A non-200 answer ends the listing: no tags if it comes for the first page,
    /// the tags gathered so far otherwise. Without a `Total-Count` header pages
    /// are requested until one comes back short.
    pub async fn list_tags(&self, ctx: &FetchContext) -> Result<Vec<Tag>, ApiError> {
        let (mut tag_list, total_count) = match self.get_tags_page(ctx, 1).await? {
            PageOutcome::Fetched { tags, total_count } => (tags, total_count),
            PageOutcome::Unavailable(status) => {
                warn!(%status, "first page of tags unavailable");
                return Ok(Vec::new());
            }
        };

        let last_page = self.last_page(total_count);
        info!(?total_count, per_page = self.per_page, ?last_page, "listing tags");

        let mut last_page_len = tag_list.len();
        let mut page: u64 = 2;
        loop {
            if last_page.is_some_and(|last_page| page > last_page) {
                break;
            }
            if total_count.is_none() && last_page_len < self.per_page as usize {
                break;
            }

            match self.get_tags_page(ctx, page).await? {
                PageOutcome::Fetched { tags, .. } => {
                    last_page_len = tags.len();
                    tag_list.extend(tags);
                }
                PageOutcome::Unavailable(status) => {
                    warn!(%status, page, "tags page unavailable, returning partial list");
                    break;
                }
            }
            page += 1;
        }

        info!(tags = tag_list.len(), "listed tags");
        Ok(tag_list)
    }
}
