use reqwest::StatusCode;

use super::tag::Tag;

/// Result of requesting one page of tags
#[derive(Debug)]
pub enum PageOutcome {
    Fetched {
        tags: Vec<Tag>,
        /// Value of the `Total-Count` header, when present and numeric
        total_count: Option<u64>,
    },
    /// The server answered with a status other than 200
    Unavailable(StatusCode),
}
