pub const CONFIG_DIR: &str = ".config/qiita-tags";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "https://qiita.com/api/v2";
pub const DEFAULT_PER_PAGE: u32 = 2;
pub const DEFAULT_SORT: &str = "count";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound the API accepts for `per_page`
pub const MAX_PER_PAGE: u32 = 100;
pub const TAGS_ENDPOINT: &str = "/tags";
pub const TOTAL_COUNT_HEADER: &str = "Total-Count";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Standard message
#[derive(Debug)]
pub enum Message {
    TagLine(String, u64),
    FetchFailed(String),
}

impl Message {
    pub fn to_formatted_string(&self) -> String {
        match self {
            Message::TagLine(id, followers_count) => format!("{}, {}", id, followers_count),
            Message::FetchFailed(error) => format!("Failed to list tags: {}", error),
        }
    }
}
