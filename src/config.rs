use directories::UserDirs;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_BASE_URL, DEFAULT_PER_PAGE, DEFAULT_SORT,
    DEFAULT_TIMEOUT_SECS, MAX_PER_PAGE,
};
use crate::external_api::ApiError;

const SORT_KEYS: [&str; 2] = ["count", "name"];

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base url of the API, e.g. https://qiita.com/api/v2
    pub base_url: String,
    /// Tags requested per page
    pub per_page: u32,
    /// Sort key of the listing
    pub sort: String,
    /// Upper bound on pages requested, `None` or 0 for no bound
    pub max_pages: Option<u32>,
    /// Timeout of a single request
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            sort: DEFAULT_SORT.to_string(),
            max_pages: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Config from the user's config directory, defaults if there is no file
    pub fn load() -> Result<Self, ApiError> {
        let path_to_config = default_config_path()?;
        if !path_to_config.exists() {
            return Ok(Self::default());
        }
        Self::get_config(&path_to_config)
    }

    /// Reads and validates the config at `path_to_config`
    pub fn get_config(path_to_config: &Path) -> Result<Self, ApiError> {
        let file = File::open(path_to_config)?;
        let config: Self = serde_json::from_reader(file).map_err(|e| {
            ApiError::InvalidConfig(format!("{}: {}", path_to_config.display(), e))
        })?;
        config.validate()
    }

    /// Checks every field, trimming a trailing `/` from the base url
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.base_url = validate_url(self.base_url)?;
        validate_per_page(self.per_page)?;
        validate_sort(&self.sort)?;
        Ok(self)
    }
}

pub fn default_config_path() -> Result<PathBuf, ApiError> {
    UserDirs::new()
        .ok_or(ApiError::NotFoundUserDir)
        .map(|user_dirs| user_dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE_NAME))
}

/// The string must be an http(s) URL
fn validate_url(mut value: String) -> Result<String, ApiError> {
    let regex =
        Regex::new(r"^https?://.+$").map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
    if !regex.is_match(&value) {
        return Err(ApiError::InvalidUrl);
    }
    if value.ends_with('/') {
        value.pop();
    }
    Ok(value)
}

fn validate_per_page(value: u32) -> Result<(), ApiError> {
    if value == 0 || value > MAX_PER_PAGE {
        return Err(ApiError::InvalidPerPage(value));
    }
    Ok(())
}

fn validate_sort(value: &str) -> Result<(), ApiError> {
    if !SORT_KEYS.contains(&value) {
        return Err(ApiError::InvalidSort(value.to_string()));
    }
    Ok(())
}
