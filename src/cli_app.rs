use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::command_logic::tags::print_tags;
use crate::config::Config;
use crate::external_api::context::FetchContext;
use crate::external_api::{qiita_api::QiitaApi, ApiError};

#[derive(Parser, Debug)]
#[command(
    name = "qiita-tags",
    version,
    about = "Lists Qiita tags with their follower counts",
    long_about = None
)]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// Base url of the Qiita API
    #[arg(long, short)]
    pub base_url: Option<String>,
    /// Tags requested per page
    #[arg(long, short, value_parser = validate_u32_more_then_zero)]
    pub per_page: Option<u32>,
    /// Maximum number of pages to request, 0 for no limit
    #[arg(long, short)]
    pub max_pages: Option<u32>,
    /// Sort key: count or name
    #[arg(long, short)]
    pub sort: Option<String>,
}

impl Cli {
    /// Config file (or defaults) with the flags applied on top
    pub fn load_config(&self) -> Result<Config, ApiError> {
        let mut config = match &self.config {
            Some(path) => Config::get_config(path)?,
            None => Config::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(per_page) = self.per_page {
            config.per_page = per_page;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = Some(max_pages);
        }
        if let Some(sort) = &self.sort {
            config.sort = sort.clone();
        }
        config.validate()
    }
}

fn validate_u32_more_then_zero(value: &str) -> Result<u32, ApiError> {
    let number: u32 = value.parse().map_err(|_| ApiError::Parse(value.to_string()))?;
    if number == 0 {
        return Err(ApiError::InvalidPerPage(number));
    }
    Ok(number)
}

/// One full fetch-and-print cycle
pub async fn handle_command<W: Write>(cli: &Cli, output: W) -> Result<usize, ApiError> {
    let config = cli.load_config()?;
    let qiita_api = QiitaApi::new(&config)?;
    print_tags(&qiita_api, &FetchContext::background(), output).await
}
