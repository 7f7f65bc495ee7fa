pub mod cli_app;
pub mod command_logic;
pub mod config;
pub mod constants;
pub mod external_api;

pub use command_logic::tags::print_tags;
pub use config::Config;
pub use external_api::context::{CancelHandle, FetchContext};
pub use external_api::qiita_api::models::tag::Tag;
pub use external_api::qiita_api::QiitaApi;
pub use external_api::{ApiError, Transport};
