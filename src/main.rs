use clap::Parser;
use qiita_tags::cli_app::{handle_command, Cli};
use qiita_tags::constants::Message;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr, stdout carries only tag lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(&cli, std::io::stdout()).await {
        eprintln!("{}", Message::FetchFailed(e.to_string()).to_formatted_string());
        std::process::exit(1);
    }
}
