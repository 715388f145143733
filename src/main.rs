use clap::Parser;
use tracing_subscriber::EnvFilter;

use securedata::cli::Cli;
use securedata::config::Config;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv(); // Optional .env next to the working directory

    let cli = Cli::parse();
    let config = cli.resolve_config(Config::from_env()?)?;
    init_tracing(config.log_json);

    cli.run(config)
}

/// Logs go to stderr so cleaned text on stdout stays pipeable.
fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("securedata=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
