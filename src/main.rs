use clap::Parser;
use sql_dbml::app::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    let verbose = args.verbose;

    let default_filter = if verbose { "sql_dbml=debug" } else { "sql_dbml=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match sql_dbml::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            if verbose {
                eprintln!("{:?}", err);
            }
            ExitCode::FAILURE
        }
    }
}
