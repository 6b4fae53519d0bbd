use clap::Parser;

use email_categorizer::cli::{CategorizerArgs, execute_command};

#[tokio::main]
async fn main() {
    let args = CategorizerArgs::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_filter())),
        )
        .with_target(false)
        .init();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
