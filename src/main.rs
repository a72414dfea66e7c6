use dotenvy::dotenv;
use story_portfolio::{
    cli::Args, errors::AppError, logging::setup_tracing, portfolio::PortfolioAggregator,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    let config = Args::init().unwrap_or_else(|e| {
        eprintln!("\n{e}");
        std::process::exit(1);
    });

    // Logging
    setup_tracing(config.log_level);

    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    let session = config.session();
    if !session.authenticated {
        warn!("No wallets given (--wallets or STORY_PORTFOLIO_WALLETS), nothing to load");
    }

    let aggregator = PortfolioAggregator::from_config(&config)?;
    let state = aggregator.on_session_change(&session).await;

    if state.address.is_some() {
        info!("{}", state.summary());
    }

    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
