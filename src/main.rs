//! Forex Calendar Bot — Binary Entrypoint
//! Boots the liveness server and the daily scheduler loop as independent
//! tasks. Configuration comes from the environment once at startup.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forex_calendar_bot::calendar::providers::{
    fcs_api::FcsApiProvider, html_fallback::HtmlFallbackProvider,
};
use forex_calendar_bot::calendar::types::CalendarSource;
use forex_calendar_bot::config::BotConfig;
use forex_calendar_bot::notify::discord::DiscordWebhook;
use forex_calendar_bot::translate::{GoogleTranslator, Translator};
use forex_calendar_bot::{api, metrics::Metrics, scheduler};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("forex_calendar_bot=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = BotConfig::from_env().context("loading configuration")?;
    if cfg.fcs_api_key.is_none() {
        tracing::warn!("FCS_API_KEY not set; relying on the scrape fallback only");
    }

    let metrics = Metrics::init();
    let router = api::create_router().merge(metrics.router());

    let primary: Box<dyn CalendarSource> = Box::new(FcsApiProvider::new(
        cfg.fcs_api_key.clone().unwrap_or_default(),
        cfg.importance_codes.clone(),
    ));
    let fallback: Box<dyn CalendarSource> = Box::new(HtmlFallbackProvider::new());
    let translator: Box<dyn Translator> = Box::new(GoogleTranslator::new());
    let sink = Box::new(DiscordWebhook::new(cfg.discord_webhook_url.clone()));

    let port = cfg.port;
    tokio::spawn(scheduler::run_loop(cfg, primary, fallback, translator, sink));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding liveness server on port {port}"))?;
    tracing::info!(port, "liveness server up");
    axum::serve(listener, router).await.context("serving http")?;
    Ok(())
}
