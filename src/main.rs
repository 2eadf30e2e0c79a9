//! HTTP front for the query compiler: compile criteria, check saved-query
//! applicability and list the searchable fields of each domain.
//!
//! Usage: `demandsearch [config-file]`. Settings fall back to
//! `demandsearch.toml` and `DEMANDSEARCH__*` environment variables.

use demandsearch::server;
use demandsearch::settings::Settings;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> demandsearch::Result<()> {
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("demandsearch={},tower_http=info", settings.log_level)));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let listener = tokio::net::TcpListener::bind(settings.bind.as_str()).await?;
    info!(bind = %settings.bind, "compile service listening");
    axum::serve(listener, server::router()).await?;
    Ok(())
}
