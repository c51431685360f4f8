use std::sync::Arc;

use juiceville_core::clock::SystemClock;
use juiceville_core::notify::LogNotifier;
use juiceville_order::MockPaymentGateway;
use juiceville_service::{catalog, checkout, customers, telemetry, AppState};
use juiceville_store::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init()?;

    let config = Config::load()?;
    tracing::info!("Starting Juiceville on port {}", config.server.port);

    let clock = Arc::new(SystemClock::new(config.business_rules.utc_offset_minutes));
    let state = AppState::in_memory(
        &config,
        Arc::new(MockPaymentGateway::new()),
        Arc::new(LogNotifier),
        clock,
    )
    .await;

    let zones = customers::selectable_zones(&state).await?;
    let menu = catalog::menu(&state).await?;
    tracing::info!(
        zones = zones.len(),
        sections = menu.sections.len(),
        combos = menu.combos.len(),
        "Store ready"
    );

    match checkout::ensure_ordering_open(&state).await {
        Ok(()) => tracing::info!("Ordering is open"),
        Err(e) => tracing::info!(reason = %e, "Ordering is closed"),
    }

    Ok(())
}
