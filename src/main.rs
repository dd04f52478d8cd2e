use std::sync::Arc;

use nutri_onboarding::config::ServerConfig;
use nutri_onboarding::onboarding::{
    OnboardingRouteState, OnboardingSession, ProfileStore, onboarding_routes,
};
use nutri_onboarding::store::{MemoryProfileRepository, ProfileRepository};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    eprintln!("NutriAI onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}/api/onboarding/status", config.bind_addr());
    eprintln!("   Session: {}", config.user_key);

    // ── Session ─────────────────────────────────────────────────────────
    // Snapshots live in process memory only; a restart starts from defaults.
    let repository: Arc<dyn ProfileRepository> = Arc::new(MemoryProfileRepository::new());
    let session = Arc::new(
        OnboardingSession::start(ProfileStore::new(), repository, config.user_key.clone()).await,
    );

    // ── HTTP ────────────────────────────────────────────────────────────
    let app = onboarding_routes(OnboardingRouteState { session }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Onboarding server started");
    axum::serve(listener, app).await?;

    Ok(())
}
