use std::net::SocketAddr;
use std::sync::Arc;

use ragdesk_api::config::{ServerConfig, StoreConfig};
use ragdesk_api::router::build_app_router;
use ragdesk_api::state::AppState;
use ragdesk_db::{FileKnowledgeStore, KnowledgeStore, PgKnowledgeStore};
use ragdesk_llm::ChatCompletionsApi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Knowledge store ---
    let store: Arc<dyn KnowledgeStore> = match &config.store {
        StoreConfig::Postgres(url) => Arc::new(
            PgKnowledgeStore::connect(url)
                .await
                .expect("Failed to open PostgreSQL knowledge store"),
        ),
        StoreConfig::File(path) => Arc::new(
            FileKnowledgeStore::open(path.clone())
                .await
                .expect("Failed to open knowledge file"),
        ),
    };
    tracing::info!(backend = store.backend(), "Knowledge store ready");

    // --- LLM client ---
    let llm = Arc::new(ChatCompletionsApi::new(
        config.llm.api_url.clone(),
        config.llm.api_key.clone(),
    ));
    if llm.has_api_key() {
        tracing::info!(api_url = %llm.api_url(), model = %config.llm.default_model, "LLM client configured");
    } else {
        tracing::warn!("No LLM API key set; /api/chat and /api/text-analysis will return 503");
    }

    // --- App state ---
    let state = AppState {
        store,
        llm,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ragdesk_api=debug,ragdesk_db=info,ragdesk_llm=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
