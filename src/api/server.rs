//! HTTP server implementation

use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::index::IndexPaths;
use crate::index::IndexSnapshot;
use crate::llm::LlmService;
use crate::retrieval::Retriever;
use crate::Result;

/// Start the API server
///
/// Model weights are loaded before the listener binds, so an unloadable
/// model aborts startup. A missing or invalid index snapshot does not;
/// the server runs with exemplar retrieval disabled until an index is
/// built.
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting PromptRAG API server...");

    let state = build_state(config).await?;

    let mut app = routes::api_routes(state);

    // Add middleware layers
    app = app
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("");
    info!("Available endpoints:");
    info!("  GET  /          - Service info");
    info!("  GET  /health    - Health check");
    info!("  POST /optimize  - Rewrite a prompt and fetch similar exemplars");
    info!("  POST /simulate  - Run original and optimized prompts side by side");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the shared request state
///
/// Forces the embedding model load here; a `ModelUnavailable` propagates
/// out and the server never starts half-working.
async fn build_state(config: &AppConfig) -> Result<AppState> {
    let embedder = Arc::new(Embedder::new(config));
    embedder.preload().await?;

    let snapshot = load_snapshot(config);
    let retriever = Arc::new(Retriever::new(embedder, snapshot));
    let llm = Arc::new(LlmService::new(config)?);

    Ok(AppState { retriever, llm })
}

fn load_snapshot(config: &AppConfig) -> Option<Arc<IndexSnapshot>> {
    let paths = IndexPaths::from_config(config);
    if !paths.exists() {
        warn!(
            "Index artifacts not found at {} - run `promptrag build` to create them",
            paths.index.display()
        );
        return None;
    }

    match IndexSnapshot::load(&paths) {
        Ok(snapshot) => {
            if snapshot.manifest().model != config.embedding_model() {
                warn!(
                    "Index was built with model {} but config names {}",
                    snapshot.manifest().model,
                    config.embedding_model()
                );
            }
            Some(Arc::new(snapshot))
        }
        Err(e) => {
            warn!(
                "Failed to load index snapshot: {} - similar prompt search disabled",
                e
            );
            None
        }
    }
}
