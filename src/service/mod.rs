//! Online categorization boundary: request handling and HTTP routes.

pub mod handler;
pub mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

pub use handler::{
    BatchItem, BatchRequest, BatchResponse, CategorizationService, CategorizeRequest,
    CategorizeResponse,
};
pub use routes::categorizer_routes;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::model::InferenceEngine;

/// Bind the configured port and serve until Ctrl-C.
pub async fn serve(config: ServiceConfig, engine: InferenceEngine) -> Result<(), ServiceError> {
    let service = Arc::new(CategorizationService::new(Arc::new(engine), &config));
    let app = categorizer_routes(Arc::clone(&service));

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        port = config.port,
        workers = config.workers,
        max_batch_size = config.max_batch_size,
        "Categorizer server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            service.close();
        })
        .await?;
    Ok(())
}
