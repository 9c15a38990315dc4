mod api;

use std::path::{Path, PathBuf};

use axum::{Extension, Router, routing::get};
use clap::Parser;
use tower_http::{
  compression::CompressionLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::info;

use crate::{aggregate::Aggregator, util::Result};

#[derive(Parser)]
pub struct ServerConfig {
  #[clap(long, short, env = "BIND", default_value = "0.0.0.0:8000")]
  bind: String,
  /// Directory with the front-end files served at `/`
  #[clap(long, env = "STATIC_DIR", default_value = "public")]
  static_dir: PathBuf,
}

pub async fn serve(
  server_config: ServerConfig,
  aggregator: Aggregator,
) -> Result<()> {
  info!("listening on {}", server_config.bind);
  let listener = tokio::net::TcpListener::bind(&server_config.bind).await?;

  info!("serving static files from {}", server_config.static_dir.display());
  let app = router(aggregator, &server_config.static_dir);

  info!("starting server");
  Ok(axum::serve(listener, app).await?)
}

pub fn router(aggregator: Aggregator, static_dir: &Path) -> Router {
  Router::new()
    .nest("/api", api::router())
    .route("/health", get(|| async { "ok" }))
    .fallback_service(ServeDir::new(static_dir))
    .layer(Extension(aggregator))
    .layer(CompressionLayer::new().gzip(true))
    .layer(TraceLayer::new_for_http())
}
