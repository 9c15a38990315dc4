use axum::{
  Extension, Router,
  response::{IntoResponse, Response},
  routing::get,
};
use http::{StatusCode, header};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::{account::Account, aggregate::Aggregator};

pub fn router() -> Router {
  Router::new()
    .route("/tweets", get(handle_tweets))
    .route("/accounts", get(handle_accounts))
    .layer(CorsLayer::permissive())
}

async fn handle_tweets(
  Extension(aggregator): Extension<Aggregator>,
) -> impl IntoResponse {
  ApiResponse(aggregator.aggregate().await)
}

async fn handle_accounts(
  Extension(aggregator): Extension<Aggregator>,
) -> ApiResponse<Vec<Account>> {
  ApiResponse(aggregator.directory().accounts().to_vec())
}

/// JSON body that clients must not cache.
pub struct ApiResponse<T>(pub T);

impl<T: Serialize> IntoResponse for ApiResponse<T> {
  fn into_response(self) -> Response {
    let body = match serde_json::to_string(&self.0) {
      Ok(body) => body,
      Err(e) => {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
          .into_response();
      }
    };

    let headers = [
      (header::CONTENT_TYPE, "application/json; charset=utf-8"),
      (header::CACHE_CONTROL, "no-cache"),
    ];
    (StatusCode::OK, headers, body).into_response()
  }
}
