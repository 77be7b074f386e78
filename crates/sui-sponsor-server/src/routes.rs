//! HTTP routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use sui_sponsor_sdk::api::CoinProvider;
use sui_sponsor_sdk::transaction::{GasRequest, GasStation, MISSING_FIELDS_MESSAGE, http_error};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the service router with the gas endpoint mounted at `gas_path`.
pub fn router<C>(station: Arc<GasStation<C>>, gas_path: &str) -> Router
where
    C: CoinProvider + 'static,
{
    Router::new()
        .route(gas_path, post(sponsor_gas::<C>))
        .route("/health", get(health::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(station)
}

fn error_response(status: u16, message: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": message }))).into_response()
}

async fn sponsor_gas<C>(
    State(station): State<Arc<GasStation<C>>>,
    payload: Result<Json<GasRequest>, JsonRejection>,
) -> Response
where
    C: CoinProvider + 'static,
{
    // An unreadable body is treated like one with nothing in it.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected gas request body");
            return error_response(400, MISSING_FIELDS_MESSAGE.to_string());
        }
    };

    match station.sponsor(request).await.into_result() {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            let (status, message) = http_error(&e);
            if status >= 500 {
                tracing::error!(error = %e, "sponsorship failed");
            }
            error_response(status, message)
        }
    }
}

async fn health<C>(State(station): State<Arc<GasStation<C>>>) -> Json<serde_json::Value>
where
    C: CoinProvider + 'static,
{
    Json(json!({
        "status": "ok",
        "feePayerAddress": station.address().to_hex(),
        "coinType": station.coin_type(),
    }))
}
