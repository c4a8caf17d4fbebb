//! API Server (Cold Path)
//!
//! Exposes plan computation over HTTP:
//! - GET /api/execution/plan?orderType=Buy&amount=7
//! - GET /api/metrics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::Level;

use crate::core::FixedPoint8;
use crate::engine::{ExecutionReport, ExecutionService};
use crate::hot_path::{AllocationError, Fill};
use crate::infrastructure::config::ApiConfig;
use crate::infrastructure::metrics::MetricsSnapshot;
use crate::{log_api, MetaError};

/// Query parameters for plan requests
///
/// Both are optional so that a missing value is reported as a 400 with a
/// readable message rather than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    pub order_type: Option<String>,
    pub amount: Option<String>,
}

/// One fill in the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOrderDto {
    pub exchange_id: String,
    pub order_id: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub amount: f64,
    pub price: f64,
}

/// Plan response DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlanDto {
    pub plan_id: String,
    pub order_type: String,
    pub requested_amount: f64,
    pub filled_amount: f64,
    pub orders: Vec<ExecutionOrderDto>,
    pub total_cost_or_revenue: f64,
}

impl From<&Fill> for ExecutionOrderDto {
    fn from(fill: &Fill) -> Self {
        Self {
            exchange_id: fill.venue_id.clone(),
            order_id: fill.order_id.clone(),
            order_type: fill.side.as_str().to_string(),
            amount: fill.quantity.to_f64(),
            price: fill.price.to_f64(),
        }
    }
}

impl From<ExecutionReport> for ExecutionPlanDto {
    fn from(report: ExecutionReport) -> Self {
        Self {
            plan_id: report.plan_id.to_string(),
            order_type: report.side.as_str().to_string(),
            requested_amount: report.requested.to_f64(),
            filled_amount: report.plan.filled_quantity().to_f64(),
            orders: report.plan.fills.iter().map(ExecutionOrderDto::from).collect(),
            total_cost_or_revenue: report.plan.total.to_f64(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorDto {
    error: String,
}

/// Handler failures mapped to HTTP statuses
#[derive(Debug)]
pub enum ApiError {
    /// 400 - the caller sent an unusable request
    BadRequest(String),
    /// 500 - details are logged, not returned
    Internal(String),
}

impl From<MetaError> for ApiError {
    fn from(err: MetaError) -> Self {
        match err {
            MetaError::Allocation(AllocationError::InvalidRequest(msg)) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                log_api!(Level::WARN, "Rejected plan request: {}", msg);
                (StatusCode::BAD_REQUEST, Json(ErrorDto { error: msg })).into_response()
            }
            ApiError::Internal(msg) => {
                log_api!(Level::ERROR, "Plan request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto {
                        error: "An error occurred while processing your request.".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ExecutionService,
}

/// Build the API router
pub fn router(service: ExecutionService) -> Router {
    Router::new()
        .route("/api/execution/plan", get(get_execution_plan))
        .route("/api/metrics", get(get_metrics))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}

/// Start the API server
pub async fn start_server(service: ExecutionService, config: &ApiConfig) -> Result<(), MetaError> {
    let app = router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(target: "api", "API Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handler for /api/execution/plan
async fn get_execution_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<ExecutionPlanDto>, ApiError> {
    let order_type = query.order_type.unwrap_or_default();
    let amount = match query.amount.as_deref().map(str::parse::<FixedPoint8>) {
        Some(Ok(amount)) => amount,
        Some(Err(e)) => {
            state.service.metrics().record_rejected();
            return Err(ApiError::BadRequest(e.to_string()));
        }
        None => {
            state.service.metrics().record_rejected();
            return Err(ApiError::BadRequest("amount is required".to_string()));
        }
    };

    // Snapshot loading is blocking file I/O
    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || service.plan(&order_type, amount))
        .await
        .map_err(|e| ApiError::Internal(format!("plan task failed: {}", e)))??;

    log_api!(
        Level::INFO,
        plan_id = %report.plan_id,
        "Served {} plan with {} orders",
        report.side,
        report.plan.len()
    );

    Ok(Json(ExecutionPlanDto::from(report)))
}

/// Handler for /api/metrics
async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.service.metrics().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::metrics::MetricsCollector;
    use crate::snapshots::{DirectorySource, SnapshotSource, StaticSource};
    use crate::test_utils::{ask, bid, venue};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn service_with(source: impl SnapshotSource + 'static) -> ExecutionService {
        ExecutionService::new(Arc::new(source), Arc::new(MetricsCollector::new()))
    }

    fn demo_service() -> ExecutionService {
        service_with(StaticSource::new(vec![
            venue(
                "exchange-01",
                10,
                100_000,
                vec![bid("bid-1", 5, 60_000)],
                vec![ask("ask-1", 1, 50_000)],
            ),
            venue(
                "exchange-02",
                10,
                500_000,
                vec![bid("bid-2", 5, 59_000)],
                vec![ask("ask-2", 10, 51_000)],
            ),
        ]))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        send(app, Method::GET, uri).await
    }

    #[tokio::test]
    async fn test_buy_plan_response() {
        let (status, body) = get(router(demo_service()), "/api/execution/plan?orderType=Buy&amount=7").await;

        assert_eq!(status, StatusCode::OK);
        let plan: ExecutionPlanDto = serde_json::from_slice(&body).unwrap();
        assert_eq!(plan.order_type, "Buy");
        assert_eq!(plan.requested_amount, 7.0);
        assert_eq!(plan.filled_amount, 7.0);
        assert_eq!(
            plan.orders,
            vec![
                ExecutionOrderDto {
                    exchange_id: "exchange-01".to_string(),
                    order_id: "ask-1".to_string(),
                    order_type: "Buy".to_string(),
                    amount: 1.0,
                    price: 50_000.0,
                },
                ExecutionOrderDto {
                    exchange_id: "exchange-02".to_string(),
                    order_id: "ask-2".to_string(),
                    order_type: "Buy".to_string(),
                    amount: 6.0,
                    price: 51_000.0,
                },
            ]
        );
        assert_eq!(plan.total_cost_or_revenue, 50_000.0 + 6.0 * 51_000.0);
        assert!(!plan.plan_id.is_empty());
    }

    #[tokio::test]
    async fn test_sell_plan_response_field_names() {
        let (status, body) = get(router(demo_service()), "/api/execution/plan?orderType=sell&amount=2").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["orders"][0]["exchangeId"], "exchange-01");
        assert_eq!(json["orders"][0]["type"], "Sell");
        assert_eq!(json["totalCostOrRevenue"], 120_000.0);
    }

    #[tokio::test]
    async fn test_rejects_bad_requests() {
        let cases = [
            "/api/execution/plan?orderType=Buy&amount=0",
            "/api/execution/plan?orderType=Buy&amount=-1",
            "/api/execution/plan?orderType=InvalidType&amount=5",
            "/api/execution/plan?orderType=&amount=5",
            "/api/execution/plan?amount=5",
            "/api/execution/plan?orderType=Buy&amount=abc",
            "/api/execution/plan?orderType=Buy&amount=100000000000",
            "/api/execution/plan?orderType=Buy",
        ];

        for uri in cases {
            let (status, body) = get(router(demo_service()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert!(json["error"].is_string(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let (status, _) = send(
            router(demo_service()),
            Method::POST,
            "/api/execution/plan?orderType=Buy&amount=7",
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_snapshots_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(DirectorySource::new(dir.path().join("missing")));

        let (status, body) = get(router(service), "/api/execution/plan?orderType=Buy&amount=7").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        // Internal details stay in the logs
        assert!(!json["error"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let app = router(demo_service());
        let (a, b, c, d) = tokio::join!(
            get(app.clone(), "/api/execution/plan?orderType=Buy&amount=10"),
            get(app.clone(), "/api/execution/plan?orderType=Sell&amount=5"),
            get(app.clone(), "/api/execution/plan?orderType=Buy&amount=20"),
            get(app.clone(), "/api/execution/plan?orderType=Sell&amount=15"),
        );
        for (status, _) in [a, b, c, d] {
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let service = demo_service();
        get(router(service.clone()), "/api/execution/plan?orderType=Buy&amount=1").await;
        get(router(service.clone()), "/api/execution/plan?orderType=Buy&amount=abc").await;

        let (status, body) = get(router(service), "/api/metrics").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["plansServed"], 1);
        assert_eq!(json["rejectedRequests"], 1);
    }
}
