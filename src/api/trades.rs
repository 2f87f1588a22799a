//! Persisted copy: trades, workflows and stats straight from the database.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tokio::task;

use super::{ApiResult, AppState};
use crate::application::stats::DashboardStats;
use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::entities::workflow::TradeWorkflow;
use crate::domain::ports::workflow_repository::{StoredStep, StoredWorkflow};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWorkflow {
    pub id: i64,
    pub trade_id: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trades/equity", get(list_equity).post(create_equity))
        .route("/api/trades/fx", get(list_fx).post(create_fx))
        .route("/api/workflows", get(list_workflows).post(create_workflow))
        .route("/api/workflow-steps", get(list_steps))
        .route("/api/stats", get(stats))
}

/// Runs a blocking database call off the async runtime.
async fn blocking<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&crate::ConfirmDesk) -> Result<T, crate::domain::error::DomainError> + Send + 'static,
{
    let desk = state.desk.clone();
    let result = task::spawn_blocking(move || f(&desk))
        .await
        .map_err(|e| ("database task failed", e))?;
    Ok(result?)
}

async fn list_equity(State(state): State<AppState>) -> ApiResult<Json<Vec<EquityTrade>>> {
    blocking(&state, |desk| desk.persisted_equity()).await.map(Json)
}

async fn list_fx(State(state): State<AppState>) -> ApiResult<Json<Vec<FxTrade>>> {
    blocking(&state, |desk| desk.persisted_fx()).await.map(Json)
}

async fn create_equity(
    State(state): State<AppState>,
    body: Result<Json<EquityTrade>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Trade>)> {
    let Json(trade) = body.map_err(|e| ("invalid equity trade", e))?;
    let added = blocking(&state, move |desk| desk.add_trade(Trade::Equity(trade))).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

async fn create_fx(
    State(state): State<AppState>,
    body: Result<Json<FxTrade>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Trade>)> {
    let Json(trade) = body.map_err(|e| ("invalid FX trade", e))?;
    let added = blocking(&state, move |desk| desk.add_trade(Trade::Fx(trade))).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

async fn list_workflows(State(state): State<AppState>) -> ApiResult<Json<Vec<StoredWorkflow>>> {
    blocking(&state, |desk| desk.persisted_workflows()).await.map(Json)
}

async fn create_workflow(
    State(state): State<AppState>,
    body: Result<Json<TradeWorkflow>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedWorkflow>)> {
    let Json(workflow) = body.map_err(|e| ("invalid workflow", e))?;
    let trade_id = workflow.trade_id.clone();
    let id = blocking(&state, move |desk| desk.add_workflow(&workflow)).await?;
    Ok((StatusCode::CREATED, Json(CreatedWorkflow { id, trade_id })))
}

async fn list_steps(State(state): State<AppState>) -> ApiResult<Json<Vec<StoredStep>>> {
    blocking(&state, |desk| desk.persisted_steps()).await.map(Json)
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    blocking(&state, |desk| desk.stats()).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{desk, send};
    use axum::http::StatusCode;
    use serde_json::json;

    fn equity_body(id: &str, status: &str) -> String {
        json!({
            "tradeId": id,
            "orderId": "O1",
            "clientId": "C1",
            "isin": "US0378331005",
            "symbol": "AAPL",
            "side": "Buy",
            "quantity": 100.0,
            "price": 60000.0,
            "tradeValue": 6000000.0,
            "currency": "USD",
            "tradeDate": "2024-03-01",
            "settlementDate": null,
            "settlementStatus": "Pending",
            "counterparty": "JPM",
            "tradingVenue": "NYSE",
            "traderName": "Alice",
            "kycStatus": "Verified",
            "referenceDataValidated": true,
            "commission": 0.0,
            "taxes": 0.0,
            "totalCost": 6000000.0,
            "confirmationStatus": status,
            "countryOfTrade": "US",
            "opsTeamNotes": ""
        })
        .to_string()
    }

    #[tokio::test]
    async fn created_trade_shows_in_stats() {
        let desk = desk();
        let (status, body) = send(
            build_router(desk.clone()),
            "POST",
            "/api/trades/equity",
            Some(equity_body("T1", "Failed")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["tradeType"], "equity");
        assert_eq!(body["enrichment"]["riskLevel"], "Critical");

        let (status, stats) = send(build_router(desk.clone()), "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalTrades"], 1);
        assert_eq!(stats["totalEquityTrades"], 1);
        assert_eq!(stats["failedTrades"], 1);
        assert_eq!(stats["totalWorkflows"], 1);

        let (_, steps) = send(build_router(desk), "GET", "/api/workflow-steps", None).await;
        assert_eq!(steps.as_array().map(Vec::len), Some(12));
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_500_with_error() {
        let desk = desk();
        send(build_router(desk.clone()), "POST", "/api/trades/equity", Some(equity_body("T1", "Pending"))).await;
        let (status, body) = send(
            build_router(desk),
            "POST",
            "/api/trades/equity",
            Some(equity_body("T1", "Pending")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("T1"));
    }

    #[tokio::test]
    async fn rejected_status_leaves_database_empty() {
        let desk = desk();
        let (status, body) = send(
            build_router(desk.clone()),
            "POST",
            "/api/trades/equity",
            Some(equity_body("T1", "Disputed")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("not valid"));

        let (_, stats) = send(build_router(desk.clone()), "GET", "/api/stats", None).await;
        assert_eq!(stats["totalTrades"], 0);
        assert_eq!(stats["totalWorkflows"], 0);
        let (_, trades) = send(build_router(desk), "GET", "/api/trades/equity", None).await;
        assert_eq!(trades.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn malformed_body_is_a_500_with_error() {
        let (status, body) = send(build_router(desk()), "POST", "/api/trades/fx", Some("{}".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }
}
