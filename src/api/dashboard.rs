//! In-memory dashboard: filtered views over the store and the actions users take on them.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::{ApiResult, AppState};
use crate::application::filter::{DashboardSummary, Facets, FilterCriteria};
use crate::application::ingest::UploadReport;
use crate::domain::entities::document_status::{DocumentInfo, DocumentStatus, DocumentType, DocumentUpdate};
use crate::domain::entities::failure_analysis::FailureAnalysis;
use crate::domain::entities::trade::Trade;
use crate::domain::entities::workflow::{TradeWorkflow, WorkflowAction};
use crate::domain::error::DomainError;

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub persist: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/trades", get(trades))
        .route("/api/dashboard/summary", get(summary))
        .route("/api/dashboard/facets", get(facets))
        .route("/api/dashboard/workflows", get(workflows))
        .route("/api/dashboard/actions", get(actions))
        .route("/api/dashboard/failures", get(failures))
        .route("/api/dashboard/failures/:trade_id/resolve", post(resolve_failure))
        .route("/api/dashboard/failures/:trade_id/escalate", post(escalate_failure))
        .route("/api/dashboard/trades/:trade_id/settlements", post(send_to_settlements))
        .route("/api/dashboard/documents/:trade_id", get(document))
        .route("/api/dashboard/documents/:trade_id/:document_type", patch(update_document))
        .route("/api/dashboard/upload", post(upload))
}

fn criteria(query: Result<Query<FilterCriteria>, QueryRejection>) -> ApiResult<FilterCriteria> {
    let Query(criteria) = query.map_err(|e| ("invalid filter", e))?;
    Ok(criteria)
}

async fn trades(
    State(state): State<AppState>,
    query: Result<Query<FilterCriteria>, QueryRejection>,
) -> ApiResult<Json<Vec<Trade>>> {
    Ok(Json(state.desk.trades(&criteria(query)?)))
}

async fn summary(
    State(state): State<AppState>,
    query: Result<Query<FilterCriteria>, QueryRejection>,
) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(state.desk.summary(&criteria(query)?)))
}

async fn facets(State(state): State<AppState>) -> Json<Facets> {
    Json(state.desk.facets())
}

async fn workflows(State(state): State<AppState>) -> Json<Vec<TradeWorkflow>> {
    Json(state.desk.workflows())
}

async fn actions(State(state): State<AppState>) -> Json<Vec<WorkflowAction>> {
    Json(state.desk.actions(Utc::now()))
}

async fn failures(State(state): State<AppState>) -> Json<Vec<FailureAnalysis>> {
    Json(state.desk.failures())
}

async fn resolve_failure(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> ApiResult<Json<FailureAnalysis>> {
    Ok(Json(state.desk.resolve_failure(&trade_id)?))
}

async fn escalate_failure(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> ApiResult<Json<FailureAnalysis>> {
    Ok(Json(state.desk.escalate_failure(&trade_id)?))
}

async fn send_to_settlements(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> ApiResult<Json<Trade>> {
    Ok(Json(state.desk.mark_sent_to_settlements(&trade_id)?))
}

async fn document(
    State(state): State<AppState>,
    Path(trade_id): Path<String>,
) -> ApiResult<Json<DocumentStatus>> {
    Ok(Json(state.desk.document(&trade_id)?))
}

async fn update_document(
    State(state): State<AppState>,
    Path((trade_id, document_type)): Path<(String, String)>,
    body: Result<Json<DocumentUpdate>, JsonRejection>,
) -> ApiResult<Json<DocumentInfo>> {
    let doc: DocumentType = document_type.parse().map_err(DomainError::InvalidInput)?;
    let Json(update) = body.map_err(|e| ("invalid document update", e))?;
    Ok(Json(state.desk.update_document(&trade_id, doc, &update)?))
}

async fn upload(
    State(state): State<AppState>,
    params: Result<Query<UploadParams>, QueryRejection>,
    body: String,
) -> ApiResult<Json<UploadReport>> {
    let Query(params) = params.map_err(|e| ("invalid upload parameters", e))?;
    let desk = state.desk.clone();
    let report = tokio::task::spawn_blocking(move || desk.upload(&body, params.persist))
        .await
        .map_err(|e| ("upload task failed", e))??;
    Ok(Json(report))
}
