use crate::infra::AppState;
use appraisal_engine::error::AppError;
use appraisal_engine::scoring::views::AppraisalSummary;
use appraisal_engine::scoring::{
    resolve_active_months, Appraisal, Month, PerformanceSection, ReportingPeriod,
};
use appraisal_engine::tabular::{import_table, merge_import, TableReader};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(flatten)]
    pub(crate) appraisal: Appraisal,
    #[serde(default)]
    pub(crate) include_rows: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) summary: AppraisalSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sections: Option<Vec<PerformanceSection>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) period: Option<ReportingPeriod>,
    /// Sections already on the appraisal; imported sections replace
    /// matching ones and the rest are kept.
    #[serde(default)]
    pub(crate) existing_sections: Option<Vec<PerformanceSection>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) period_label: String,
    pub(crate) active_months: Vec<Month>,
    pub(crate) sections: Vec<PerformanceSection>,
    pub(crate) unrecognized_section_names: Vec<String>,
}

pub(crate) fn appraisal_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/appraisal/evaluate",
            axum::routing::post(evaluate_endpoint),
        )
        .route(
            "/api/v1/appraisal/import",
            axum::routing::post(import_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let EvaluateRequest {
        appraisal,
        include_rows,
    } = payload;

    let report = state.engine.evaluate(&appraisal);
    let summary = report.summary();
    let sections = if include_rows {
        Some(report.sections)
    } else {
        None
    };

    Ok(Json(EvaluateResponse { summary, sections }))
}

pub(crate) async fn import_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    let ImportRequest {
        csv,
        period,
        existing_sections,
    } = payload;

    let period = period.unwrap_or(state.engine.config().default_period);
    let active_months = resolve_active_months(&period);

    let table = TableReader::from_reader(Cursor::new(csv.into_bytes()))?;
    let outcome = import_table(&table, &active_months);
    let unrecognized_section_names = outcome.unrecognized_section_names.clone();

    let sections = match existing_sections {
        Some(existing) => merge_import(&existing, outcome),
        None => outcome.sections,
    };

    info!(
        period = %period.label(),
        sections = sections.len(),
        unrecognized = unrecognized_section_names.len(),
        "appraisal table imported"
    );

    Ok(Json(ImportResponse {
        period_label: period.label(),
        active_months,
        sections,
        unrecognized_section_names,
    }))
}
