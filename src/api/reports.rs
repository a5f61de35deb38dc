//! Dashboard and report endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::models::report::{DashboardStats, PeriodReport, ReportQuery};

use super::AuthenticatedSession;

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Headline counters", body = DashboardStats)
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Json<DashboardStats> {
    Json(state.services.reports.dashboard(&session).await)
}

/// New records per source within a period
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Period report", body = PeriodReport)
    )
)]
pub async fn period_report(
    State(state): State<crate::AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<ReportQuery>,
) -> Json<PeriodReport> {
    Json(state.services.reports.period_report(&session, query.period).await)
}
