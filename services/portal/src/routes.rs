use crate::infra::{AdminAuth, AdminState, AdminUser, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use talent_pool::error::AppError;
use talent_pool::workflows::talentpool::{
    portal_router, ApplicantId, ConversionSummary, Notification, PortalAccounts, PortalUser,
    ReapplySummary, Talent, TalentId, TalentOverview, TalentPoolService, TalentRepository,
    UserId,
};
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertRequest {
    pub(crate) applicant_ids: Vec<ApplicantId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConvertResponse {
    pub(crate) notification: Notification,
    pub(crate) created: usize,
    pub(crate) skipped: usize,
    pub(crate) summary: ConversionSummary,
}

impl From<ConversionSummary> for ConvertResponse {
    fn from(summary: ConversionSummary) -> Self {
        Self {
            notification: summary.notification(),
            created: summary.created(),
            skipped: summary.skipped(),
            summary,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReapplyRequest {
    pub(crate) talent_ids: Vec<TalentId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReapplyResponse {
    pub(crate) notification: Notification,
    pub(crate) applicant_ids: Vec<ApplicantId>,
    pub(crate) summary: ReapplySummary,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeletionMarkRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
    #[serde(default)]
    pub(crate) marked_by: Option<UserId>,
}

pub(crate) fn with_portal_routes<R, P>(
    service: Arc<TalentPoolService<R, P>>,
    auth: AdminAuth,
) -> Router
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    portal_router(service.clone())
        .merge(admin_router(AdminState { service, auth }))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn admin_router<R, P>(state: AdminState<R, P>) -> Router
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    Router::new()
        .route(
            "/api/v1/talentpool/applicants/convert",
            post(convert_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/applicants/bulk-convert",
            post(bulk_convert_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/reapply",
            post(reapply_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/:talent_id",
            get(overview_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/:talent_id/portal-user",
            post(create_portal_user_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/:talent_id/portal-user/reset",
            post(reset_portal_user_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/:talent_id/linkedin",
            get(linkedin_endpoint::<R, P>),
        )
        .route(
            "/api/v1/talentpool/talents/:talent_id/deletion-mark",
            post(deletion_mark_endpoint::<R, P>),
        )
        .with_state(state)
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

pub(crate) async fn convert_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let summary = state.service.convert_to_talent(&request.applicant_ids)?;
    Ok(Json(summary.into()))
}

pub(crate) async fn bulk_convert_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let summary = state
        .service
        .bulk_convert_to_talent(&request.applicant_ids)?;
    Ok(Json(summary.into()))
}

pub(crate) async fn reapply_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Json(request): Json<ReapplyRequest>,
) -> Result<Json<ReapplyResponse>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let summary = state.service.reapply(&request.talent_ids)?;
    Ok(Json(ReapplyResponse {
        notification: summary.notification(),
        applicant_ids: summary.applicant_ids(),
        summary,
    }))
}

pub(crate) async fn overview_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Path(talent_id): Path<u64>,
) -> Result<Json<TalentOverview>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    Ok(Json(state.service.talent_overview(TalentId(talent_id))?))
}

pub(crate) async fn create_portal_user_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Path(talent_id): Path<u64>,
) -> Result<(StatusCode, Json<Vec<PortalUser>>), AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let users = state.service.create_portal_user(&[TalentId(talent_id)])?;
    info!(talent_id, "portal user provisioned");
    Ok((StatusCode::CREATED, Json(users)))
}

pub(crate) async fn reset_portal_user_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Path(talent_id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let users = state.service.reset_portal_user(&[TalentId(talent_id)])?;
    Ok(Json(json!({ "reset_requested_for": users })))
}

pub(crate) async fn linkedin_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Path(talent_id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let url = state.service.open_linkedin(TalentId(talent_id))?;
    Ok(Json(json!({ "url": url })))
}

pub(crate) async fn deletion_mark_endpoint<R, P>(
    _admin: AdminUser,
    State(state): State<AdminState<R, P>>,
    Path(talent_id): Path<u64>,
    Json(request): Json<DeletionMarkRequest>,
) -> Result<Json<Talent>, AppError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let talent =
        state
            .service
            .mark_for_deletion(TalentId(talent_id), request.reason, request.marked_by)?;
    Ok(Json(talent))
}
