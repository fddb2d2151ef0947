use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_pool::workflows::talentpool::{PortalAccounts, TalentPoolService, TalentRepository};

pub(crate) const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Back-office key guarding the admin routes. Without a key every admin call is refused.
#[derive(Debug, Clone, Default)]
pub(crate) struct AdminAuth {
    api_key: Option<Arc<str>>,
}

impl AdminAuth {
    pub(crate) fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Arc::from),
        }
    }
}

pub(crate) struct AdminState<R, P> {
    pub(crate) service: Arc<TalentPoolService<R, P>>,
    pub(crate) auth: AdminAuth,
}

impl<R, P> Clone for AdminState<R, P> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<R, P> FromRef<AdminState<R, P>> for AdminAuth
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    fn from_ref(state: &AdminState<R, P>) -> Self {
        state.auth.clone()
    }
}

/// Marker extracted once the caller presented the admin key.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AdminUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdminRejection {
    NotConfigured,
    MissingKey,
    InvalidKey,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AdminRejection::NotConfigured => "admin API key is not configured",
            AdminRejection::MissingKey => "missing x-api-key header",
            AdminRejection::InvalidKey => "invalid API key",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AdminAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AdminAuth::from_ref(state);
        let expected = auth.api_key.ok_or(AdminRejection::NotConfigured)?;

        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AdminRejection::MissingKey)?;

        if provided != &*expected {
            return Err(AdminRejection::InvalidKey);
        }
        Ok(AdminUser)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
