//! Self-service portal routes under `/my`.
//!
//! Identity comes from the host platform; every handler resolves the caller to a
//! [`PortalScope`](crate::workflows::talentpool::access::PortalScope) before touching data.
//! Pages are returned as JSON contexts naming the template that renders them.

pub mod forms;
pub(crate) mod handlers;
pub mod pages;
pub mod session;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::repository::{PortalAccounts, TalentRepository};
use super::service::TalentPoolError;
use super::TalentPoolService;

pub use session::{PortalSession, CSRF_COOKIE, CSRF_FIELD, PORTAL_USER_HEADER};

pub mod paths {
    pub const APPLICATIONS: &str = "/my/applications";
    pub const APPLY: &str = "/my/apply";
    pub const APPLY_SUBMIT: &str = "/my/apply/submit";
    pub const TALENT: &str = "/my/talent";
    pub const TALENT_UPDATE: &str = "/my/talent/update";
    pub const EDUCATIONS: &str = "/my/education";
    pub const EXPERIENCES: &str = "/my/experience";
    pub const SKILLS: &str = "/my/skills";
    pub const ADD_EDUCATION: &str = "/my/education/add";
    pub const ADD_EXPERIENCE: &str = "/my/experience/add";
    pub const ADD_SKILL: &str = "/my/skills/add";
    pub const ADD_EDUCATION_SUBMIT: &str = "/my/education/add/submit";
    pub const ADD_EXPERIENCE_SUBMIT: &str = "/my/experience/add/submit";
    pub const ADD_SKILL_SUBMIT: &str = "/my/skills/add/submit";
    pub const EDIT_EXPERIENCE: &str = "/my/experience/edit";
    pub const UPDATE_EXPERIENCE: &str = "/my/experience/update";
}

/// Router builder exposing the candidate portal.
pub fn portal_router<R, P>(service: Arc<TalentPoolService<R, P>>) -> Router
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    Router::new()
        .route(paths::APPLICATIONS, get(handlers::applications_page::<R, P>))
        .route(paths::APPLY, get(handlers::apply_page::<R, P>))
        .route(paths::APPLY_SUBMIT, post(handlers::apply_submit::<R, P>))
        .route(paths::TALENT, get(handlers::talent_page::<R, P>))
        .route(paths::TALENT_UPDATE, post(handlers::talent_update::<R, P>))
        .route(paths::EDUCATIONS, get(handlers::educations_page::<R, P>))
        .route(paths::EXPERIENCES, get(handlers::experiences_page::<R, P>))
        .route(paths::SKILLS, get(handlers::skills_page::<R, P>))
        .route(paths::ADD_EDUCATION, get(handlers::add_education_page))
        .route(paths::ADD_EXPERIENCE, get(handlers::add_experience_page))
        .route(paths::ADD_SKILL, get(handlers::add_skill_page))
        .route(
            paths::ADD_EDUCATION_SUBMIT,
            post(handlers::add_education_submit::<R, P>),
        )
        .route(
            paths::ADD_EXPERIENCE_SUBMIT,
            post(handlers::add_experience_submit::<R, P>),
        )
        .route(
            paths::ADD_SKILL_SUBMIT,
            post(handlers::add_skill_submit::<R, P>),
        )
        .route(
            paths::EDIT_EXPERIENCE,
            get(handlers::edit_experience_page::<R, P>),
        )
        .route(
            paths::UPDATE_EXPERIENCE,
            post(handlers::update_experiences::<R, P>),
        )
        .with_state(service)
}

/// Failure answered by a portal route.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("portal session required")]
    Unauthenticated,
    #[error("missing or mismatched CSRF token")]
    CsrfRejected,
    #[error(transparent)]
    Service(#[from] TalentPoolError),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PortalError::CsrfRejected => StatusCode::FORBIDDEN,
            PortalError::Service(err) if err.is_user_facing() => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::Service(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            PortalError::Service(err) => {
                error!(error = %err, "portal request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let payload = json!({
            "error": self.to_string(),
        });
        (status, Json(payload)).into_response()
    }
}
