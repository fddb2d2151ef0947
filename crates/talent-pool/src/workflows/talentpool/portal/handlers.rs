use std::sync::Arc;

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::forms::{
    ApplyForm, EducationForm, ExperienceBulkForm, ExperienceForm, SkillForm, WishListForm,
};
use super::pages::{
    templates, AddFormContext, AddSkillContext, ApplicationsContext, ApplyContext,
    EducationsContext, ExperiencesContext, PortalPage, SkillsContext, TalentContext,
};
use super::paths;
use super::session::{PortalSession, CSRF_FIELD};
use super::PortalError;
use crate::workflows::talentpool::repository::{PortalAccounts, TalentRepository};
use crate::workflows::talentpool::self_service::ApplyOutcome;
use crate::workflows::talentpool::TalentPoolService;

type PortalState<R, P> = State<Arc<TalentPoolService<R, P>>>;

/// Render a page that posts back a form, setting the CSRF cookie alongside the token.
fn form_page<T: Serialize>(session: &PortalSession, template: &'static str, context: T) -> Response {
    let token = session.csrf_token();
    let cookie = token.cookie();
    let page = PortalPage::new(template, context).with_csrf(token.into_string());
    ([(SET_COOKIE, cookie)], Json(page)).into_response()
}

pub(crate) async fn applications_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Json<PortalPage<ApplicationsContext>>, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let applications = service.portal_applications(&scope)?;
    Ok(Json(PortalPage::new(
        templates::APPLICATIONS,
        ApplicationsContext { applications },
    )))
}

pub(crate) async fn apply_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Response, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let context = ApplyContext {
        jobs: service.published_jobs()?,
        has_talent: scope.talent().is_some(),
    };
    Ok(form_page(&session, templates::APPLY, context))
}

pub(crate) async fn apply_submit<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(form): Form<ApplyForm>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    session.verify_csrf(form.csrf_token.as_deref())?;
    let scope = service.portal_scope(session.user_id)?;
    match service.submit_application(&scope, form.job_id())? {
        ApplyOutcome::Rejected(reason) => {
            debug!(user = %session.user_id, ?reason, "returning caller to the apply form");
            Ok(Redirect::to(paths::APPLY))
        }
        ApplyOutcome::Submitted { .. } => Ok(Redirect::to(paths::APPLICATIONS)),
    }
}

pub(crate) async fn talent_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Response, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let overview = service.portal_profile(&scope)?;
    Ok(form_page(
        &session,
        templates::TALENT,
        TalentContext::from_overview(overview),
    ))
}

pub(crate) async fn talent_update<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(form): Form<WishListForm>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    service.update_wish_list(&scope, form.into())?;
    Ok(Redirect::to(paths::TALENT))
}

pub(crate) async fn educations_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Json<PortalPage<EducationsContext>>, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let educations = service.portal_educations(&scope)?;
    Ok(Json(PortalPage::new(
        templates::EDUCATIONS,
        EducationsContext { educations },
    )))
}

pub(crate) async fn experiences_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Json<PortalPage<ExperiencesContext>>, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let experiences = service.portal_experiences(&scope)?;
    Ok(Json(PortalPage::new(
        templates::EXPERIENCES,
        ExperiencesContext { experiences },
    )))
}

pub(crate) async fn skills_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Json<PortalPage<SkillsContext>>, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let skills = service.portal_skills(&scope)?;
    Ok(Json(PortalPage::new(templates::SKILLS, SkillsContext { skills })))
}

pub(crate) async fn add_education_page(session: PortalSession) -> Response {
    form_page(&session, templates::ADD_EDUCATION, AddFormContext {})
}

pub(crate) async fn add_experience_page(session: PortalSession) -> Response {
    form_page(&session, templates::ADD_EXPERIENCE, AddFormContext {})
}

pub(crate) async fn add_skill_page(session: PortalSession) -> Response {
    form_page(&session, templates::ADD_SKILL, AddSkillContext::new())
}

pub(crate) async fn add_education_submit<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(form): Form<EducationForm>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    session.verify_csrf(form.csrf_token.as_deref())?;
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(err) => {
            warn!(user = %session.user_id, error = %err, "education form rejected");
            return Ok(Redirect::to(paths::ADD_EDUCATION));
        }
    };
    let scope = service.portal_scope(session.user_id)?;
    service.add_education(&scope, entry)?;
    Ok(Redirect::to(paths::EDUCATIONS))
}

pub(crate) async fn add_experience_submit<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(form): Form<ExperienceForm>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    session.verify_csrf(form.csrf_token.as_deref())?;
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(err) => {
            warn!(user = %session.user_id, error = %err, "experience form rejected");
            return Ok(Redirect::to(paths::ADD_EXPERIENCE));
        }
    };
    let scope = service.portal_scope(session.user_id)?;
    service.add_experience(&scope, entry)?;
    Ok(Redirect::to(paths::EXPERIENCES))
}

pub(crate) async fn add_skill_submit<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(form): Form<SkillForm>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    session.verify_csrf(form.csrf_token.as_deref())?;
    let entry = match form.into_entry() {
        Ok(entry) => entry,
        Err(err) => {
            warn!(user = %session.user_id, error = %err, "skill form rejected");
            return Ok(Redirect::to(paths::ADD_SKILL));
        }
    };
    let scope = service.portal_scope(session.user_id)?;
    service.add_skill(&scope, entry)?;
    Ok(Redirect::to(paths::SKILLS))
}

pub(crate) async fn edit_experience_page<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
) -> Result<Response, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let scope = service.portal_scope(session.user_id)?;
    let experiences = service.portal_experiences(&scope)?;
    Ok(form_page(
        &session,
        templates::EDIT_EXPERIENCE,
        ExperiencesContext { experiences },
    ))
}

pub(crate) async fn update_experiences<R, P>(
    State(service): PortalState<R, P>,
    session: PortalSession,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, PortalError>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    let submitted = pairs
        .iter()
        .find(|(key, _)| key == CSRF_FIELD)
        .map(|(_, value)| value.as_str());
    session.verify_csrf(submitted)?;

    let form = match ExperienceBulkForm::from_pairs(pairs) {
        Ok(form) => form,
        Err(err) => {
            warn!(user = %session.user_id, error = %err, "experience edit rejected");
            return Ok(Redirect::to(paths::EDIT_EXPERIENCE));
        }
    };

    let scope = service.portal_scope(session.user_id)?;
    let report = service.update_experiences(&scope, form.updates)?;
    debug!(
        user = %session.user_id,
        updated = report.updated.len(),
        rejected = report.rejected.len(),
        "experience rows updated"
    );
    Ok(Redirect::to(paths::EXPERIENCES))
}
