use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::Request;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::talentpool::portal::{CSRF_COOKIE, PORTAL_USER_HEADER};
use crate::workflows::talentpool::repository::IdentityQuery;
use crate::workflows::talentpool::{
    portal_router, Applicant, ApplicantDraft, ApplicantId, Education, EducationEntry,
    Experience, ExperienceEntry, FixedClock, InMemoryPortalAccounts, InMemoryTalentStore, Job,
    JobId, RecordId, RecordOwner, RepositoryError, Skill, SkillEntry, SkillLevel, Talent,
    TalentDraft, TalentId, TalentPoolService, TalentRepository, UserId,
};

pub(super) const CSRF: &str = "3f5c0b1de2a94c7d8e6f1a2b3c4d5e6f";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) type MemoryService = TalentPoolService<InMemoryTalentStore, InMemoryPortalAccounts>;

pub(super) struct Fixture {
    pub(super) service: Arc<MemoryService>,
    pub(super) store: Arc<InMemoryTalentStore>,
    pub(super) accounts: Arc<InMemoryPortalAccounts>,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(InMemoryTalentStore::default());
    let accounts = Arc::new(InMemoryPortalAccounts::default());
    let service = Arc::new(TalentPoolService::with_clock(
        store.clone(),
        accounts.clone(),
        Arc::new(FixedClock(today())),
    ));
    Fixture {
        service,
        store,
        accounts,
    }
}

pub(super) fn applicant(store: &InMemoryTalentStore, name: &str, email: Option<&str>) -> Applicant {
    store
        .insert_applicant(ApplicantDraft {
            partner_name: Some(name.to_string()),
            email_from: email.map(str::to_string),
            phone: Some("+31 20 555 0100".to_string()),
            ..ApplicantDraft::named(format!("{name} application"))
        })
        .expect("applicant stored")
}

pub(super) fn talent(store: &InMemoryTalentStore, name: &str, email: &str) -> Talent {
    store
        .insert_talent(TalentDraft {
            name: name.to_string(),
            email: email.to_string(),
            creation_date: Some(date(2024, 1, 10)),
            last_update_date: Some(date(2024, 1, 10)),
            ..TalentDraft::default()
        })
        .expect("talent stored")
}

/// Talent with a provisioned portal account, as seen after the back office invited them.
pub(super) fn portal_talent(fixture: &Fixture, name: &str, email: &str) -> (Talent, UserId) {
    let created = talent(&fixture.store, name, email);
    let users = fixture
        .service
        .create_portal_user(&[created.id])
        .expect("portal user created");
    let user = users[0].id;
    let talent = fixture
        .store
        .fetch_talent(created.id)
        .expect("fetch succeeds")
        .expect("talent exists");
    (talent, user)
}

pub(super) fn seed_profile(store: &InMemoryTalentStore, talent_id: TalentId) {
    let owner = RecordOwner::Talent(talent_id);
    store
        .insert_education(
            owner,
            EducationEntry {
                name: Some("MSc Computer Science".to_string()),
                institute: Some("TU Delft".to_string()),
                start_date: Some(date(2015, 9, 1)),
                end_date: Some(date(2017, 8, 31)),
            },
        )
        .expect("education stored");
    for (name, company) in [("Engineer", "Acme"), ("Lead", "Globex")] {
        store
            .insert_experience(
                owner,
                ExperienceEntry {
                    name: Some(name.to_string()),
                    company: Some(company.to_string()),
                    ..ExperienceEntry::default()
                },
            )
            .expect("experience stored");
    }
    store
        .insert_skill(
            owner,
            SkillEntry {
                name: Some("Rust".to_string()),
                level: Some(SkillLevel::Expert),
            },
        )
        .expect("skill stored");
}

/// Store whose copies onto applicants fail, while every other call succeeds.
#[derive(Default, Clone)]
pub(super) struct FailingCopyStore {
    pub(super) inner: InMemoryTalentStore,
}

impl TalentRepository for FailingCopyStore {
    fn insert_talent(&self, draft: TalentDraft) -> Result<Talent, RepositoryError> {
        self.inner.insert_talent(draft)
    }

    fn update_talent(&self, talent: Talent) -> Result<(), RepositoryError> {
        self.inner.update_talent(talent)
    }

    fn fetch_talent(&self, id: TalentId) -> Result<Option<Talent>, RepositoryError> {
        self.inner.fetch_talent(id)
    }

    fn talent_for_portal_user(&self, user: UserId) -> Result<Option<Talent>, RepositoryError> {
        self.inner.talent_for_portal_user(user)
    }

    fn find_talent(&self, query: &IdentityQuery<'_>) -> Result<Option<Talent>, RepositoryError> {
        self.inner.find_talent(query)
    }

    fn insert_applicant(&self, draft: ApplicantDraft) -> Result<Applicant, RepositoryError> {
        self.inner.insert_applicant(draft)
    }

    fn update_applicant(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        self.inner.update_applicant(applicant)
    }

    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        self.inner.fetch_applicant(id)
    }

    fn applicants_for_talent(
        &self,
        talent: TalentId,
        active_only: bool,
    ) -> Result<Vec<Applicant>, RepositoryError> {
        self.inner.applicants_for_talent(talent, active_only)
    }

    fn insert_education(
        &self,
        owner: RecordOwner,
        entry: EducationEntry,
    ) -> Result<Education, RepositoryError> {
        if matches!(owner, RecordOwner::Applicant(_)) {
            return Err(RepositoryError::Unavailable("copy target offline".to_string()));
        }
        self.inner.insert_education(owner, entry)
    }

    fn educations(&self, owner: RecordOwner) -> Result<Vec<Education>, RepositoryError> {
        self.inner.educations(owner)
    }

    fn insert_experience(
        &self,
        owner: RecordOwner,
        entry: ExperienceEntry,
    ) -> Result<Experience, RepositoryError> {
        self.inner.insert_experience(owner, entry)
    }

    fn experiences(&self, owner: RecordOwner) -> Result<Vec<Experience>, RepositoryError> {
        self.inner.experiences(owner)
    }

    fn fetch_experience(&self, id: RecordId) -> Result<Option<Experience>, RepositoryError> {
        self.inner.fetch_experience(id)
    }

    fn update_experience(&self, experience: Experience) -> Result<(), RepositoryError> {
        self.inner.update_experience(experience)
    }

    fn insert_skill(&self, owner: RecordOwner, entry: SkillEntry) -> Result<Skill, RepositoryError> {
        self.inner.insert_skill(owner, entry)
    }

    fn skills(&self, owner: RecordOwner) -> Result<Vec<Skill>, RepositoryError> {
        self.inner.skills(owner)
    }

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.inner.published_jobs()
    }

    fn fetch_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.inner.fetch_job(id)
    }
}

pub(super) fn router(fixture: &Fixture) -> axum::Router {
    portal_router(fixture.service.clone())
}

pub(super) fn portal_get(path: &str, user: UserId) -> Request<Body> {
    Request::get(path)
        .header(PORTAL_USER_HEADER, user.0.to_string())
        .body(Body::empty())
        .expect("request builds")
}

/// Form post carrying the CSRF cookie; callers put the matching token in `body` when needed.
pub(super) fn portal_post(path: &str, user: UserId, body: &str) -> Request<Body> {
    Request::post(path)
        .header(PORTAL_USER_HEADER, user.0.to_string())
        .header(COOKIE, format!("{CSRF_COOKIE}={CSRF}"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(axum::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
