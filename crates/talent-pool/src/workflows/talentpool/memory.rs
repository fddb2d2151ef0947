use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Applicant, ApplicantDraft, ApplicantId, Education, EducationEntry, Experience,
    ExperienceEntry, Job, JobId, PartnerId, PortalUser, ProfileRecord, RecordId, RecordOwner,
    Skill, SkillEntry, Talent, TalentDraft, TalentId, UserId,
};
use super::repository::{
    AccountError, IdentityQuery, PortalAccounts, PortalUserRequest, RepositoryError,
    TalentRepository,
};

/// Mutex-guarded store used by the service binary, the CLI, and tests.
#[derive(Default, Clone)]
pub struct InMemoryTalentStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    talents: BTreeMap<TalentId, Talent>,
    applicants: BTreeMap<ApplicantId, Applicant>,
    educations: ProfileTable<EducationEntry>,
    experiences: ProfileTable<ExperienceEntry>,
    skills: ProfileTable<SkillEntry>,
    jobs: BTreeMap<JobId, Job>,
    next_talent: u64,
    next_applicant: u64,
    next_job: u64,
}

impl StoreState {
    fn owner_exists(&self, owner: RecordOwner) -> bool {
        match owner {
            RecordOwner::Talent(id) => self.talents.contains_key(&id),
            RecordOwner::Applicant(id) => self.applicants.contains_key(&id),
        }
    }
}

struct ProfileTable<T> {
    rows: BTreeMap<RecordId, ProfileRecord<T>>,
    next_id: u64,
}

impl<T> Default for ProfileTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> ProfileTable<T> {
    fn insert(&mut self, owner: RecordOwner, entry: T) -> ProfileRecord<T> {
        self.next_id += 1;
        let record = ProfileRecord {
            id: RecordId(self.next_id),
            owner,
            entry,
        };
        self.rows.insert(record.id, record.clone());
        record
    }

    fn owned_by(&self, owner: RecordOwner) -> Vec<ProfileRecord<T>> {
        self.rows
            .values()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect()
    }
}

impl InMemoryTalentStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a job opening.
    pub fn insert_job(&self, name: impl Into<String>, website_published: bool) -> Job {
        let mut state = self.lock();
        state.next_job += 1;
        let job = Job {
            id: JobId(state.next_job),
            name: name.into(),
            website_published,
        };
        state.jobs.insert(job.id, job.clone());
        job
    }

    pub fn talent_count(&self) -> usize {
        self.lock().talents.len()
    }

    pub fn applicant_count(&self) -> usize {
        self.lock().applicants.len()
    }
}

impl TalentRepository for InMemoryTalentStore {
    fn insert_talent(&self, draft: TalentDraft) -> Result<Talent, RepositoryError> {
        let mut state = self.lock();
        state.next_talent += 1;
        let talent = draft.into_talent(TalentId(state.next_talent));
        state.talents.insert(talent.id, talent.clone());
        Ok(talent)
    }

    fn update_talent(&self, talent: Talent) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        match state.talents.get_mut(&talent.id) {
            Some(stored) => {
                *stored = talent;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_talent(&self, id: TalentId) -> Result<Option<Talent>, RepositoryError> {
        Ok(self.lock().talents.get(&id).cloned())
    }

    fn talent_for_portal_user(&self, user: UserId) -> Result<Option<Talent>, RepositoryError> {
        Ok(self
            .lock()
            .talents
            .values()
            .find(|talent| talent.portal_user_id == Some(user))
            .cloned())
    }

    fn find_talent(&self, query: &IdentityQuery<'_>) -> Result<Option<Talent>, RepositoryError> {
        if query.is_empty() {
            return Ok(None);
        }
        Ok(self
            .lock()
            .talents
            .values()
            .find(|talent| query.matches(talent))
            .cloned())
    }

    fn insert_applicant(&self, draft: ApplicantDraft) -> Result<Applicant, RepositoryError> {
        let mut state = self.lock();
        if let Some(talent_id) = draft.talent_id {
            if !state.talents.contains_key(&talent_id) {
                return Err(RepositoryError::NotFound);
            }
        }
        state.next_applicant += 1;
        let applicant = draft.into_applicant(ApplicantId(state.next_applicant));
        state.applicants.insert(applicant.id, applicant.clone());
        Ok(applicant)
    }

    fn update_applicant(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        match state.applicants.get_mut(&applicant.id) {
            Some(stored) => {
                *stored = applicant;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Ok(self.lock().applicants.get(&id).cloned())
    }

    fn applicants_for_talent(
        &self,
        talent: TalentId,
        active_only: bool,
    ) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self
            .lock()
            .applicants
            .values()
            .filter(|applicant| applicant.talent_id == Some(talent))
            .filter(|applicant| applicant.active || !active_only)
            .cloned()
            .collect())
    }

    fn insert_education(
        &self,
        owner: RecordOwner,
        entry: EducationEntry,
    ) -> Result<Education, RepositoryError> {
        let mut state = self.lock();
        if !state.owner_exists(owner) {
            return Err(RepositoryError::NotFound);
        }
        Ok(state.educations.insert(owner, entry))
    }

    fn educations(&self, owner: RecordOwner) -> Result<Vec<Education>, RepositoryError> {
        Ok(self.lock().educations.owned_by(owner))
    }

    fn insert_experience(
        &self,
        owner: RecordOwner,
        entry: ExperienceEntry,
    ) -> Result<Experience, RepositoryError> {
        let mut state = self.lock();
        if !state.owner_exists(owner) {
            return Err(RepositoryError::NotFound);
        }
        Ok(state.experiences.insert(owner, entry))
    }

    fn experiences(&self, owner: RecordOwner) -> Result<Vec<Experience>, RepositoryError> {
        Ok(self.lock().experiences.owned_by(owner))
    }

    fn fetch_experience(&self, id: RecordId) -> Result<Option<Experience>, RepositoryError> {
        Ok(self.lock().experiences.rows.get(&id).cloned())
    }

    fn update_experience(&self, experience: Experience) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        match state.experiences.rows.get_mut(&experience.id) {
            // Ownership is fixed at creation time.
            Some(stored) if stored.owner == experience.owner => {
                stored.entry = experience.entry;
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn insert_skill(
        &self,
        owner: RecordOwner,
        entry: SkillEntry,
    ) -> Result<Skill, RepositoryError> {
        let mut state = self.lock();
        if !state.owner_exists(owner) {
            return Err(RepositoryError::NotFound);
        }
        Ok(state.skills.insert(owner, entry))
    }

    fn skills(&self, owner: RecordOwner) -> Result<Vec<Skill>, RepositoryError> {
        Ok(self.lock().skills.owned_by(owner))
    }

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(self
            .lock()
            .jobs
            .values()
            .filter(|job| job.website_published)
            .cloned()
            .collect())
    }

    fn fetch_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock().jobs.get(&id).cloned())
    }
}

/// Account registry standing in for the host platform's user and partner tables.
#[derive(Default, Clone)]
pub struct InMemoryPortalAccounts {
    state: Arc<Mutex<AccountState>>,
}

#[derive(Default)]
struct AccountState {
    users: BTreeMap<UserId, PortalUser>,
    reset_requests: Vec<UserId>,
    next_id: u64,
}

impl InMemoryPortalAccounts {
    fn lock(&self) -> MutexGuard<'_, AccountState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Users whose password reset was requested, in request order.
    pub fn reset_requests(&self) -> Vec<UserId> {
        self.lock().reset_requests.clone()
    }
}

impl PortalAccounts for InMemoryPortalAccounts {
    fn create_portal_user(&self, request: PortalUserRequest) -> Result<PortalUser, AccountError> {
        let mut state = self.lock();
        let login = request.login.trim().to_string();
        if state
            .users
            .values()
            .any(|user| user.login.eq_ignore_ascii_case(&login))
        {
            return Err(AccountError::LoginTaken(login));
        }

        state.next_id += 1;
        let user = PortalUser {
            id: UserId(state.next_id),
            partner_id: PartnerId(state.next_id),
            login,
            name: request.name,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn request_password_reset(&self, user: UserId) -> Result<(), AccountError> {
        let mut state = self.lock();
        if !state.users.contains_key(&user) {
            return Err(AccountError::UnknownUser(user));
        }
        state.reset_requests.push(user);
        Ok(())
    }

    fn fetch_user(&self, user: UserId) -> Result<Option<PortalUser>, AccountError> {
        Ok(self.lock().users.get(&user).cloned())
    }

    fn login_taken(&self, login: &str) -> Result<bool, AccountError> {
        let login = login.trim();
        Ok(self
            .lock()
            .users
            .values()
            .any(|user| user.login.eq_ignore_ascii_case(login)))
    }
}
