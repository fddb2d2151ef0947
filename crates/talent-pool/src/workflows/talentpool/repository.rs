use super::domain::{
    Applicant, ApplicantDraft, ApplicantId, Education, EducationEntry, Experience,
    ExperienceEntry, Job, JobId, PortalUser, RecordId, RecordOwner, Skill, SkillEntry, Talent,
    TalentDraft, TalentId, UserId,
};

/// Identity fields used to detect an existing talent before creating a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityQuery<'a> {
    pub email: Option<&'a str>,
    pub linkedin_profile: Option<&'a str>,
}

impl IdentityQuery<'_> {
    /// Email matches ignore case and surrounding whitespace. Blank values never match.
    pub fn matches(&self, talent: &Talent) -> bool {
        let email_match = match non_blank(self.email) {
            Some(email) => email.eq_ignore_ascii_case(talent.email.trim()),
            None => false,
        };

        let linkedin_match = match (
            non_blank(self.linkedin_profile),
            non_blank(talent.linkedin_profile.as_deref()),
        ) {
            (Some(wanted), Some(stored)) => wanted == stored,
            _ => false,
        };

        email_match || linkedin_match
    }

    pub fn is_empty(&self) -> bool {
        non_blank(self.email).is_none() && non_blank(self.linkedin_profile).is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Storage abstraction for talents, applicants, their profile rows, and published jobs.
///
/// Profile rows are always created for an existing owner; implementations reject inserts
/// whose owner is unknown with [`RepositoryError::NotFound`].
pub trait TalentRepository: Send + Sync {
    fn insert_talent(&self, draft: TalentDraft) -> Result<Talent, RepositoryError>;
    fn update_talent(&self, talent: Talent) -> Result<(), RepositoryError>;
    fn fetch_talent(&self, id: TalentId) -> Result<Option<Talent>, RepositoryError>;
    /// First talent (lowest id) linked to the portal user.
    fn talent_for_portal_user(&self, user: UserId) -> Result<Option<Talent>, RepositoryError>;
    fn find_talent(&self, query: &IdentityQuery<'_>) -> Result<Option<Talent>, RepositoryError>;

    fn insert_applicant(&self, draft: ApplicantDraft) -> Result<Applicant, RepositoryError>;
    fn update_applicant(&self, applicant: Applicant) -> Result<(), RepositoryError>;
    fn fetch_applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    fn applicants_for_talent(
        &self,
        talent: TalentId,
        active_only: bool,
    ) -> Result<Vec<Applicant>, RepositoryError>;

    fn insert_education(
        &self,
        owner: RecordOwner,
        entry: EducationEntry,
    ) -> Result<Education, RepositoryError>;
    fn educations(&self, owner: RecordOwner) -> Result<Vec<Education>, RepositoryError>;

    fn insert_experience(
        &self,
        owner: RecordOwner,
        entry: ExperienceEntry,
    ) -> Result<Experience, RepositoryError>;
    fn experiences(&self, owner: RecordOwner) -> Result<Vec<Experience>, RepositoryError>;
    fn fetch_experience(&self, id: RecordId) -> Result<Option<Experience>, RepositoryError>;
    fn update_experience(&self, experience: Experience) -> Result<(), RepositoryError>;

    fn insert_skill(&self, owner: RecordOwner, entry: SkillEntry)
        -> Result<Skill, RepositoryError>;
    fn skills(&self, owner: RecordOwner) -> Result<Vec<Skill>, RepositoryError>;

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    fn fetch_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Details for provisioning a host platform account for a talent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalUserRequest {
    pub name: String,
    pub login: String,
    pub phone: Option<String>,
}

/// Account management supplied by the host platform (users, partners, password resets).
pub trait PortalAccounts: Send + Sync {
    fn create_portal_user(&self, request: PortalUserRequest) -> Result<PortalUser, AccountError>;
    fn request_password_reset(&self, user: UserId) -> Result<(), AccountError>;
    fn fetch_user(&self, user: UserId) -> Result<Option<PortalUser>, AccountError>;
    /// Whether an account already uses `login`, compared case-insensitively.
    fn login_taken(&self, login: &str) -> Result<bool, AccountError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("login '{0}' is already taken")]
    LoginTaken(String),
    #[error("user {0} does not exist")]
    UnknownUser(UserId),
    #[error("account service unavailable: {0}")]
    Unavailable(String),
}
