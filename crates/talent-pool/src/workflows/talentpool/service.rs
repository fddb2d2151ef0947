use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::conversion::{
    talent_draft_from_applicant, ConversionEntry, ConversionMode, ConversionOutcome,
    ConversionSummary, CopiedRecords, MatchingRule, ReapplyEntry, ReapplySummary,
};
use super::domain::{
    Applicant, ApplicantDraft, ApplicantId, Education, Experience, PortalUser, RecordOwner, Skill,
    Talent, TalentId, UserId,
};
use super::repository::{
    AccountError, PortalAccounts, PortalUserRequest, RepositoryError, TalentRepository,
};

/// Back-office and portal operations over the talent pool.
pub struct TalentPoolService<R, P> {
    pub(super) repository: Arc<R>,
    pub(super) accounts: Arc<P>,
    clock: Arc<dyn Clock>,
    matching: MatchingRule,
}

/// Talent with its derived inactivity tag, profile rows, and application history.
#[derive(Debug, Clone, Serialize)]
pub struct TalentOverview {
    #[serde(flatten)]
    pub talent: Talent,
    pub inactive_tag: bool,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub applications: Vec<Applicant>,
}

impl<R, P> TalentPoolService<R, P>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    pub fn new(repository: Arc<R>, accounts: Arc<P>) -> Self {
        Self::with_clock(repository, accounts, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<R>, accounts: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            accounts,
            clock,
            matching: MatchingRule::default(),
        }
    }

    pub fn with_matching(mut self, matching: MatchingRule) -> Self {
        self.matching = matching;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Convert each selected applicant into a talent, warning instead of linking when a
    /// matching talent already exists.
    pub fn convert_to_talent(
        &self,
        applicant_ids: &[ApplicantId],
    ) -> Result<ConversionSummary, TalentPoolError> {
        self.convert(applicant_ids, ConversionMode::Single)
    }

    /// Convert each selected applicant, linking to a matching talent when one exists.
    pub fn bulk_convert_to_talent(
        &self,
        applicant_ids: &[ApplicantId],
    ) -> Result<ConversionSummary, TalentPoolError> {
        self.convert(applicant_ids, ConversionMode::Bulk)
    }

    fn convert(
        &self,
        applicant_ids: &[ApplicantId],
        mode: ConversionMode,
    ) -> Result<ConversionSummary, TalentPoolError> {
        let applicants = self.load_applicants(applicant_ids)?;
        let today = self.clock.today();
        let mut entries = Vec::with_capacity(applicants.len());

        for mut applicant in applicants {
            let outcome = self.link_or_create(&mut applicant, mode, today)?;
            entries.push(ConversionEntry {
                applicant_id: applicant.id,
                applicant_name: applicant.display_name().to_string(),
                outcome,
            });
        }

        let summary = ConversionSummary { mode, entries };
        info!(
            ?mode,
            created = summary.created(),
            skipped = summary.skipped(),
            "applicant conversion finished"
        );
        Ok(summary)
    }

    fn link_or_create(
        &self,
        applicant: &mut Applicant,
        mode: ConversionMode,
        today: NaiveDate,
    ) -> Result<ConversionOutcome, TalentPoolError> {
        if let Some(talent_id) = applicant.talent_id {
            return Ok(ConversionOutcome::AlreadyLinked { talent_id });
        }

        let query = self.matching.query_for(applicant);
        if let Some(existing) = self.repository.find_talent(&query)? {
            return match mode {
                ConversionMode::Single => Ok(ConversionOutcome::ExistingTalent {
                    talent_id: existing.id,
                    talent_name: existing.name,
                }),
                ConversionMode::Bulk => {
                    applicant.talent_id = Some(existing.id);
                    self.repository.update_applicant(applicant.clone())?;
                    Ok(ConversionOutcome::LinkedExisting {
                        talent_id: existing.id,
                    })
                }
            };
        }

        let Some(draft) = talent_draft_from_applicant(applicant, today) else {
            warn!(applicant_id = %applicant.id, "applicant has no email address, talent not created");
            return Ok(ConversionOutcome::MissingEmail);
        };

        let talent = self.repository.insert_talent(draft)?;
        applicant.talent_id = Some(talent.id);
        self.repository.update_applicant(applicant.clone())?;
        info!(applicant_id = %applicant.id, talent_id = %talent.id, "talent created from applicant");

        Ok(ConversionOutcome::Created {
            talent_id: talent.id,
        })
    }

    /// Duplicate every education, experience, and skill row of the talent onto the applicant.
    pub fn copy_talent_data_to_applicant(
        &self,
        applicant_id: ApplicantId,
        talent_id: TalentId,
    ) -> Result<CopiedRecords, TalentPoolError> {
        self.repository
            .fetch_applicant(applicant_id)?
            .ok_or(TalentPoolError::ApplicantNotFound(applicant_id))?;
        self.repository
            .fetch_talent(talent_id)?
            .ok_or(TalentPoolError::TalentNotFound(talent_id))?;

        let source = RecordOwner::Talent(talent_id);
        let target = RecordOwner::Applicant(applicant_id);
        let mut copied = CopiedRecords::default();

        for education in self.repository.educations(source)? {
            self.repository.insert_education(target, education.entry)?;
            copied.educations += 1;
        }
        for experience in self.repository.experiences(source)? {
            self.repository.insert_experience(target, experience.entry)?;
            copied.experiences += 1;
        }
        for skill in self.repository.skills(source)? {
            self.repository.insert_skill(target, skill.entry)?;
            copied.skills += 1;
        }

        Ok(copied)
    }

    /// Open a new application for each talent, owned by the talent's portal partner.
    pub fn reapply(&self, talent_ids: &[TalentId]) -> Result<ReapplySummary, TalentPoolError> {
        let talents = self.load_talents(talent_ids)?;
        let mut summary = ReapplySummary::default();

        for talent in talents {
            let partner_id = match talent.portal_user_id {
                Some(user) => self.accounts.fetch_user(user)?.map(|user| user.partner_id),
                None => None,
            };

            let applicant = self.repository.insert_applicant(ApplicantDraft {
                partner_name: Some(talent.name.clone()),
                email_from: Some(talent.email.clone()),
                phone: talent.phone.clone(),
                linkedin_profile: talent.linkedin_profile.clone(),
                partner_id,
                talent_id: Some(talent.id),
                ..ApplicantDraft::named(talent.name.clone())
            })?;
            let copied = self.copy_talent_data_to_applicant(applicant.id, talent.id)?;
            info!(talent_id = %talent.id, applicant_id = %applicant.id, "talent reapplied");

            summary.entries.push(ReapplyEntry {
                talent_id: talent.id,
                applicant_id: applicant.id,
                copied,
            });
        }

        Ok(summary)
    }

    /// Provision a portal account for each talent. Nothing is created if any talent already
    /// has one, or if a login would collide with an existing account or another selected talent.
    pub fn create_portal_user(
        &self,
        talent_ids: &[TalentId],
    ) -> Result<Vec<PortalUser>, TalentPoolError> {
        let talents = self.load_talents(talent_ids)?;
        if let Some(talent) = talents.iter().find(|talent| talent.portal_user_id.is_some()) {
            return Err(TalentPoolError::PortalUserExists {
                talent_id: talent.id,
                name: talent.name.clone(),
            });
        }

        let mut logins = HashSet::with_capacity(talents.len());
        for talent in &talents {
            let login = talent.email.trim().to_lowercase();
            if self.accounts.login_taken(&login)? || !logins.insert(login.clone()) {
                return Err(TalentPoolError::LoginTaken {
                    talent_id: talent.id,
                    login,
                });
            }
        }

        let mut users = Vec::with_capacity(talents.len());
        for mut talent in talents {
            let request = PortalUserRequest {
                name: talent.name.clone(),
                login: talent.email.clone(),
                phone: talent.phone.clone(),
            };
            let user = self
                .accounts
                .create_portal_user(request)
                .map_err(|err| match err {
                    AccountError::LoginTaken(login) => TalentPoolError::LoginTaken {
                        talent_id: talent.id,
                        login,
                    },
                    other => TalentPoolError::Accounts(other),
                })?;
            talent.portal_user_id = Some(user.id);
            self.repository.update_talent(talent)?;
            users.push(user);
        }

        Ok(users)
    }

    /// Request a password reset for each talent's portal account.
    pub fn reset_portal_user(&self, talent_ids: &[TalentId]) -> Result<Vec<UserId>, TalentPoolError> {
        let talents = self.load_talents(talent_ids)?;
        let mut users = Vec::with_capacity(talents.len());
        for talent in &talents {
            match talent.portal_user_id {
                Some(user) => users.push(user),
                None => {
                    return Err(TalentPoolError::NoPortalUser {
                        talent_id: talent.id,
                        name: talent.name.clone(),
                    })
                }
            }
        }

        for user in &users {
            self.accounts.request_password_reset(*user)?;
        }
        Ok(users)
    }

    pub fn open_linkedin(&self, talent_id: TalentId) -> Result<String, TalentPoolError> {
        let talent = self.fetch_talent(talent_id)?;
        match talent.linkedin_profile.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(TalentPoolError::NoLinkedInProfile {
                talent_id,
                name: talent.name,
            }),
        }
    }

    /// Flag a talent for deletion. The flag is advisory; nothing purges flagged talents.
    pub fn mark_for_deletion(
        &self,
        talent_id: TalentId,
        reason: Option<String>,
        marked_by: Option<UserId>,
    ) -> Result<Talent, TalentPoolError> {
        let mut talent = self.fetch_talent(talent_id)?;
        talent.marked_for_deletion = true;
        talent.deletion_reason = reason;
        talent.marked_by_user = marked_by;
        self.repository.update_talent(talent.clone())?;
        info!(talent_id = %talent.id, "talent marked for deletion");
        Ok(talent)
    }

    pub fn talent_overview(&self, talent_id: TalentId) -> Result<TalentOverview, TalentPoolError> {
        let talent = self.fetch_talent(talent_id)?;
        self.overview_of(talent)
    }

    pub(super) fn overview_of(&self, talent: Talent) -> Result<TalentOverview, TalentPoolError> {
        let owner = RecordOwner::Talent(talent.id);
        Ok(TalentOverview {
            inactive_tag: talent.inactive_tag(self.clock.today()),
            educations: self.repository.educations(owner)?,
            experiences: self.repository.experiences(owner)?,
            skills: self.repository.skills(owner)?,
            applications: self.repository.applicants_for_talent(talent.id, true)?,
            talent,
        })
    }

    fn fetch_talent(&self, talent_id: TalentId) -> Result<Talent, TalentPoolError> {
        self.repository
            .fetch_talent(talent_id)?
            .ok_or(TalentPoolError::TalentNotFound(talent_id))
    }

    fn load_talents(&self, talent_ids: &[TalentId]) -> Result<Vec<Talent>, TalentPoolError> {
        let mut seen = HashSet::new();
        talent_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|id| self.fetch_talent(*id))
            .collect()
    }

    fn load_applicants(
        &self,
        applicant_ids: &[ApplicantId],
    ) -> Result<Vec<Applicant>, TalentPoolError> {
        let mut seen = HashSet::new();
        applicant_ids
            .iter()
            .filter(|id| seen.insert(**id))
            .map(|id| {
                self.repository
                    .fetch_applicant(*id)?
                    .ok_or(TalentPoolError::ApplicantNotFound(*id))
            })
            .collect()
    }
}

/// Error raised by the talent pool service.
#[derive(Debug, thiserror::Error)]
pub enum TalentPoolError {
    #[error("talent {0} not found")]
    TalentNotFound(TalentId),
    #[error("applicant {0} not found")]
    ApplicantNotFound(ApplicantId),
    #[error("talent '{name}' already has a portal user")]
    PortalUserExists { talent_id: TalentId, name: String },
    #[error("talent '{name}' has no linked portal user")]
    NoPortalUser { talent_id: TalentId, name: String },
    #[error("login '{login}' of talent {talent_id} is already taken")]
    LoginTaken { talent_id: TalentId, login: String },
    #[error("talent '{name}' has no LinkedIn profile")]
    NoLinkedInProfile { talent_id: TalentId, name: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Accounts(#[from] AccountError),
}

impl TalentPoolError {
    /// Errors a back-office user can correct, as opposed to lookup or storage failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TalentPoolError::PortalUserExists { .. }
                | TalentPoolError::NoPortalUser { .. }
                | TalentPoolError::LoginTaken { .. }
                | TalentPoolError::NoLinkedInProfile { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TalentPoolError::TalentNotFound(_)
                | TalentPoolError::ApplicantNotFound(_)
                | TalentPoolError::Repository(RepositoryError::NotFound)
        )
    }
}
