use serde::Serialize;
use tracing::{error, info, warn};

use super::access::PortalScope;
use super::conversion::CopiedRecords;
use super::domain::{
    Applicant, ApplicantDraft, Education, EducationEntry, Experience, ExperienceEntry, Job, JobId,
    RecordId, Skill, SkillEntry, Talent, UserId, WishList,
};
use super::repository::{PortalAccounts, TalentRepository};
use super::service::{TalentOverview, TalentPoolError};
use super::TalentPoolService;

/// Result of a portal application submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Rejected(ApplyRejection),
    /// The application exists; copying the profile rows may still have failed.
    Submitted {
        applicant: Applicant,
        copied: Result<CopiedRecords, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyRejection {
    NoTalent,
    MissingJob,
    UnknownJob(JobId),
}

/// Submitted values for one experience row in the bulk edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceUpdate {
    pub id: RecordId,
    pub entry: ExperienceEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExperienceUpdateReport {
    pub updated: Vec<RecordId>,
    pub rejected: Vec<RecordId>,
}

impl<R, P> TalentPoolService<R, P>
where
    R: TalentRepository + 'static,
    P: PortalAccounts + 'static,
{
    pub fn portal_scope(&self, user: UserId) -> Result<PortalScope, TalentPoolError> {
        let talent = self.repository.talent_for_portal_user(user)?;
        Ok(PortalScope::new(user, talent))
    }

    pub fn portal_applications(
        &self,
        scope: &PortalScope,
    ) -> Result<Vec<Applicant>, TalentPoolError> {
        let Some(talent_id) = scope.talent_id() else {
            return Ok(Vec::new());
        };
        let applications: Vec<Applicant> = self
            .repository
            .applicants_for_talent(talent_id, true)?
            .into_iter()
            .filter(|applicant| scope.authorize_applicant(applicant).is_ok())
            .collect();
        info!(user = %scope.user(), count = applications.len(), "portal applications loaded");
        Ok(applications)
    }

    pub fn published_jobs(&self) -> Result<Vec<Job>, TalentPoolError> {
        Ok(self.repository.published_jobs()?)
    }

    pub fn portal_profile(
        &self,
        scope: &PortalScope,
    ) -> Result<Option<TalentOverview>, TalentPoolError> {
        match scope.talent() {
            Some(talent) => self.overview_of(talent.clone()).map(Some),
            None => Ok(None),
        }
    }

    pub fn portal_educations(&self, scope: &PortalScope) -> Result<Vec<Education>, TalentPoolError> {
        match scope.owner() {
            Ok(owner) => Ok(self.repository.educations(owner)?),
            Err(_) => Ok(Vec::new()),
        }
    }

    pub fn portal_experiences(
        &self,
        scope: &PortalScope,
    ) -> Result<Vec<Experience>, TalentPoolError> {
        match scope.owner() {
            Ok(owner) => Ok(self.repository.experiences(owner)?),
            Err(_) => Ok(Vec::new()),
        }
    }

    pub fn portal_skills(&self, scope: &PortalScope) -> Result<Vec<Skill>, TalentPoolError> {
        match scope.owner() {
            Ok(owner) => Ok(self.repository.skills(owner)?),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Create an application for a published job on behalf of the caller.
    ///
    /// A failure while copying the profile rows is logged and reported in the outcome; the
    /// application itself stays submitted.
    pub fn submit_application(
        &self,
        scope: &PortalScope,
        job_id: Option<JobId>,
    ) -> Result<ApplyOutcome, TalentPoolError> {
        let Some(talent) = scope.talent() else {
            warn!(user = %scope.user(), "application rejected: no talent profile");
            return Ok(ApplyOutcome::Rejected(ApplyRejection::NoTalent));
        };
        let Some(job_id) = job_id else {
            warn!(user = %scope.user(), "application rejected: no job selected");
            return Ok(ApplyOutcome::Rejected(ApplyRejection::MissingJob));
        };
        match self.repository.fetch_job(job_id)? {
            Some(job) if job.website_published => {}
            _ => {
                warn!(user = %scope.user(), %job_id, "application rejected: job not open");
                return Ok(ApplyOutcome::Rejected(ApplyRejection::UnknownJob(job_id)));
            }
        }

        let partner_id = self
            .accounts
            .fetch_user(scope.user())?
            .map(|user| user.partner_id);
        let applicant = self.repository.insert_applicant(ApplicantDraft {
            partner_name: Some(talent.name.clone()),
            email_from: Some(talent.email.clone()),
            phone: talent.phone.clone(),
            linkedin_profile: talent.linkedin_profile.clone(),
            partner_id,
            job_id: Some(job_id),
            talent_id: Some(talent.id),
            ..ApplicantDraft::named(talent.name.clone())
        })?;
        info!(applicant_id = %applicant.id, %job_id, "portal application created");

        let copied = match self.copy_talent_data_to_applicant(applicant.id, talent.id) {
            Ok(copied) => {
                info!(applicant_id = %applicant.id, ?copied, "talent data copied to applicant");
                Ok(copied)
            }
            Err(err) => {
                error!(applicant_id = %applicant.id, error = %err, "copying talent data failed");
                Err(err.to_string())
            }
        };

        Ok(ApplyOutcome::Submitted { applicant, copied })
    }

    /// Replace the caller's wish list and stamp the profile as updated today.
    pub fn update_wish_list(
        &self,
        scope: &PortalScope,
        wishes: WishList,
    ) -> Result<Option<Talent>, TalentPoolError> {
        let Some(talent) = scope.talent() else {
            info!(user = %scope.user(), "wish list not updated: no talent profile");
            return Ok(None);
        };

        let mut talent = talent.clone();
        talent.searching_for = wishes.searching_for;
        talent.not_wanted = wishes.not_wanted;
        talent.notes = wishes.notes;
        talent.last_update_date = Some(self.today());
        self.repository.update_talent(talent.clone())?;
        Ok(Some(talent))
    }

    pub fn add_education(
        &self,
        scope: &PortalScope,
        entry: EducationEntry,
    ) -> Result<Option<Education>, TalentPoolError> {
        let Ok(owner) = scope.owner() else {
            info!(user = %scope.user(), "education not added: no talent profile");
            return Ok(None);
        };
        Ok(Some(self.repository.insert_education(owner, entry)?))
    }

    pub fn add_experience(
        &self,
        scope: &PortalScope,
        entry: ExperienceEntry,
    ) -> Result<Option<Experience>, TalentPoolError> {
        let Ok(owner) = scope.owner() else {
            info!(user = %scope.user(), "experience not added: no talent profile");
            return Ok(None);
        };
        Ok(Some(self.repository.insert_experience(owner, entry)?))
    }

    pub fn add_skill(
        &self,
        scope: &PortalScope,
        entry: SkillEntry,
    ) -> Result<Option<Skill>, TalentPoolError> {
        let Ok(owner) = scope.owner() else {
            info!(user = %scope.user(), "skill not added: no talent profile");
            return Ok(None);
        };
        Ok(Some(self.repository.insert_skill(owner, entry)?))
    }

    /// Write each submitted experience row the caller owns; other identifiers are dropped.
    pub fn update_experiences(
        &self,
        scope: &PortalScope,
        updates: Vec<ExperienceUpdate>,
    ) -> Result<ExperienceUpdateReport, TalentPoolError> {
        let mut report = ExperienceUpdateReport::default();

        for update in updates {
            let Some(mut experience) = self.repository.fetch_experience(update.id)? else {
                warn!(experience_id = %update.id, "experience update dropped: unknown row");
                report.rejected.push(update.id);
                continue;
            };
            if let Err(denied) = scope.authorize(experience.owner) {
                warn!(
                    user = %scope.user(),
                    experience_id = %update.id,
                    reason = %denied,
                    "experience update dropped"
                );
                report.rejected.push(update.id);
                continue;
            }

            experience.entry = update.entry;
            self.repository.update_experience(experience)?;
            report.updated.push(update.id);
        }

        Ok(report)
    }
}
