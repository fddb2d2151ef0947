use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Applicant, ApplicantId, Notification, TalentDraft, TalentId};
use super::repository::IdentityQuery;

/// Decides which applicant fields identify an existing talent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingRule {
    pub match_linkedin: bool,
}

impl Default for MatchingRule {
    fn default() -> Self {
        Self {
            match_linkedin: true,
        }
    }
}

impl MatchingRule {
    pub fn query_for<'a>(&self, applicant: &'a Applicant) -> IdentityQuery<'a> {
        IdentityQuery {
            email: applicant.email_from.as_deref(),
            linkedin_profile: if self.match_linkedin {
                applicant.linkedin_profile.as_deref()
            } else {
                None
            },
        }
    }
}

/// Talent created for an applicant, shared by single and bulk conversion.
///
/// Returns `None` when the applicant has no usable email address, since a talent requires one.
/// Attachments are shared by reference; the first one doubles as the CV.
pub fn talent_draft_from_applicant(applicant: &Applicant, today: NaiveDate) -> Option<TalentDraft> {
    let email = applicant
        .email_from
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())?;

    Some(TalentDraft {
        name: applicant.display_name().to_string(),
        email: email.to_string(),
        phone: applicant.phone.clone(),
        linkedin_profile: applicant.linkedin_profile.clone(),
        cv_attachment_id: applicant.attachment_ids.first().copied(),
        attachment_ids: applicant.attachment_ids.clone(),
        creation_date: Some(today),
        last_update_date: Some(today),
        notes: applicant.description.clone(),
        portal_user_id: None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Warns about matching talents without linking them.
    Single,
    /// Links applicants to matching talents.
    Bulk,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Created {
        talent_id: TalentId,
    },
    LinkedExisting {
        talent_id: TalentId,
    },
    ExistingTalent {
        talent_id: TalentId,
        talent_name: String,
    },
    AlreadyLinked {
        talent_id: TalentId,
    },
    MissingEmail,
}

impl ConversionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ConversionOutcome::Created { .. })
    }

    pub fn talent_id(&self) -> Option<TalentId> {
        match self {
            ConversionOutcome::Created { talent_id }
            | ConversionOutcome::LinkedExisting { talent_id }
            | ConversionOutcome::ExistingTalent { talent_id, .. }
            | ConversionOutcome::AlreadyLinked { talent_id } => Some(*talent_id),
            ConversionOutcome::MissingEmail => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionEntry {
    pub applicant_id: ApplicantId,
    pub applicant_name: String,
    #[serde(flatten)]
    pub outcome: ConversionOutcome,
}

impl ConversionEntry {
    fn warning(&self) -> Option<(&'static str, String)> {
        match &self.outcome {
            ConversionOutcome::Created { .. } | ConversionOutcome::LinkedExisting { .. } => None,
            ConversionOutcome::AlreadyLinked { .. } => Some((
                "Talent already linked",
                format!(
                    "Applicant '{}' is already linked to a talent profile.",
                    self.applicant_name
                ),
            )),
            ConversionOutcome::ExistingTalent { talent_name, .. } => Some((
                "Talent already exists",
                format!("Talent '{talent_name}' already exists in the talent pool."),
            )),
            ConversionOutcome::MissingEmail => Some((
                "Email address missing",
                format!(
                    "Applicant '{}' has no email address; no talent was created.",
                    self.applicant_name
                ),
            )),
        }
    }
}

/// Aggregated result of converting a selection of applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub mode: ConversionMode,
    pub entries: Vec<ConversionEntry>,
}

impl ConversionSummary {
    pub fn created(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_created())
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries.len() - self.created()
    }

    pub fn notification(&self) -> Notification {
        let created = self.created();
        if self.mode == ConversionMode::Bulk {
            return Notification::success(
                "Bulk conversion completed",
                format!("{created} talents created, {} skipped.", self.skipped()),
            );
        }

        let warnings: Vec<(&'static str, String)> =
            self.entries.iter().filter_map(ConversionEntry::warning).collect();

        match (self.entries.as_slice(), warnings.as_slice()) {
            ([entry], []) => Notification::success(
                "Talent created",
                format!(
                    "Applicant '{}' was converted to a talent.",
                    entry.applicant_name
                ),
            ),
            (_, []) => Notification::success(
                "Talents created",
                format!("{created} applicants were converted to talents."),
            ),
            ([_], [(title, message)]) => Notification::warning(*title, message.clone()),
            (_, warnings) => {
                let details: Vec<&str> = warnings
                    .iter()
                    .map(|(_, message)| message.as_str())
                    .collect();
                Notification::warning(
                    "Conversion completed with warnings",
                    format!("{created} talents created. {}", details.join(" ")),
                )
            }
        }
    }
}

/// Number of profile rows duplicated onto an applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CopiedRecords {
    pub educations: usize,
    pub experiences: usize,
    pub skills: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReapplyEntry {
    pub talent_id: TalentId,
    pub applicant_id: ApplicantId,
    pub copied: CopiedRecords,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReapplySummary {
    pub entries: Vec<ReapplyEntry>,
}

impl ReapplySummary {
    pub fn applicant_ids(&self) -> Vec<ApplicantId> {
        self.entries.iter().map(|entry| entry.applicant_id).collect()
    }

    pub fn notification(&self) -> Notification {
        Notification::success(
            "Reapplication created",
            format!("{} new applications created from the talent pool.", self.entries.len()),
        )
    }
}
