use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

record_id!(
    /// Identifier of a talent pool profile.
    TalentId,
    /// Identifier of a single job application.
    ApplicantId,
    /// Identifier of an education, experience, or skill row.
    RecordId,
    JobId,
    UserId,
    PartnerId,
    AttachmentId,
);

/// Days without a profile update before a talent is tagged inactive.
pub const INACTIVITY_THRESHOLD_DAYS: i64 = 365;

/// `true` when the last update lies strictly more than a year before `today`.
pub fn inactive_since(last_update: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_update {
        Some(last) => {
            today.signed_duration_since(last) > Duration::days(INACTIVITY_THRESHOLD_DAYS)
        }
        None => false,
    }
}

/// Reusable candidate profile, independent of any single job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talent {
    pub id: TalentId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_profile: Option<String>,
    pub cv_attachment_id: Option<AttachmentId>,
    pub attachment_ids: Vec<AttachmentId>,
    pub creation_date: Option<NaiveDate>,
    pub last_update_date: Option<NaiveDate>,
    pub searching_for: Option<String>,
    pub not_wanted: Option<String>,
    pub notes: Option<String>,
    pub marked_for_deletion: bool,
    pub deletion_reason: Option<String>,
    pub marked_by_user: Option<UserId>,
    pub portal_user_id: Option<UserId>,
}

impl Talent {
    pub fn inactive_tag(&self, today: NaiveDate) -> bool {
        inactive_since(self.last_update_date, today)
    }

    pub fn wish_list(&self) -> WishList {
        WishList {
            searching_for: self.searching_for.clone(),
            not_wanted: self.not_wanted.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Fields required to create a talent; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TalentDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_profile: Option<String>,
    pub cv_attachment_id: Option<AttachmentId>,
    pub attachment_ids: Vec<AttachmentId>,
    pub creation_date: Option<NaiveDate>,
    pub last_update_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub portal_user_id: Option<UserId>,
}

impl TalentDraft {
    pub fn into_talent(self, id: TalentId) -> Talent {
        Talent {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            linkedin_profile: self.linkedin_profile,
            cv_attachment_id: self.cv_attachment_id,
            attachment_ids: self.attachment_ids,
            creation_date: self.creation_date,
            last_update_date: self.last_update_date,
            searching_for: None,
            not_wanted: None,
            notes: self.notes,
            marked_for_deletion: false,
            deletion_reason: None,
            marked_by_user: None,
            portal_user_id: self.portal_user_id,
        }
    }
}

/// Free-text wishes a candidate maintains through the portal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WishList {
    pub searching_for: Option<String>,
    pub not_wanted: Option<String>,
    pub notes: Option<String>,
}

/// Job application record, optionally linked to a talent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub partner_name: Option<String>,
    pub email_from: Option<String>,
    pub phone: Option<String>,
    pub linkedin_profile: Option<String>,
    pub description: Option<String>,
    pub partner_id: Option<PartnerId>,
    pub job_id: Option<JobId>,
    pub talent_id: Option<TalentId>,
    pub attachment_ids: Vec<AttachmentId>,
    pub active: bool,
}

impl Applicant {
    /// Contact name when one was captured, otherwise the application subject.
    pub fn display_name(&self) -> &str {
        match self.partner_name.as_deref().map(str::trim) {
            Some(partner) if !partner.is_empty() => partner,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDraft {
    pub name: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub email_from: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub talent_id: Option<TalentId>,
    #[serde(default)]
    pub attachment_ids: Vec<AttachmentId>,
}

impl ApplicantDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partner_name: None,
            email_from: None,
            phone: None,
            linkedin_profile: None,
            description: None,
            partner_id: None,
            job_id: None,
            talent_id: None,
            attachment_ids: Vec::new(),
        }
    }

    pub fn into_applicant(self, id: ApplicantId) -> Applicant {
        Applicant {
            id,
            name: self.name,
            partner_name: self.partner_name,
            email_from: self.email_from,
            phone: self.phone,
            linkedin_profile: self.linkedin_profile,
            description: self.description,
            partner_id: self.partner_id,
            job_id: self.job_id,
            talent_id: self.talent_id,
            attachment_ids: self.attachment_ids,
            active: true,
        }
    }
}

/// Owner of a profile row. A row belongs to exactly one talent or one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOwner {
    Talent(TalentId),
    Applicant(ApplicantId),
}

/// Education, experience, and skill rows share one shape: an id, an owner, and the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord<T> {
    pub id: RecordId,
    pub owner: RecordOwner,
    #[serde(flatten)]
    pub entry: T,
}

pub type Education = ProfileRecord<EducationEntry>;
pub type Experience = ProfileRecord<ExperienceEntry>;
pub type Skill = ProfileRecord<SkillEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub name: Option<String>,
    pub institute: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub name: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: Option<String>,
    pub level: Option<SkillLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Expert,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill level '{0}'")]
pub struct UnknownSkillLevel(pub String);

impl FromStr for SkillLevel {
    type Err = UnknownSkillLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(UnknownSkillLevel(value.to_string())),
        }
    }
}

/// Job opening candidates can apply to from the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub website_published: bool,
}

/// Host platform account linked to a talent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: UserId,
    pub partner_id: PartnerId,
    pub login: String,
    pub name: String,
}

/// Notification severity shown to back-office users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub sticky: bool,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Success,
            sticky: false,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Warning,
            sticky: true,
        }
    }
}
