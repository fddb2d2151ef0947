//! Talent pool: applicants converted into reusable talent profiles, a candidate
//! self-service portal, and the copy routines linking the two.

pub mod access;
pub mod clock;
pub mod conversion;
pub mod domain;
pub mod import;
pub mod memory;
pub mod portal;
pub mod repository;
pub mod self_service;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{AccessDenied, PortalScope};
pub use clock::{Clock, FixedClock, SystemClock};
pub use conversion::{
    ConversionEntry, ConversionMode, ConversionOutcome, ConversionSummary, CopiedRecords,
    MatchingRule, ReapplyEntry, ReapplySummary,
};
pub use domain::{
    Applicant, ApplicantDraft, ApplicantId, AttachmentId, Education, EducationEntry, Experience,
    ExperienceEntry, Job, JobId, Notification, NotificationKind, PartnerId, PortalUser,
    ProfileRecord, RecordId, RecordOwner, Skill, SkillEntry, SkillLevel, Talent, TalentDraft,
    TalentId, UserId, WishList,
};
pub use import::{applicants_from_path, parse_applicants, ApplicantImportError};
pub use memory::{InMemoryPortalAccounts, InMemoryTalentStore};
pub use portal::{portal_router, PortalError, PortalSession};
pub use repository::{
    AccountError, IdentityQuery, PortalAccounts, PortalUserRequest, RepositoryError,
    TalentRepository,
};
pub use self_service::{
    ApplyOutcome, ApplyRejection, ExperienceUpdate, ExperienceUpdateReport,
};
pub use service::{TalentOverview, TalentPoolError, TalentPoolService};
