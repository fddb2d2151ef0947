use super::domain::{Applicant, RecordOwner, Talent, TalentId, UserId};

/// Portal caller resolved to their talent profile.
///
/// Every portal read and write asks the scope first; the store itself applies no row-level
/// permissions.
#[derive(Debug, Clone)]
pub struct PortalScope {
    user: UserId,
    talent: Option<Talent>,
}

impl PortalScope {
    pub fn new(user: UserId, talent: Option<Talent>) -> Self {
        Self { user, talent }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn talent(&self) -> Option<&Talent> {
        self.talent.as_ref()
    }

    /// Owner used for rows the caller creates or lists.
    pub fn owner(&self) -> Result<RecordOwner, AccessDenied> {
        self.talent
            .as_ref()
            .map(|talent| RecordOwner::Talent(talent.id))
            .ok_or(AccessDenied::NoTalent { user: self.user })
    }

    pub fn authorize(&self, owner: RecordOwner) -> Result<(), AccessDenied> {
        match (&self.talent, owner) {
            (None, _) => Err(AccessDenied::NoTalent { user: self.user }),
            (Some(talent), RecordOwner::Talent(id)) if talent.id == id => Ok(()),
            (Some(_), owner) => Err(AccessDenied::ForeignRecord { owner }),
        }
    }

    pub fn authorize_applicant(&self, applicant: &Applicant) -> Result<(), AccessDenied> {
        match (&self.talent, applicant.talent_id) {
            (None, _) => Err(AccessDenied::NoTalent { user: self.user }),
            (Some(talent), Some(linked)) if talent.id == linked => Ok(()),
            (Some(_), _) => Err(AccessDenied::ForeignRecord {
                owner: RecordOwner::Applicant(applicant.id),
            }),
        }
    }

    pub fn talent_id(&self) -> Option<TalentId> {
        self.talent.as_ref().map(|talent| talent.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("user {user} has no talent profile")]
    NoTalent { user: UserId },
    #[error("record owned by {owner:?} belongs to another talent")]
    ForeignRecord { owner: RecordOwner },
}
