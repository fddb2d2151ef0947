use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::workflows::talentpool::domain::{
    EducationEntry, ExperienceEntry, JobId, RecordId, SkillEntry, SkillLevel, UnknownSkillLevel,
    WishList,
};
use crate::workflows::talentpool::self_service::ExperienceUpdate;

/// Validation failures in submitted portal forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field '{field}' is not a YYYY-MM-DD date: '{value}'")]
    InvalidDate { field: String, value: String },
    #[error(transparent)]
    InvalidSkillLevel(#[from] UnknownSkillLevel),
    #[error("'{0}' is not an experience identifier")]
    InvalidIdentifier(String),
}

fn text(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, FormError> {
    match text(value) {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FormError::InvalidDate {
                field: field.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplyForm {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl ApplyForm {
    /// Selected job; absent, non-numeric, and zero values count as no selection.
    pub fn job_id(&self) -> Option<JobId> {
        self.job_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|id| *id > 0)
            .map(JobId)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WishListForm {
    #[serde(default)]
    pub searching_for: Option<String>,
    #[serde(default)]
    pub not_wanted: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<WishListForm> for WishList {
    fn from(form: WishListForm) -> Self {
        WishList {
            searching_for: text(form.searching_for),
            not_wanted: text(form.not_wanted),
            notes: text(form.notes),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub institute: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl EducationForm {
    pub fn into_entry(self) -> Result<EducationEntry, FormError> {
        Ok(EducationEntry {
            name: text(self.name),
            institute: text(self.institute),
            start_date: date("start_date", self.start_date)?,
            end_date: date("end_date", self.end_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl ExperienceForm {
    pub fn into_entry(self) -> Result<ExperienceEntry, FormError> {
        Ok(ExperienceEntry {
            name: text(self.name),
            company: text(self.company),
            start_date: date("start_date", self.start_date)?,
            end_date: date("end_date", self.end_date)?,
            description: text(self.description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

impl SkillForm {
    pub fn into_entry(self) -> Result<SkillEntry, FormError> {
        let level = match text(self.level) {
            Some(raw) => Some(raw.parse::<SkillLevel>()?),
            None => None,
        };
        Ok(SkillEntry {
            name: text(self.name),
            level,
        })
    }
}

/// Bulk experience edit. Rows are listed in repeated `exp_ids` fields; each row's values
/// arrive as `name_<id>`, `company_<id>`, `start_<id>`, `end_<id>` and `desc_<id>`.
/// A listed row with an absent field clears that field on save.
#[derive(Debug, Default)]
pub struct ExperienceBulkForm {
    pub updates: Vec<ExperienceUpdate>,
}

impl ExperienceBulkForm {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, FormError> {
        let mut ids = Vec::new();
        let mut fields = HashMap::new();
        for (key, value) in pairs {
            if key == "exp_ids" {
                ids.push(value);
            } else {
                fields.insert(key, value);
            }
        }

        let mut seen = Vec::new();
        let mut updates = Vec::new();
        for raw in ids {
            let id = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| FormError::InvalidIdentifier(raw.clone()))?;
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);

            let mut take = |prefix: &str| fields.remove(&format!("{prefix}_{id}"));
            let entry = ExperienceEntry {
                name: text(take("name")),
                company: text(take("company")),
                start_date: date(&format!("start_{id}"), take("start"))?,
                end_date: date(&format!("end_{id}"), take("end"))?,
                description: text(take("desc")),
            };
            updates.push(ExperienceUpdate {
                id: RecordId(id),
                entry,
            });
        }

        Ok(Self { updates })
    }
}
