//! Page contexts handed to the host platform's templates.

use serde::{Serialize, Serializer};

use crate::workflows::talentpool::domain::{
    Applicant, Education, Experience, Job, Skill, SkillLevel,
};
use crate::workflows::talentpool::service::TalentOverview;

pub mod templates {
    pub const APPLICATIONS: &str = "talent_pool.portal_my_applications";
    pub const APPLY: &str = "talent_pool.portal_apply_job";
    pub const TALENT: &str = "talent_pool.portal_my_talent";
    pub const EDUCATIONS: &str = "talent_pool.portal_my_education";
    pub const EXPERIENCES: &str = "talent_pool.portal_my_experience";
    pub const SKILLS: &str = "talent_pool.portal_my_skills";
    pub const ADD_EDUCATION: &str = "talent_pool.portal_add_education";
    pub const ADD_EXPERIENCE: &str = "talent_pool.portal_add_experience";
    pub const ADD_SKILL: &str = "talent_pool.portal_add_skill";
    pub const EDIT_EXPERIENCE: &str = "talent_pool.portal_edit_experience";
}

#[derive(Debug, Serialize)]
pub struct PortalPage<T> {
    pub template: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(flatten)]
    pub context: T,
}

impl<T: Serialize> PortalPage<T> {
    pub fn new(template: &'static str, context: T) -> Self {
        Self {
            template,
            csrf_token: None,
            context,
        }
    }

    pub fn with_csrf(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}

/// Templates test the talent with a plain truthiness check, so a missing one renders `false`.
fn talent_or_false<S, T>(talent: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match talent {
        Some(talent) => talent.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationsContext {
    pub applications: Vec<Applicant>,
}

#[derive(Debug, Serialize)]
pub struct ApplyContext {
    pub jobs: Vec<Job>,
    pub has_talent: bool,
}

#[derive(Debug, Serialize)]
pub struct TalentContext {
    #[serde(serialize_with = "talent_or_false")]
    pub talent: Option<TalentOverview>,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub applications: Vec<Applicant>,
}

impl TalentContext {
    pub fn from_overview(overview: Option<TalentOverview>) -> Self {
        match overview {
            Some(overview) => Self {
                educations: overview.educations.clone(),
                experiences: overview.experiences.clone(),
                skills: overview.skills.clone(),
                applications: overview.applications.clone(),
                talent: Some(overview),
            },
            None => Self {
                talent: None,
                educations: Vec::new(),
                experiences: Vec::new(),
                skills: Vec::new(),
                applications: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EducationsContext {
    pub educations: Vec<Education>,
}

#[derive(Debug, Serialize)]
pub struct ExperiencesContext {
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Serialize)]
pub struct SkillsContext {
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct AddFormContext {}

#[derive(Debug, Serialize)]
pub struct AddSkillContext {
    pub levels: Vec<SkillLevelOption>,
}

#[derive(Debug, Serialize)]
pub struct SkillLevelOption {
    pub value: SkillLevel,
    pub label: &'static str,
}

impl AddSkillContext {
    pub fn new() -> Self {
        Self {
            levels: SkillLevel::ALL
                .iter()
                .map(|level| SkillLevelOption {
                    value: *level,
                    label: level.label(),
                })
                .collect(),
        }
    }
}

impl Default for AddSkillContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_talent_serializes_as_false() {
        let page = PortalPage::new(templates::TALENT, TalentContext::from_overview(None));
        let value = serde_json::to_value(&page).expect("serializable page");

        assert_eq!(value["template"], templates::TALENT);
        assert_eq!(value["talent"], serde_json::Value::Bool(false));
        assert_eq!(value["educations"], serde_json::json!([]));
        assert!(value.get("csrf_token").is_none());
    }

    #[test]
    fn skill_form_lists_every_level() {
        let page = PortalPage::new(templates::ADD_SKILL, AddSkillContext::new()).with_csrf("t");
        let value = serde_json::to_value(&page).expect("serializable page");

        assert_eq!(value["csrf_token"], "t");
        assert_eq!(
            value["levels"].as_array().map(Vec::len),
            Some(SkillLevel::ALL.len())
        );
    }
}
