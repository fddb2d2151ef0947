use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::ApplicantDraft;

#[derive(Debug)]
pub enum ApplicantImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingName { row: usize },
}

impl std::fmt::Display for ApplicantImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicantImportError::Io(err) => write!(f, "failed to read applicant export: {}", err),
            ApplicantImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
            ApplicantImportError::MissingName { row } => {
                write!(f, "applicant row {} has no name", row)
            }
        }
    }
}

impl std::error::Error for ApplicantImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicantImportError::Io(err) => Some(err),
            ApplicantImportError::Csv(err) => Some(err),
            ApplicantImportError::MissingName { .. } => None,
        }
    }
}

impl From<std::io::Error> for ApplicantImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ApplicantImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    partner_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    linkedin_profile: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Applicant export with a header row. Rows are numbered from 1, excluding the header.
pub fn parse_applicants<R: Read>(reader: R) -> Result<Vec<ApplicantDraft>, ApplicantImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut drafts = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let row = record?;
        let name = row
            .name
            .or_else(|| row.partner_name.clone())
            .ok_or(ApplicantImportError::MissingName { row: index + 1 })?;

        drafts.push(ApplicantDraft {
            partner_name: row.partner_name,
            email_from: row.email,
            phone: row.phone,
            linkedin_profile: row.linkedin_profile,
            description: row.description,
            ..ApplicantDraft::named(name)
        });
    }

    Ok(drafts)
}

pub fn applicants_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ApplicantDraft>, ApplicantImportError> {
    let file = std::fs::File::open(path)?;
    parse_applicants(file)
}
