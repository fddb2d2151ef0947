use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use talent_pool::config::AppConfig;
use talent_pool::error::AppError;
use talent_pool::workflows::talentpool::{
    applicants_from_path, ConversionOutcome, ConversionSummary, FixedClock,
    InMemoryPortalAccounts, InMemoryTalentStore, MatchingRule, TalentPoolService,
    TalentRepository,
};

#[derive(Args, Debug)]
pub(crate) struct ConvertArgs {
    /// Applicant CSV export (name, partner_name, email, phone, linkedin_profile, description)
    #[arg(long)]
    pub(crate) applicants_csv: PathBuf,
    /// Link applicants to matching talents instead of only reporting them
    #[arg(long)]
    pub(crate) bulk: bool,
    /// Match on email only, ignoring LinkedIn URLs
    #[arg(long)]
    pub(crate) email_only: bool,
    /// Creation date stamped on new talents (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the conversion summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_convert(args: ConvertArgs) -> Result<(), AppError> {
    let ConvertArgs {
        applicants_csv,
        bulk,
        email_only,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    let matching = if email_only {
        MatchingRule {
            match_linkedin: false,
        }
    } else {
        config.talent_pool.matching_rule()
    };
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let store = Arc::new(InMemoryTalentStore::default());
    let mut applicant_ids = Vec::new();
    for draft in applicants_from_path(&applicants_csv)? {
        applicant_ids.push(store.insert_applicant(draft)?.id);
    }

    let service = TalentPoolService::with_clock(
        store.clone(),
        Arc::new(InMemoryPortalAccounts::default()),
        Arc::new(FixedClock(today)),
    )
    .with_matching(matching);
    let summary = if bulk {
        service.bulk_convert_to_talent(&applicant_ids)?
    } else {
        service.convert_to_talent(&applicant_ids)?
    };

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Conversion summary unavailable: {err}"),
        }
        return Ok(());
    }

    render_summary(&summary, applicants_csv.display().to_string(), store.talent_count());
    Ok(())
}

fn render_summary(summary: &ConversionSummary, source: String, talents: usize) {
    let notification = summary.notification();
    println!("Talent pool conversion ({:?} mode)", summary.mode);
    println!("Source: {source}");
    println!("{}: {}", notification.title, notification.message);
    println!(
        "- {} applicants processed | {} talents created | {} skipped | {} talents in pool",
        summary.entries.len(),
        summary.created(),
        summary.skipped(),
        talents
    );

    println!("\nApplicants");
    for entry in &summary.entries {
        println!(
            "  #{:<4} {:<28} {}",
            entry.applicant_id,
            entry.applicant_name,
            outcome_label(&entry.outcome)
        );
    }
}

fn outcome_label(outcome: &ConversionOutcome) -> String {
    match outcome {
        ConversionOutcome::Created { talent_id } => format!("created talent #{talent_id}"),
        ConversionOutcome::LinkedExisting { talent_id } => {
            format!("linked to existing talent #{talent_id}")
        }
        ConversionOutcome::ExistingTalent {
            talent_id,
            talent_name,
        } => format!("matches talent #{talent_id} ({talent_name}); not linked"),
        ConversionOutcome::AlreadyLinked { talent_id } => {
            format!("already linked to talent #{talent_id}")
        }
        ConversionOutcome::MissingEmail => "skipped: no email address".to_string(),
    }
}
