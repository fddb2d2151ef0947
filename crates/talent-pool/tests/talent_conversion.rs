use std::sync::Arc;

use chrono::NaiveDate;
use talent_pool::workflows::talentpool::{
    applicants_from_path, parse_applicants, ApplicantId, ConversionOutcome, FixedClock,
    InMemoryPortalAccounts, InMemoryTalentStore, NotificationKind, RecordOwner, TalentPoolService,
    TalentRepository,
};

fn service(
    store: Arc<InMemoryTalentStore>,
) -> TalentPoolService<InMemoryTalentStore, InMemoryPortalAccounts> {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
    TalentPoolService::with_clock(
        store,
        Arc::new(InMemoryPortalAccounts::default()),
        Arc::new(FixedClock(today)),
    )
}

fn import(store: &InMemoryTalentStore) -> Vec<ApplicantId> {
    let drafts = applicants_from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/applicants.csv"
    ))
    .expect("fixture imports");
    drafts
        .into_iter()
        .map(|draft| store.insert_applicant(draft).expect("applicant stored").id)
        .collect()
}

#[test]
fn bulk_conversion_of_imported_applicants_deduplicates_by_email() {
    let store = Arc::new(InMemoryTalentStore::default());
    let ids = import(&store);
    assert_eq!(ids.len(), 5);

    let summary = service(store.clone())
        .bulk_convert_to_talent(&ids)
        .expect("bulk conversion succeeds");

    assert_eq!(summary.created(), 3);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(store.talent_count(), 3);
    assert_eq!(summary.entries[3].outcome, ConversionOutcome::MissingEmail);

    let notification = summary.notification();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "3 talents created, 2 skipped.");

    let ada_talent = summary.entries[0].outcome.talent_id();
    let second_ada = store
        .fetch_applicant(ids[1])
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert_eq!(second_ada.talent_id, ada_talent);
}

#[test]
fn single_conversion_of_the_same_selection_warns_about_duplicates() {
    let store = Arc::new(InMemoryTalentStore::default());
    let ids = import(&store);

    let summary = service(store.clone())
        .convert_to_talent(&ids)
        .expect("conversion succeeds");

    assert_eq!(summary.created(), 3);
    assert!(matches!(
        summary.entries[1].outcome,
        ConversionOutcome::ExistingTalent { .. }
    ));
    let notification = summary.notification();
    assert_eq!(notification.kind, NotificationKind::Warning);
    assert_eq!(notification.title, "Conversion completed with warnings");
    assert!(notification.message.starts_with("3 talents created."));
}

#[test]
fn converted_talents_carry_applicant_details_but_no_profile_rows() {
    let store = Arc::new(InMemoryTalentStore::default());
    let drafts = parse_applicants(
        "name,partner_name,email,linkedin_profile,description\n\
Backend engineer,Ada Lovelace,ada@example.com,https://linkedin.com/in/ada,Great fit\n"
            .as_bytes(),
    )
    .expect("csv parses");
    let applicant = store
        .insert_applicant(drafts.into_iter().next().expect("one draft"))
        .expect("applicant stored");

    let summary = service(store.clone())
        .convert_to_talent(&[applicant.id])
        .expect("conversion succeeds");
    let talent_id = summary.entries[0].outcome.talent_id().expect("talent created");
    let talent = store
        .fetch_talent(talent_id)
        .expect("fetch succeeds")
        .expect("talent exists");

    assert_eq!(talent.name, "Ada Lovelace");
    assert_eq!(talent.linkedin_profile.as_deref(), Some("https://linkedin.com/in/ada"));
    assert_eq!(talent.notes.as_deref(), Some("Great fit"));
    assert!(store
        .educations(RecordOwner::Talent(talent_id))
        .expect("educations load")
        .is_empty());
}
