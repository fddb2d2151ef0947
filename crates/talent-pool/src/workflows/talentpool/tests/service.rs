use std::sync::Arc;
use crate::workflows::talentpool::repository::PortalAccounts;

use super::common::*;
use crate::workflows::talentpool::{
    ApplicantDraft, ApplicantId, ConversionOutcome, FixedClock, InMemoryPortalAccounts,
    MatchingRule, NotificationKind, PartnerId, RecordOwner, TalentId, TalentPoolError,
    TalentPoolService, TalentRepository,
};

#[test]
fn convert_creates_one_talent_and_links_the_applicant() {
    let fixture = fixture();
    let applicant = applicant(&fixture.store, "Ada Lovelace", Some("ada@example.com"));

    let summary = fixture
        .service
        .convert_to_talent(&[applicant.id])
        .expect("conversion succeeds");

    assert_eq!(summary.created(), 1);
    assert_eq!(fixture.store.talent_count(), 1);
    let talent_id = summary.entries[0]
        .outcome
        .talent_id()
        .expect("talent assigned");
    let talent = fixture
        .store
        .fetch_talent(talent_id)
        .expect("fetch succeeds")
        .expect("talent exists");
    assert_eq!(talent.name, "Ada Lovelace");
    assert_eq!(talent.email, "ada@example.com");
    assert_eq!(talent.phone.as_deref(), Some("+31 20 555 0100"));
    assert_eq!(talent.creation_date, Some(today()));

    let linked = fixture
        .store
        .fetch_applicant(applicant.id)
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert_eq!(linked.talent_id, Some(talent_id));

    let notification = summary.notification();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert!(!notification.sticky);
}

#[test]
fn converting_a_linked_applicant_warns_without_creating() {
    let fixture = fixture();
    let applicant = applicant(&fixture.store, "Ada Lovelace", Some("ada@example.com"));
    fixture
        .service
        .convert_to_talent(&[applicant.id])
        .expect("first conversion succeeds");

    let summary = fixture
        .service
        .convert_to_talent(&[applicant.id])
        .expect("second conversion succeeds");

    assert_eq!(fixture.store.talent_count(), 1);
    assert!(matches!(
        summary.entries[0].outcome,
        ConversionOutcome::AlreadyLinked { .. }
    ));
    let notification = summary.notification();
    assert_eq!(notification.kind, NotificationKind::Warning);
    assert!(notification.sticky);
    assert_eq!(notification.title, "Talent already linked");
}

#[test]
fn single_conversion_reports_matching_talent_without_linking() {
    let fixture = fixture();
    let existing = talent(&fixture.store, "Ada Lovelace", "ADA@example.com");
    let applicant = applicant(&fixture.store, "Ada L.", Some("ada@example.com"));

    let summary = fixture
        .service
        .convert_to_talent(&[applicant.id])
        .expect("conversion succeeds");

    assert_eq!(
        summary.entries[0].outcome,
        ConversionOutcome::ExistingTalent {
            talent_id: existing.id,
            talent_name: "Ada Lovelace".to_string(),
        }
    );
    let stored = fixture
        .store
        .fetch_applicant(applicant.id)
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert!(stored.talent_id.is_none());
    assert_eq!(fixture.store.talent_count(), 1);
}

#[test]
fn bulk_conversion_creates_one_talent_per_distinct_applicant() {
    let fixture = fixture();
    let ids: Vec<ApplicantId> = (0..4)
        .map(|index| {
            applicant(
                &fixture.store,
                &format!("Candidate {index}"),
                Some(&format!("candidate{index}@example.com")),
            )
            .id
        })
        .collect();

    let summary = fixture
        .service
        .bulk_convert_to_talent(&ids)
        .expect("bulk conversion succeeds");

    assert_eq!(summary.created(), 4);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(fixture.store.talent_count(), 4);
    assert_eq!(
        summary.notification().message,
        "4 talents created, 0 skipped."
    );
}

#[test]
fn bulk_conversion_links_applicants_sharing_an_email() {
    let fixture = fixture();
    let first = applicant(&fixture.store, "Ada Lovelace", Some("ada@example.com"));
    let second = applicant(&fixture.store, "Ada Lovelace", Some("Ada@Example.com"));

    let summary = fixture
        .service
        .bulk_convert_to_talent(&[first.id, second.id])
        .expect("bulk conversion succeeds");

    assert_eq!(summary.created(), 1);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(fixture.store.talent_count(), 1);

    let talent_id = summary.entries[0].outcome.talent_id();
    assert_eq!(
        summary.entries[1].outcome,
        ConversionOutcome::LinkedExisting {
            talent_id: talent_id.expect("talent created"),
        }
    );
    let second = fixture
        .store
        .fetch_applicant(second.id)
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert_eq!(second.talent_id, talent_id);
}

#[test]
fn applicants_without_email_are_skipped() {
    let fixture = fixture();
    let applicant = applicant(&fixture.store, "Anonymous", None);

    let summary = fixture
        .service
        .bulk_convert_to_talent(&[applicant.id])
        .expect("bulk conversion succeeds");

    assert_eq!(summary.entries[0].outcome, ConversionOutcome::MissingEmail);
    assert_eq!(fixture.store.talent_count(), 0);
}

#[test]
fn unknown_applicant_aborts_before_any_talent_is_created() {
    let fixture = fixture();
    let known = applicant(&fixture.store, "Ada Lovelace", Some("ada@example.com"));

    let result = fixture
        .service
        .convert_to_talent(&[known.id, ApplicantId(404)]);

    assert!(matches!(
        result,
        Err(TalentPoolError::ApplicantNotFound(ApplicantId(404)))
    ));
    assert_eq!(fixture.store.talent_count(), 0);
}

#[test]
fn linkedin_matching_can_be_switched_off() {
    let store = Arc::new(crate::workflows::talentpool::InMemoryTalentStore::default());
    let service = TalentPoolService::with_clock(
        store.clone(),
        Arc::new(InMemoryPortalAccounts::default()),
        Arc::new(FixedClock(today())),
    )
    .with_matching(MatchingRule {
        match_linkedin: false,
    });

    let ids: Vec<ApplicantId> = ["ada@work.example", "ada@home.example"]
        .iter()
        .map(|email| {
            store
                .insert_applicant(ApplicantDraft {
                    email_from: Some(email.to_string()),
                    linkedin_profile: Some("https://linkedin.com/in/ada".to_string()),
                    ..ApplicantDraft::named("Ada")
                })
                .expect("applicant stored")
                .id
        })
        .collect();

    let summary = service
        .bulk_convert_to_talent(&ids)
        .expect("bulk conversion succeeds");
    assert_eq!(summary.created(), 2);
}

#[test]
fn copying_talent_data_leaves_the_source_untouched() {
    let fixture = fixture();
    let talent = talent(&fixture.store, "Ada Lovelace", "ada@example.com");
    seed_profile(&fixture.store, talent.id);
    let applicant = applicant(&fixture.store, "Ada Lovelace", Some("ada@example.com"));
    let before = fixture
        .store
        .experiences(RecordOwner::Talent(talent.id))
        .expect("experiences load");

    let copied = fixture
        .service
        .copy_talent_data_to_applicant(applicant.id, talent.id)
        .expect("copy succeeds");

    assert_eq!((copied.educations, copied.experiences, copied.skills), (1, 2, 1));
    let after = fixture
        .store
        .experiences(RecordOwner::Talent(talent.id))
        .expect("experiences load");
    assert_eq!(before, after);

    let target = fixture
        .store
        .experiences(RecordOwner::Applicant(applicant.id))
        .expect("experiences load");
    assert_eq!(target.len(), 2);
    assert_eq!(target[0].entry, before[0].entry);
    assert_ne!(target[0].id, before[0].id);
}

#[test]
fn reapply_creates_an_application_for_every_selected_talent() {
    let fixture = fixture();
    let (ada, ada_user) = portal_talent(&fixture, "Ada Lovelace", "ada@example.com");
    seed_profile(&fixture.store, ada.id);
    let grace = talent(&fixture.store, "Grace Hopper", "grace@example.com");

    let summary = fixture
        .service
        .reapply(&[ada.id, grace.id])
        .expect("reapply succeeds");

    assert_eq!(summary.entries.len(), 2);
    assert_eq!(summary.entries[0].copied.experiences, 2);
    let ada_application = fixture
        .store
        .fetch_applicant(summary.entries[0].applicant_id)
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert_eq!(ada_application.talent_id, Some(ada.id));
    assert_eq!(ada_application.partner_id, Some(PartnerId(ada_user.0)));

    let grace_application = fixture
        .store
        .fetch_applicant(summary.entries[1].applicant_id)
        .expect("fetch succeeds")
        .expect("applicant exists");
    assert!(grace_application.partner_id.is_none());
    assert_eq!(grace_application.email_from.as_deref(), Some("grace@example.com"));
}

#[test]
fn portal_user_creation_is_all_or_nothing() {
    let fixture = fixture();
    let (invited, _) = portal_talent(&fixture, "Ada Lovelace", "ada@example.com");
    let fresh = talent(&fixture.store, "Grace Hopper", "grace@example.com");

    let result = fixture.service.create_portal_user(&[fresh.id, invited.id]);

    match result {
        Err(err @ TalentPoolError::PortalUserExists { .. }) => assert!(err.is_user_facing()),
        other => panic!("expected existing portal user error, got {other:?}"),
    }
    let fresh = fixture
        .store
        .fetch_talent(fresh.id)
        .expect("fetch succeeds")
        .expect("talent exists");
    assert!(fresh.portal_user_id.is_none());
}

#[test]
fn shared_logins_abort_portal_user_creation() {
    let fixture = fixture();
    let first = talent(&fixture.store, "Ada Lovelace", "team@example.com");
    let second = talent(&fixture.store, "Ada King", " TEAM@example.com");

    let result = fixture.service.create_portal_user(&[first.id, second.id]);

    match result {
        Err(err @ TalentPoolError::LoginTaken { .. }) => assert!(err.is_user_facing()),
        other => panic!("expected login conflict, got {other:?}"),
    }
    for id in [first.id, second.id] {
        let stored = fixture
            .store
            .fetch_talent(id)
            .expect("fetch succeeds")
            .expect("talent exists");
        assert!(stored.portal_user_id.is_none());
    }
    assert!(!fixture
        .accounts
        .login_taken("team@example.com")
        .expect("lookup succeeds"));
}

#[test]
fn logins_already_in_use_abort_portal_user_creation() {
    let fixture = fixture();
    portal_talent(&fixture, "Ada Lovelace", "ada@example.com");
    let fresh = talent(&fixture.store, "Grace Hopper", "grace@example.com");
    let duplicate = talent(&fixture.store, "Ada Byron", "ada@example.com");

    let result = fixture.service.create_portal_user(&[fresh.id, duplicate.id]);

    assert!(matches!(result, Err(TalentPoolError::LoginTaken { .. })));
    let fresh = fixture
        .store
        .fetch_talent(fresh.id)
        .expect("fetch succeeds")
        .expect("talent exists");
    assert!(fresh.portal_user_id.is_none());
}

#[test]
fn reset_requires_a_portal_user_for_every_talent() {
    let fixture = fixture();
    let (invited, user) = portal_talent(&fixture, "Ada Lovelace", "ada@example.com");
    let uninvited = talent(&fixture.store, "Grace Hopper", "grace@example.com");

    let result = fixture
        .service
        .reset_portal_user(&[invited.id, uninvited.id]);
    assert!(matches!(result, Err(TalentPoolError::NoPortalUser { .. })));
    assert!(fixture.accounts.reset_requests().is_empty());

    let reset = fixture
        .service
        .reset_portal_user(&[invited.id])
        .expect("reset succeeds");
    assert_eq!(reset, vec![user]);
    assert_eq!(fixture.accounts.reset_requests(), vec![user]);
}

#[test]
fn open_linkedin_requires_a_profile_url() {
    let fixture = fixture();
    let talent = talent(&fixture.store, "Ada Lovelace", "ada@example.com");

    assert!(matches!(
        fixture.service.open_linkedin(talent.id),
        Err(TalentPoolError::NoLinkedInProfile { .. })
    ));

    let mut with_url = talent.clone();
    with_url.linkedin_profile = Some("https://linkedin.com/in/ada".to_string());
    fixture
        .store
        .update_talent(with_url)
        .expect("update succeeds");
    assert_eq!(
        fixture.service.open_linkedin(talent.id).expect("url present"),
        "https://linkedin.com/in/ada"
    );
}

#[test]
fn overview_reports_inactivity_and_active_applications() {
    let fixture = fixture();
    let talent = talent(&fixture.store, "Ada Lovelace", "ada@example.com");
    let application = fixture
        .store
        .insert_applicant(ApplicantDraft {
            talent_id: Some(talent.id),
            ..ApplicantDraft::named("Backend engineer")
        })
        .expect("applicant stored");
    let mut archived = fixture
        .store
        .insert_applicant(ApplicantDraft {
            talent_id: Some(talent.id),
            ..ApplicantDraft::named("Old application")
        })
        .expect("applicant stored");
    archived.active = false;
    fixture
        .store
        .update_applicant(archived)
        .expect("update succeeds");

    let overview = fixture
        .service
        .talent_overview(talent.id)
        .expect("overview loads");

    assert!(overview.inactive_tag);
    assert_eq!(overview.applications.len(), 1);
    assert_eq!(overview.applications[0].id, application.id);
}

#[test]
fn deletion_mark_records_reason_and_user() {
    let fixture = fixture();
    let talent = talent(&fixture.store, "Ada Lovelace", "ada@example.com");

    let marked = fixture
        .service
        .mark_for_deletion(talent.id, Some("requested by candidate".to_string()), None)
        .expect("mark succeeds");

    assert!(marked.marked_for_deletion);
    assert_eq!(marked.deletion_reason.as_deref(), Some("requested by candidate"));
    assert!(matches!(
        fixture.service.mark_for_deletion(TalentId(77), None, None),
        Err(TalentPoolError::TalentNotFound(TalentId(77)))
    ));
}
