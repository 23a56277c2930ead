//! Storage layer tests for the Refdesk server.

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use refdesk_core::db::unix_timestamp;

use super::db::Database;
use super::models::{MatchStatus, NewMatch, ProfileUpdate, SubmissionUpdate, UserUpdate};

async fn test_db() -> Database {
    Database::open_in_memory().await.unwrap()
}

async fn seed_user(db: &Database, id: &str, email: &str) {
    let created = db
        .create_user(id, "Alice", "Rossi", "RSSLCA80A01H501X", email, "hash123", None)
        .await
        .unwrap();
    assert!(created);
}

fn sample_match() -> NewMatch {
    NewMatch {
        championship: "A".to_string(),
        group_name: None,
        match_date: "2024-05-01".to_string(),
        match_number: "12".to_string(),
        team_a: "Red".to_string(),
        team_b: "Blue".to_string(),
        venue: None,
        kickoff_time: None,
    }
}

// === User tests ===

#[tokio::test]
async fn create_and_get_user() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    let user = db.get_user("u1").await.unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, "user");
    assert_eq!(user.certified, 0);
}

#[tokio::test]
async fn duplicate_email_insert_is_a_silent_noop() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    let created = db
        .create_user("u2", "Other", "Name", "XXX", "alice@example.com", "otherhash", None)
        .await
        .unwrap();
    assert!(!created);

    // The original row is untouched and no second row exists.
    let user = db.get_user_by_email("alice@example.com").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.first_name, "Alice");
    assert!(db.get_user("u2").await.is_err());
}

#[tokio::test]
async fn update_profile_keeps_unspecified_fields() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    db.update_profile(
        "u1",
        &ProfileUpdate {
            club: Some("Riverside Officials".to_string()),
            phone: Some("555-0100".to_string()),
            ..ProfileUpdate::default()
        },
    )
    .await
    .unwrap();

    let user = db.get_user("u1").await.unwrap();
    assert_eq!(user.first_name, "Alice");
    assert_eq!(user.club.as_deref(), Some("Riverside Officials"));
    assert_eq!(user.phone.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn list_users_filters_by_certification() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    seed_user(&db, "u2", "bruno@example.com").await;

    db.admin_update_user(
        "u2",
        &UserUpdate {
            certified: Some(true),
            ..UserUpdate::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(db.list_users(None).await.unwrap().len(), 2);
    let certified = db.list_users(Some(true)).await.unwrap();
    assert_eq!(certified.len(), 1);
    assert_eq!(certified[0].id, "u2");
}

#[tokio::test]
async fn admin_can_promote_role() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    db.admin_update_user(
        "u1",
        &UserUpdate {
            role: Some("admin".to_string()),
            ..UserUpdate::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(db.get_user("u1").await.unwrap().role, "admin");
}

#[tokio::test]
async fn delete_user_cascades_registrations() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    db.upsert_registration("r1", "u1", &m.id, "scorer", "09:00")
        .await
        .unwrap();

    assert!(db.delete_user("u1").await.unwrap());
    assert!(db.get_registration("r1").await.is_err());
}

// === Session tests ===

#[tokio::test]
async fn session_lookup_by_hash_honours_revocation_and_expiry() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    let future = unix_timestamp() + 3600;
    db.create_session("s1", "u1", "livehash", future).await.unwrap();
    db.create_session("s2", "u1", "expiredhash", unix_timestamp() - 1)
        .await
        .unwrap();

    assert!(db.get_session_by_hash("livehash").await.unwrap().is_some());
    assert!(db.get_session_by_hash("expiredhash").await.unwrap().is_none());

    assert!(db.revoke_session_by_hash("livehash").await.unwrap());
    assert!(db.get_session_by_hash("livehash").await.unwrap().is_none());
}

// === Match lifecycle tests ===

#[tokio::test]
async fn new_match_starts_to_be_played() {
    let db = test_db().await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    assert_eq!(m.lifecycle_status(), MatchStatus::ToBePlayed);
    assert!(m.final_result.is_none());
}

#[tokio::test]
async fn caller_flip_is_guarded_and_idempotent() {
    let db = test_db().await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();

    assert!(db.set_match_started(&m.id).await.unwrap());
    assert_eq!(
        db.get_match(&m.id).await.unwrap().lifecycle_status(),
        MatchStatus::InProgress
    );

    // Second flip finds the guard predicate false and changes nothing.
    assert!(!db.set_match_started(&m.id).await.unwrap());
    assert_eq!(
        db.get_match(&m.id).await.unwrap().lifecycle_status(),
        MatchStatus::InProgress
    );
}

#[tokio::test]
async fn complete_match_stores_result() {
    let db = test_db().await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();

    db.complete_match(&m.id, "78-65").await.unwrap();

    let m = db.get_match(&m.id).await.unwrap();
    assert_eq!(m.lifecycle_status(), MatchStatus::Completed);
    assert_eq!(m.final_result.as_deref(), Some("78-65"));
}

#[tokio::test]
async fn admin_override_accepts_any_status_string() {
    let db = test_db().await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    db.complete_match(&m.id, "78-65").await.unwrap();

    // Backwards transition, allowed for administrators.
    assert!(
        db.override_match_status(&m.id, "postponed", Some("pitch flooded"))
            .await
            .unwrap()
    );

    let m = db.get_match(&m.id).await.unwrap();
    assert_eq!(
        m.lifecycle_status(),
        MatchStatus::AdminOverride("postponed".to_string())
    );
    assert_eq!(m.admin_note.as_deref(), Some("pitch flooded"));

    assert!(
        !db.override_match_status("missing", "completed", None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn list_matches_orders_by_date() {
    let db = test_db().await;
    let mut later = sample_match();
    later.match_date = "2024-06-01".to_string();
    db.create_match("m2", &later).await.unwrap();
    db.create_match("m1", &sample_match()).await.unwrap();

    let matches = db.list_matches().await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "m1");
    assert_eq!(matches[1].id, "m2");
}

// === Registration tests ===

#[tokio::test]
async fn repeat_registration_updates_in_place() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();

    let first = db
        .upsert_registration("r1", "u1", &m.id, "scorer", "09:00")
        .await
        .unwrap();
    let second = db
        .upsert_registration("r2", "u1", &m.id, "caller", "08:30")
        .await
        .unwrap();

    // Same ledger row, updated role and arrival.
    assert_eq!(first.id, second.id);
    assert_eq!(second.role, "caller");
    assert_eq!(second.arrival_time, "08:30");
}

#[tokio::test]
async fn submission_merges_artifacts_and_sets_flag() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    let reg = db
        .upsert_registration("r1", "u1", &m.id, "caller", "09:00")
        .await
        .unwrap();

    db.apply_submission(
        &reg.id,
        &SubmissionUpdate {
            notes: Some("clean game".to_string()),
            pdf_file: Some("ab12.pdf".to_string()),
            ..SubmissionUpdate::default()
        },
    )
    .await
    .unwrap();

    // A second submission adds a file without clearing earlier artifacts.
    db.apply_submission(
        &reg.id,
        &SubmissionUpdate {
            photo_file: Some("cd34.jpg".to_string()),
            ..SubmissionUpdate::default()
        },
    )
    .await
    .unwrap();

    let reg = db.get_registration(&reg.id).await.unwrap();
    assert_eq!(reg.submitted, 1);
    assert_eq!(reg.notes.as_deref(), Some("clean game"));
    assert_eq!(reg.pdf_file.as_deref(), Some("ab12.pdf"));
    assert_eq!(reg.photo_file.as_deref(), Some("cd34.jpg"));
}

#[tokio::test]
async fn registration_role_override() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    let reg = db
        .upsert_registration("r1", "u1", &m.id, "caller", "09:00")
        .await
        .unwrap();

    assert!(db.update_registration_role(&reg.id, "scorer").await.unwrap());
    assert_eq!(db.get_registration(&reg.id).await.unwrap().role, "scorer");

    assert!(!db.update_registration_role("missing", "scorer").await.unwrap());
}

// === Viewing-confirmation tests ===

#[tokio::test]
async fn repeat_viewing_confirmation_is_a_noop() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();

    db.confirm_viewing(&m.id, "u1").await.unwrap();
    db.confirm_viewing(&m.id, "u1").await.unwrap();

    let viewings = db.list_viewings().await.unwrap();
    assert_eq!(viewings.len(), 1);
    assert_eq!(viewings[0].user_id, "u1");
}

// === Reset tests ===

#[tokio::test]
async fn reset_deletes_ledger_before_registry() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();
    db.upsert_registration("r1", "u1", &m.id, "caller", "09:00")
        .await
        .unwrap();
    db.confirm_viewing(&m.id, "u1").await.unwrap();

    let (registrations, matches) = db.reset_matches().await.unwrap();
    assert_eq!(registrations, 1);
    assert_eq!(matches, 1);

    assert!(db.list_matches().await.unwrap().is_empty());
    assert!(db.list_viewings().await.unwrap().is_empty());
    // Users survive a reset.
    assert!(db.get_user("u1").await.is_ok());
}

// === Report tests ===

#[tokio::test]
async fn report_orders_by_date_number_then_surname() {
    let db = test_db().await;
    db.create_user("u1", "Alice", "Zanetti", "Z1", "z@example.com", "h", None)
        .await
        .unwrap();
    db.create_user("u2", "Bruno", "Abate", "A1", "a@example.com", "h", None)
        .await
        .unwrap();

    let m1 = db.create_match("m1", &sample_match()).await.unwrap();
    let mut later = sample_match();
    later.match_date = "2024-06-01".to_string();
    later.match_number = "13".to_string();
    let m2 = db.create_match("m2", &later).await.unwrap();

    db.upsert_registration("r1", "u1", &m1.id, "caller", "09:00")
        .await
        .unwrap();
    db.upsert_registration("r2", "u2", &m1.id, "scorer", "09:15")
        .await
        .unwrap();
    db.upsert_registration("r3", "u1", &m2.id, "caller", "10:00")
        .await
        .unwrap();

    let rows = db.report_rows().await.unwrap();
    assert_eq!(rows.len(), 3);
    // Same match: Abate sorts before Zanetti.
    assert_eq!(rows[0].last_name, "Abate");
    assert_eq!(rows[1].last_name, "Zanetti");
    // Later date sorts last.
    assert_eq!(rows[2].match_id, m2.id);
}

#[tokio::test]
async fn artifact_rows_only_include_submitted_files() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;
    seed_user(&db, "u2", "bruno@example.com").await;
    let m = db.create_match("m1", &sample_match()).await.unwrap();

    let with_files = db
        .upsert_registration("r1", "u1", &m.id, "caller", "09:00")
        .await
        .unwrap();
    db.upsert_registration("r2", "u2", &m.id, "scorer", "09:15")
        .await
        .unwrap();

    db.apply_submission(
        &with_files.id,
        &SubmissionUpdate {
            data_file: Some("stats.bin".to_string()),
            ..SubmissionUpdate::default()
        },
    )
    .await
    .unwrap();

    let rows = db.artifact_rows().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].data_file.as_deref(), Some("stats.bin"));
}

#[tokio::test]
async fn registration_for_unknown_match_is_rejected() {
    let db = test_db().await;
    seed_user(&db, "u1", "alice@example.com").await;

    // The foreign key keeps orphaned ledger rows out even below the
    // route-level existence check.
    let result = db
        .upsert_registration("r1", "u1", "missing", "caller", "09:00")
        .await;
    assert!(result.is_err());
}
