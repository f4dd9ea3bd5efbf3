use csms_storage::{
    InMemoryKeyValueStore, StorageError, UserCollection, UserPatch, UserRecord, UserStatus,
};
use std::sync::Arc;

fn collection() -> UserCollection {
    UserCollection::new(Arc::new(InMemoryKeyValueStore::new()))
}

fn officer(name: &str, email: &str) -> UserRecord {
    UserRecord {
        id: 0,
        first_name: name.to_string(),
        last_name: "Officer".to_string(),
        name: format!("{name} Officer"),
        username: None,
        email: Some(email.to_string()),
        phone: None,
        password: "secret123".to_string(),
        is_admin: false,
        status: UserStatus::Active,
        department: None,
        badge_number: None,
        created_at: String::new(),
        last_login: None,
        verified_phone: None,
    }
}

#[tokio::test]
async fn bootstrap_admin_created_once() {
    let users = collection();
    users.ensure_default_admin().await.expect("bootstrap");
    users.ensure_default_admin().await.expect("idempotent");

    let all = users.all().await.expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, 1);
    assert_eq!(all[0].username.as_deref(), Some("admin"));
    assert!(all[0].is_admin);
}

#[tokio::test]
async fn bootstrap_skipped_when_not_empty() {
    let users = collection();
    users.add(officer("Asha", "asha@traffic.gov")).await.expect("add");
    users.ensure_default_admin().await.expect("noop");
    assert!(users
        .find_by_username("admin")
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn duplicate_identifiers_rejected() {
    let users = collection();
    let mut first = officer("Asha", "asha@traffic.gov");
    first.username = Some("asha".to_string());
    first.phone = Some("+911111111111".to_string());
    users.add(first).await.expect("add");

    let mut dup_email = officer("Ravi", "asha@traffic.gov");
    dup_email.username = Some("ravi".to_string());
    let err = users.add(dup_email).await.expect_err("dup email");
    assert!(matches!(err, StorageError::Validation(_)));

    let mut dup_username = officer("Ravi", "ravi@traffic.gov");
    dup_username.username = Some("asha".to_string());
    let err = users.add(dup_username).await.expect_err("dup username");
    assert!(matches!(err, StorageError::Validation(_)));

    let mut dup_phone = officer("Ravi", "ravi@traffic.gov");
    dup_phone.phone = Some("+911111111111".to_string());
    let err = users.add(dup_phone).await.expect_err("dup phone");
    assert!(matches!(err, StorageError::Validation(_)));

    // 失败的写入不改变集合
    assert_eq!(users.all().await.expect("all").len(), 1);
}

#[tokio::test]
async fn missing_identifier_rejected() {
    let users = collection();
    let mut record = officer("Asha", "unused");
    record.email = None;
    let err = users.add(record).await.expect_err("no identifier");
    assert!(matches!(err, StorageError::Validation(_)));
}

#[tokio::test]
async fn ids_are_unique_and_increasing() {
    let users = collection();
    let a = users.add(officer("A", "a@traffic.gov")).await.expect("a");
    let b = users.add(officer("B", "b@traffic.gov")).await.expect("b");
    let c = users.add(officer("C", "c@traffic.gov")).await.expect("c");
    assert!(a.id < b.id && b.id < c.id);
}

#[tokio::test]
async fn update_merges_patch() {
    let users = collection();
    let added = users.add(officer("Asha", "asha@traffic.gov")).await.expect("add");

    let updated = users
        .update(
            added.id,
            UserPatch {
                department: Some("Traffic".to_string()),
                status: Some(UserStatus::Inactive),
                ..UserPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.department.as_deref(), Some("Traffic"));
    assert_eq!(updated.status, UserStatus::Inactive);
    // 未出现在 patch 中的字段保持不变
    assert_eq!(updated.email.as_deref(), Some("asha@traffic.gov"));
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let users = collection();
    let err = users
        .update(42, UserPatch::default())
        .await
        .expect_err("missing");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn remove_deletes_record() {
    let users = collection();
    let added = users.add(officer("Asha", "asha@traffic.gov")).await.expect("add");
    users.remove(added.id).await.expect("remove");
    assert!(users.find(added.id).await.expect("find").is_none());

    let err = users.remove(added.id).await.expect_err("gone");
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn find_by_identifier_matches_email_or_username() {
    let users = collection();
    let mut record = officer("Asha", "asha@traffic.gov");
    record.username = Some("asha".to_string());
    users.add(record).await.expect("add");

    assert!(users
        .find_by_identifier("asha@traffic.gov")
        .await
        .expect("by email")
        .is_some());
    assert!(users
        .find_by_identifier("asha")
        .await
        .expect("by username")
        .is_some());
    assert!(users
        .find_by_identifier("nobody")
        .await
        .expect("miss")
        .is_none());
}

#[tokio::test]
async fn record_login_sets_last_login() {
    let users = collection();
    let added = users.add(officer("Asha", "asha@traffic.gov")).await.expect("add");
    users
        .record_login(added.id, "2026-08-06T10:00:00.000Z")
        .await
        .expect("login");
    let found = users.find(added.id).await.expect("find").expect("present");
    assert_eq!(found.last_login.as_deref(), Some("2026-08-06T10:00:00.000Z"));
}
