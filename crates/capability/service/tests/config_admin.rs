use api_contract::ConfigUpdateRequest;
use csms_service::{AppServices, ServiceError};
use csms_storage::{
    AuditLogCollection, InMemoryEphemeralStore, InMemoryKeyValueStore, SystemConfigRecord,
};
use std::sync::Arc;

fn services() -> (AppServices, Arc<InMemoryKeyValueStore>) {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let ephemeral = Arc::new(InMemoryEphemeralStore::new());
    (AppServices::new(kv.clone(), ephemeral), kv)
}

async fn login_admin(services: &AppServices) {
    services.gate.ensure_default_admin().await.expect("bootstrap");
    services
        .gate
        .login_with_password("admin", "admin123", false)
        .await
        .expect("login");
}

fn form() -> ConfigUpdateRequest {
    let defaults = SystemConfigRecord::default();
    ConfigUpdateRequest {
        system_name: "CSMS".to_string(),
        organization_name: defaults.organization_name,
        contact_email: defaults.contact_email,
        timezone: defaults.timezone,
        email_notifications: defaults.email_notifications,
        sms_notifications: defaults.sms_notifications,
        push_notifications: defaults.push_notifications,
        notification_frequency: defaults.notification_frequency,
        session_timeout: 30,
        password_min_length: 8,
        require_password_change: defaults.require_password_change,
        enable_audit_log: defaults.enable_audit_log,
        data_retention: defaults.data_retention,
        backup_frequency: defaults.backup_frequency,
    }
}

#[tokio::test]
async fn save_updates_scalars_and_keeps_lists() {
    let (services, _kv) = services();
    login_admin(&services).await;
    services
        .config
        .add_vehicle_type("tractor")
        .await
        .expect("add type");

    let saved = services.config.save(form()).await.expect("save");
    assert_eq!(saved.system_name, "CSMS");
    assert_eq!(saved.session_timeout, 30);
    // 列表字段不被表单覆盖
    assert!(saved.vehicle_types.iter().any(|item| item == "tractor"));
}

#[tokio::test]
async fn password_min_length_feeds_signup_validation() {
    let (services, _kv) = services();
    login_admin(&services).await;
    services.config.save(form()).await.expect("save");
    services.gate.logout().await.expect("logout");

    // 配置改成 8 位后，7 位口令被拒绝
    let err = services
        .signup
        .email_signup(api_contract::EmailSignupRequest {
            first_name: "Asha".to_string(),
            last_name: "Kumari".to_string(),
            username: "asha".to_string(),
            email: "asha@traffic.gov".to_string(),
            phone: None,
            password: "1234567".to_string(),
            confirm_password: "1234567".to_string(),
            is_admin: false,
            agree_terms: true,
        })
        .await
        .expect_err("short for new minimum");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn reset_restores_defaults() {
    let (services, _kv) = services();
    login_admin(&services).await;
    services.config.save(form()).await.expect("save");
    services
        .config
        .add_seizure_reason("expired-permit")
        .await
        .expect("add reason");

    let reset = services.config.reset().await.expect("reset");
    assert_eq!(reset, SystemConfigRecord::default());
}

#[tokio::test]
async fn officer_denied_config_access() {
    let (services, _kv) = services();
    login_admin(&services).await;
    services
        .users
        .create(api_contract::UserUpsertRequest {
            name: "Asha Kumari".to_string(),
            email: "asha@traffic.gov".to_string(),
            password: Some("secret123".to_string()),
            is_admin: false,
            department: None,
            badge_number: None,
        })
        .await
        .expect("create officer");
    services.gate.logout().await.expect("logout");
    services
        .gate
        .login_with_password("asha@traffic.gov", "secret123", false)
        .await
        .expect("officer login");

    assert!(matches!(
        services.config.get().await.expect_err("denied"),
        ServiceError::Permission(_)
    ));
    assert!(matches!(
        services.config.save(form()).await.expect_err("denied"),
        ServiceError::Permission(_)
    ));
}

#[tokio::test]
async fn config_changes_are_audited() {
    let (services, kv) = services();
    login_admin(&services).await;
    services.config.save(form()).await.expect("save");
    services.config.reset().await.expect("reset");

    let audit = AuditLogCollection::new(kv.clone());
    let actions: Vec<String> = audit
        .all()
        .await
        .expect("all")
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert!(actions.contains(&"config_updated".to_string()));
    assert!(actions.contains(&"config_reset".to_string()));
}
