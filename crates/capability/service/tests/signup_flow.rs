use api_contract::{EmailSignupRequest, PhoneSignupRequest};
use csms_auth::AuthError;
use csms_service::{AppServices, ServiceError};
use csms_storage::{
    EphemeralStore, InMemoryEphemeralStore, InMemoryKeyValueStore, KEY_SIGNUP_DATA,
};
use std::sync::Arc;

const NOW: i64 = 1_700_000_000_000;

fn services() -> (AppServices, Arc<InMemoryEphemeralStore>) {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let ephemeral = Arc::new(InMemoryEphemeralStore::new());
    (AppServices::new(kv, ephemeral.clone()), ephemeral)
}

fn email_request() -> EmailSignupRequest {
    EmailSignupRequest {
        first_name: "Asha".to_string(),
        last_name: "Kumari".to_string(),
        username: "asha".to_string(),
        email: "asha@traffic.gov".to_string(),
        phone: None,
        password: "secret123".to_string(),
        confirm_password: "secret123".to_string(),
        is_admin: false,
        agree_terms: true,
    }
}

fn phone_request() -> PhoneSignupRequest {
    PhoneSignupRequest {
        first_name: "Ravi".to_string(),
        last_name: "Kumar".to_string(),
        country_code: "+91".to_string(),
        phone_number: "9876500002".to_string(),
        password: "secret123".to_string(),
        is_admin: false,
        agree_terms: true,
    }
}

#[tokio::test]
async fn email_signup_then_login() {
    let (services, _ephemeral) = services();

    let created = services
        .signup
        .email_signup(email_request())
        .await
        .expect("signup");
    assert_eq!(created.name, "Asha Kumari");
    assert!(created.password.starts_with("$argon2"));

    services
        .gate
        .login_with_password("asha", "secret123", false)
        .await
        .expect("login by username");
}

#[tokio::test]
async fn email_signup_validation_rules() {
    let (services, _ephemeral) = services();

    let mut request = email_request();
    request.agree_terms = false;
    assert!(matches!(
        services.signup.email_signup(request).await.expect_err("terms"),
        ServiceError::Validation(_)
    ));

    let mut request = email_request();
    request.confirm_password = "different".to_string();
    assert!(matches!(
        services
            .signup
            .email_signup(request)
            .await
            .expect_err("mismatch"),
        ServiceError::Validation(_)
    ));

    // 口令短于系统配置的最小长度（默认 6）
    let mut request = email_request();
    request.password = "abc".to_string();
    request.confirm_password = "abc".to_string();
    assert!(matches!(
        services.signup.email_signup(request).await.expect_err("short"),
        ServiceError::Validation(_)
    ));

    // 重复邮箱
    services
        .signup
        .email_signup(email_request())
        .await
        .expect("first");
    let err = services
        .signup
        .email_signup(email_request())
        .await
        .expect_err("duplicate");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn phone_signup_full_flow() {
    let (services, ephemeral) = services();

    let (challenge, guard) = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect("start");
    assert_eq!(challenge.phone, "+919876500002");
    assert!(ephemeral.get(KEY_SIGNUP_DATA).is_some());

    let created = services
        .signup
        .phone_signup_verify(&challenge.code, NOW + 30_000)
        .await
        .expect("verify");
    guard.disarm();
    assert_eq!(created.username.as_deref(), Some("user_500002"));
    assert_eq!(created.phone.as_deref(), Some("+919876500002"));
    assert_eq!(created.verified_phone, Some(true));
    assert!(ephemeral.get(KEY_SIGNUP_DATA).is_none());

    // 建档后可通过手机号登录
    services
        .gate
        .login_with_phone("+919876500002")
        .await
        .expect("phone login");
}

#[tokio::test]
async fn phone_signup_rejects_duplicate_phone() {
    let (services, _ephemeral) = services();
    let (challenge, guard) = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect("start");
    services
        .signup
        .phone_signup_verify(&challenge.code, NOW)
        .await
        .expect("verify");
    guard.disarm();

    let err = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn three_wrong_codes_clear_pending_signup() {
    let (services, ephemeral) = services();
    let (_challenge, guard) = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect("start");

    for _ in 0..2 {
        let err = services
            .signup
            .phone_signup_verify("000000", NOW)
            .await
            .expect_err("wrong");
        assert!(matches!(
            err,
            ServiceError::Auth(AuthError::OtpMismatch { .. })
        ));
    }
    let err = services
        .signup
        .phone_signup_verify("000000", NOW)
        .await
        .expect_err("locked");
    assert!(matches!(err, ServiceError::Auth(AuthError::OtpLocked)));
    guard.disarm();

    // 锁定时注册资料一并清除
    assert!(ephemeral.get(KEY_SIGNUP_DATA).is_none());
}

#[tokio::test]
async fn cancel_clears_otp_and_pending_data() {
    let (services, ephemeral) = services();
    let (_challenge, guard) = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect("start");
    guard.disarm();

    services.signup.phone_signup_cancel();
    assert!(ephemeral.get(KEY_SIGNUP_DATA).is_none());
    let err = services
        .signup
        .phone_signup_verify("123456", NOW)
        .await
        .expect_err("cancelled");
    assert!(matches!(err, ServiceError::Auth(AuthError::OtpMissing)));
}

#[tokio::test]
async fn resend_issues_fresh_code() {
    let (services, _ephemeral) = services();
    let (first, guard) = services
        .signup
        .phone_signup_start(phone_request(), NOW)
        .await
        .expect("start");
    let second = services
        .signup
        .phone_signup_resend(NOW + 31_000)
        .expect("resend");
    assert_eq!(second.phone, first.phone);

    let created = services
        .signup
        .phone_signup_verify(&second.code, NOW + 32_000)
        .await
        .expect("verify");
    guard.disarm();
    assert_eq!(created.phone.as_deref(), Some("+919876500002"));
}

#[tokio::test]
async fn password_reset_requires_known_email() {
    let (services, _ephemeral) = services();
    services
        .signup
        .email_signup(email_request())
        .await
        .expect("signup");

    services
        .signup
        .request_password_reset("asha@traffic.gov")
        .await
        .expect("known email");

    let err = services
        .signup
        .request_password_reset("nobody@traffic.gov")
        .await
        .expect_err("unknown email");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
