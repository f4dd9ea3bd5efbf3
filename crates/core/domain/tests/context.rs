use domain::pages::{Access, Page, check_access};
use domain::{Role, SessionContext};

#[test]
fn session_context_builds() {
    let ctx = SessionContext::new(1, "Admin User", Role::Admin);

    assert_eq!(ctx.user_id, 1);
    assert_eq!(ctx.display_name, "Admin User");
    assert!(ctx.is_admin());
}

#[test]
fn anonymous_redirects_to_login() {
    for page in [Page::UserDashboard, Page::AdminDashboard, Page::Analytics] {
        assert_eq!(
            check_access(page, None),
            Access::Denied {
                redirect: Page::Login
            }
        );
    }
    assert_eq!(check_access(Page::Login, None), Access::Granted);
}

#[test]
fn officer_redirects_from_admin_pages() {
    let role = Some(Role::Officer);
    assert_eq!(check_access(Page::UserDashboard, role), Access::Granted);
    for page in [
        Page::AdminDashboard,
        Page::UserManagement,
        Page::SystemConfig,
        Page::ReportManagement,
        Page::AuditTrail,
        Page::Analytics,
    ] {
        assert_eq!(
            check_access(page, role),
            Access::Denied {
                redirect: Page::UserDashboard
            }
        );
    }
}

#[test]
fn admin_granted_everywhere() {
    let role = Some(Role::Admin);
    for page in [
        Page::Login,
        Page::UserDashboard,
        Page::AdminDashboard,
        Page::UserManagement,
        Page::SystemConfig,
        Page::ReportManagement,
        Page::AuditTrail,
        Page::Analytics,
    ] {
        assert_eq!(check_access(page, role), Access::Granted);
    }
}
