use crate::helpers::check_redirect;
use crate::helpers::spawn_app;

#[tokio::test]
async fn login_invalid() {
    let app = spawn_app().await;
    let login_body = serde_json::json!({
        "username": "username",
        "password": "password",
    });
    let resp = app.post_login(&login_body).await;
    check_redirect(&resp, "/login");

    // flash message survives exactly one page load
    let html = app.get_login_html().await;
    assert!(html.contains("<p><i>Authentication failed</i></p>"));
    let html = app.get_login_html().await;
    assert!(!html.contains("Authentication failed"));
}

#[tokio::test]
async fn login_wrong_password() {
    let app = spawn_app().await;
    let login_body = serde_json::json!({
        "username": app.test_admin.username,
        "password": "not-the-password",
    });
    let resp = app.post_login(&login_body).await;
    check_redirect(&resp, "/login");

    let resp = app.get_sync_settings().await;
    check_redirect(&resp, "/login");
}

#[tokio::test]
async fn login_ok() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let html = app.get_sync_settings_html().await;
    assert!(html.contains("Mailchimp User Sync Settings"));
}

#[tokio::test]
async fn logout_ends_session() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let resp = app.post_logout().await;
    check_redirect(&resp, "/login");

    let html = app.get_login_html().await;
    assert!(html.contains("<p><i>You have successfully logged out.</i></p>"));

    let resp = app.get_sync_settings().await;
    check_redirect(&resp, "/login");
}

#[tokio::test]
async fn logout_without_login() {
    let app = spawn_app().await;
    let resp = app.post_logout().await;
    check_redirect(&resp, "/login");
}
