use crate::helpers::check_redirect;
use crate::helpers::spawn_app;

#[tokio::test]
async fn not_logged_in() {
    let app = spawn_app().await;

    let resp = app.get_sync_settings().await;
    check_redirect(&resp, "/login");

    let body = serde_json::json!({
        "mailchimp_api_key": "abc123-us6",
        "mailchimp_user_sync_save": "1",
    });
    let resp = app.post_sync_settings(&body).await;
    check_redirect(&resp, "/login");
    assert_eq!(app.stored_option("mailchimp_api_key").await, None);
}

#[tokio::test]
async fn fresh_install_renders_empty_fields() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let html = app.get_sync_settings_html().await;
    assert!(html.contains(r#"name="mailchimp_api_key" value="""#));
    assert!(html.contains(r#"name="mailchimp_list_id" value="""#));
    assert!(html.contains(r#"name="mailchimp_server_prefix" value="""#));
}

#[tokio::test]
async fn save_then_render() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let body = serde_json::json!({
        "mailchimp_api_key": "abc123-us6",
        "mailchimp_list_id": "a1b2c3",
        "mailchimp_server_prefix": "us6",
        "mailchimp_user_sync_save": "1",
        "_nonce": app.settings_nonce().await,
    });
    let resp = app.post_sync_settings(&body).await;
    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Settings saved successfully."));
    assert!(html.contains(r#"name="mailchimp_list_id" value="a1b2c3""#));

    assert_eq!(
        app.stored_option("mailchimp_api_key").await.as_deref(),
        Some("abc123-us6")
    );
    assert_eq!(app.stored_option("mailchimp_list_id").await.as_deref(), Some("a1b2c3"));
    assert_eq!(app.stored_option("mailchimp_server_prefix").await.as_deref(), Some("us6"));

    // notice is not sticky
    let html = app.get_sync_settings_html().await;
    assert!(!html.contains("Settings saved successfully."));
    assert!(html.contains(r#"name="mailchimp_server_prefix" value="us6""#));
}

#[tokio::test]
async fn submitted_values_are_sanitized() {
    let app = spawn_app().await;
    app.configure_mailchimp("  abc123-us6\n", "<b>a1b2c3</b>", "us6%0A").await;

    assert_eq!(
        app.stored_option("mailchimp_api_key").await.as_deref(),
        Some("abc123-us6")
    );
    assert_eq!(app.stored_option("mailchimp_list_id").await.as_deref(), Some("a1b2c3"));
    assert_eq!(app.stored_option("mailchimp_server_prefix").await.as_deref(), Some("us6"));
}

#[tokio::test]
async fn saving_twice_is_idempotent() {
    let app = spawn_app().await;
    app.configure_mailchimp("abc123-us6", "a1b2c3", "us6").await;
    app.configure_mailchimp("abc123-us6", "a1b2c3", "us6").await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM options")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(app.stored_option("mailchimp_list_id").await.as_deref(), Some("a1b2c3"));
}

#[tokio::test]
async fn missing_or_bad_nonce_is_forbidden() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    for (body, msg) in [
        (
            serde_json::json!({
                "mailchimp_api_key": "abc123-us6",
                "mailchimp_user_sync_save": "1",
            }),
            "missing nonce",
        ),
        (
            serde_json::json!({
                "mailchimp_api_key": "abc123-us6",
                "mailchimp_user_sync_save": "1",
                "_nonce": "deadbeef",
            }),
            "bad nonce",
        ),
    ] {
        let resp = app.post_sync_settings(&body).await;
        assert_eq!(resp.status().as_u16(), 403, "{msg}");
    }
    assert_eq!(app.stored_option("mailchimp_api_key").await, None);
}

#[tokio::test]
async fn submit_without_save_marker_changes_nothing() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let body = serde_json::json!({
        "mailchimp_api_key": "abc123-us6",
        "mailchimp_list_id": "a1b2c3",
        "_nonce": app.settings_nonce().await,
    });
    let resp = app.post_sync_settings(&body).await;
    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().await.unwrap();
    assert!(!html.contains("Settings saved successfully."));
    assert_eq!(app.stored_option("mailchimp_api_key").await, None);
}
