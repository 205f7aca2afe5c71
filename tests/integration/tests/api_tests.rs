//! End-to-end tests against a running blog server
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_redirect, assert_status, assert_text, check_test_env, fixtures::*,
    TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.browser().unwrap().get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .browser()
        .unwrap()
        .get("/health/ready")
        .await
        .expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_signup_starts_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, form) = server.signed_up("writer").await.unwrap();

    assert!(browser.cookie("access_token").is_some());
    assert!(browser.cookie("refresh_token").is_some());

    let response = browser.get("/dashboard").await.unwrap();
    let body = assert_text(response, StatusCode::OK).await.unwrap();
    assert!(body.contains(&form.username));
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = server.signed_up("twin").await.unwrap();

    let mut again = SignupForm::unique("twin");
    again.username = form.username.clone();
    let response = server
        .browser()
        .unwrap()
        .post_form("/signup", &again.fields())
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_login_by_username_and_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = server.signed_up("reader").await.unwrap();

    for login in [&form.username, &form.email] {
        let browser = server.browser().unwrap();
        let response = browser
            .post_form(
                "/login",
                &[("login", login.clone()), ("password", form.password.clone())],
            )
            .await
            .unwrap();
        assert_redirect(response, "/dashboard").await.unwrap();
        assert!(browser.cookie("access_token").is_some());
    }
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = server.signed_up("forgetful").await.unwrap();

    let response = server
        .browser()
        .unwrap()
        .post_form(
            "/login",
            &[("login", form.username.clone()), ("password", "WrongPass999!".to_string())],
        )
        .await
        .unwrap();
    let body = assert_text(response, StatusCode::FORBIDDEN).await.unwrap();
    assert!(body.contains("Invalid username/email or password"));
}

#[tokio::test]
async fn test_login_honours_safe_next() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, form) = server.signed_up("returning").await.unwrap();
    let fields = [("login", form.username.clone()), ("password", form.password.clone())];

    let response = server
        .browser()
        .unwrap()
        .post_form("/login?next=/profile/edit", &fields)
        .await
        .unwrap();
    assert_redirect(response, "/profile/edit").await.unwrap();

    let response = server
        .browser()
        .unwrap()
        .post_form("/login?next=//evil.example.com", &fields)
        .await
        .unwrap();
    assert_redirect(response, "/dashboard").await.unwrap();
}

#[tokio::test]
async fn test_logout_ends_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, _) = server.signed_up("leaving").await.unwrap();

    let response = browser.post_form("/logout", &[]).await.unwrap();
    assert_redirect(response, "/login").await.unwrap();

    let response = browser.get("/dashboard").await.unwrap();
    assert_redirect(response, "/login").await.unwrap();
}

#[tokio::test]
async fn test_refresh_token_rotates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (browser, form) = server.signed_up("rotating").await.unwrap();
    let refresh_token = browser.cookie("refresh_token").unwrap();

    let client = server.browser().unwrap();
    let response = client
        .post_json("/auth/refresh", &json!({ "refresh_token": refresh_token }))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.username, form.username);
    assert_eq!(auth.token_type, "Bearer");
    assert_ne!(auth.refresh_token, refresh_token);

    // The replaced session no longer refreshes
    let response = client
        .post_json("/auth/refresh", &json!({ "refresh_token": refresh_token }))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_and_read_anonymously() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, _) = server.signed_up("alice").await.unwrap();

    let form = PostForm::unique("Hello World");
    let path = author.create_post(&form).await.unwrap();
    assert!(path.starts_with("/post/hello-world-"));

    let response = server.browser().unwrap().get(&path).await.unwrap();
    let body = assert_text(response, StatusCode::OK).await.unwrap();
    assert!(body.contains(&form.title));
    assert!(body.contains("Integration test body"));
}

#[tokio::test]
async fn test_create_post_duplicate_slug() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, _) = server.signed_up("alice").await.unwrap();

    let form = PostForm::unique("Hello World");
    author.create_post(&form).await.unwrap();

    let response = author.post_form("/post/create", &form.fields()).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_create_post_requires_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let anonymous = server.browser().unwrap();

    let response = anonymous.get("/post/create").await.unwrap();
    assert_redirect(response, "/login").await.unwrap();

    let form = PostForm::unique("Sneaky");
    let response = anonymous.post_form("/post/create", &form.fields()).await.unwrap();
    assert_redirect(response, "/login").await.unwrap();
}

#[tokio::test]
async fn test_draft_visible_only_to_author() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, _) = server.signed_up("drafter").await.unwrap();
    let path = author.create_post(&PostForm::draft("Unfinished")).await.unwrap();

    let response = author.get(&path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.browser().unwrap().get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_html_upload_is_rejected_as_featured_image() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, _) = server.signed_up("alice").await.unwrap();
    let form = PostForm::unique("Upload");

    let file = reqwest::multipart::Part::bytes(b"<script>alert(1)</script>".to_vec())
        .file_name("evil.html")
        .mime_str("text/html")
        .unwrap();
    let response = alice
        .post_upload("/post/create", &form.fields(), "featured_image", file)
        .await
        .unwrap();
    let body = assert_text(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(body.contains("Upload a valid image"));

    let response = alice
        .get(&format!("/post/{}", form.expected_slug()))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_only_owner_edits_and_deletes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, _) = server.signed_up("alice").await.unwrap();
    let (bob, _) = server.signed_up("bob").await.unwrap();

    let mut form = PostForm::unique("Owned");
    let path = alice.create_post(&form).await.unwrap();

    let response = bob.get(&format!("{path}/edit")).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    let response = bob.post_form(&format!("{path}/delete"), &[]).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Edits keep the slug even when the title changes
    form.title = format!("{} revised", form.title);
    let response = alice
        .post_form(&format!("{path}/edit"), &form.fields())
        .await
        .unwrap();
    assert_redirect(response, &path).await.unwrap();
    let body = assert_text(alice.get(&path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(body.contains("revised"));

    let response = bob.get(&format!("{path}/delete")).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
    let body = assert_text(alice.get(&format!("{path}/delete")).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(body.contains("revised"));

    let response = alice.post_form(&format!("{path}/delete"), &[]).await.unwrap();
    assert_redirect(response, "/").await.unwrap();
    let response = alice.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_search_finds_post() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, _) = server.signed_up("searcher").await.unwrap();
    let form = PostForm::unique("Findable");
    let path = author.create_post(&form).await.unwrap();

    let query = form.title.replace(' ', "+");
    let response = server
        .browser()
        .unwrap()
        .get(&format!("/search?q={query}"))
        .await
        .unwrap();
    let body = assert_text(response, StatusCode::OK).await.unwrap();
    assert!(body.contains(&path));
}

#[tokio::test]
async fn test_page_out_of_range() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.browser().unwrap().get("/?page=100000").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Follow Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_follow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, alice) = server.signed_up("alice").await.unwrap();
    let (bob, _) = server.signed_up("bob").await.unwrap();

    let response = bob.toggle_follow(&alice.username).await.unwrap();
    let followed: ToggleFollowResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(followed.status, "followed");
    assert_eq!(followed.followers_count, 1);

    let response = bob.toggle_follow(&alice.username).await.unwrap();
    let unfollowed: ToggleFollowResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unfollowed.status, "unfollowed");
    assert_eq!(unfollowed.followers_count, 0);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, form) = server.signed_up("alice").await.unwrap();

    let response = alice.toggle_follow(&form.username).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_follow_requires_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, alice) = server.signed_up("alice").await.unwrap();

    let response = server
        .browser()
        .unwrap()
        .toggle_follow(&alice.username)
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_follow_unknown_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (bob, _) = server.signed_up("bob").await.unwrap();

    let response = bob.toggle_follow("nobody-by-this-name").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// View & Comment Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_post_views_are_all_counted() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (author, _) = server.signed_up("popular").await.unwrap();
    let form = PostForm::unique("Viral");
    author.create_post(&form).await.unwrap();
    let slug = form.expected_slug();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..20 {
        let browser = server.browser().unwrap();
        let slug = slug.clone();
        tasks.spawn(async move {
            let response = browser
                .post_form("/ajax/post-view", &[("slug", slug)])
                .await
                .unwrap();
            let view: PostViewResponse = assert_json(response, StatusCode::OK).await.unwrap();
            view.views
        });
    }

    let mut counts = Vec::new();
    while let Some(result) = tasks.join_next().await {
        counts.push(result.unwrap());
    }
    counts.sort_unstable();
    assert_eq!(counts, (1..=20).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_post_view_unknown_slug() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .browser()
        .unwrap()
        .post_form("/ajax/post-view", &[("slug", "no-such-post".to_string())])
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_add_comment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, _) = server.signed_up("alice").await.unwrap();
    let (bob, bob_form) = server.signed_up("bob").await.unwrap();
    let form = PostForm::unique("Discussed");
    let path = alice.create_post(&form).await.unwrap();
    let endpoint = format!("/ajax/add-comment/{}", form.expected_slug());

    let response = server
        .browser()
        .unwrap()
        .post_form(&endpoint, &[("body", "drive-by".to_string())])
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = bob.post_form(&endpoint, &[("body", String::new())]).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = bob
        .post_form(&endpoint, &[("body", "<b>Great post</b>".to_string())])
        .await
        .unwrap();
    let added: AddCommentResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(added.status, "ok");
    assert_eq!(added.comment.author, bob_form.username);
    assert_eq!(added.comment.body, "<b>Great post</b>");
    assert_eq!(added.comments_count, 1);

    let body = assert_text(server.browser().unwrap().get(&path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(body.contains("&lt;b&gt;Great post"));
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_update_bio_shows_on_author_page() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (alice, form) = server.signed_up("alice").await.unwrap();
    let author_page = format!("/author/{}", form.username);

    let response = alice
        .post_form("/profile/edit", &[("bio", "Writes about integration tests".to_string())])
        .await
        .unwrap();
    assert_redirect(response, &author_page).await.unwrap();

    let response = server.browser().unwrap().get(&author_page).await.unwrap();
    let body = assert_text(response, StatusCode::OK).await.unwrap();
    assert!(body.contains("Writes about integration tests"));
}

#[tokio::test]
async fn test_unknown_author_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .browser()
        .unwrap()
        .get("/author/nobody-by-this-name")
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
