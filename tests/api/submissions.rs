use std::path::Path;

use reqwest::{Method, StatusCode};

use sqlx::SqlitePool;

use email_receiver::gatekeeper::Gatekeeper;

use crate::helpers::{stored_emails, TestApp};

#[sqlx::test]
async fn landing_page_is_served(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.landing_page().await.expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body = res.text().await.expect("Failed to read body");
    assert!(body.contains("email-to-notify"));

    Ok(())
}

#[sqlx::test]
async fn submit_returns_page_for_valid_request(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .submit(Some("test@test.com"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert!(res
        .text()
        .await
        .expect("Failed to read body")
        .contains("<form"));

    let row: (String, String) = sqlx::query_as("select email, ip from submissions")
        .fetch_one(&pool)
        .await
        .expect("Failed to fetch inserted row");

    assert_eq!("test@test.com", row.0);
    assert_eq!("127.0.0.1", row.1);

    Ok(())
}

#[sqlx::test]
async fn submit_stores_forwarded_address(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .submit(Some("test@test.com"), Some("203.0.113.9, 10.0.0.1"))
        .await
        .expect("Failed to execute request");

    assert!(res.status().is_success());

    let ip: String = sqlx::query_scalar("select ip from submissions")
        .fetch_one(&pool)
        .await
        .expect("Failed to fetch inserted row");

    assert_eq!("203.0.113.9", ip);

    Ok(())
}

#[sqlx::test]
async fn submit_returns_bad_request_for_missing_email(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let test_cases = vec![("missing email", None), ("empty email", Some(""))];

    for (desc, email) in test_cases {
        let res = app
            .submit(email, None)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when payload was {}",
            desc
        );
    }

    assert!(stored_emails(&pool).await.is_empty());

    Ok(())
}

#[sqlx::test]
async fn submit_rejects_duplicate_email_from_another_address(
    pool: SqlitePool,
) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .submit(Some("dup@x.com"), Some("1.1.1.1"))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app
        .submit(Some("dup@x.com"), Some("9.9.9.9"))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!(
        "email address already registered",
        res.text().await.expect("Failed to read body")
    );
    assert_eq!(vec!["dup@x.com".to_string()], stored_emails(&pool).await);

    Ok(())
}

#[sqlx::test]
async fn submit_is_throttled_per_address(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn_with(&pool, Gatekeeper::new(60, 2)).await;
    let ip = Some("1.2.3.4");

    for email in ["a@x.com", "b@x.com"] {
        let res = app
            .submit(Some(email), ip)
            .await
            .expect("Failed to execute request");
        assert!(res.status().is_success());
    }

    let res = app
        .submit(Some("c@x.com"), ip)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::FORBIDDEN, res.status());
    assert_eq!(
        "too many email addresses submitted, try again later",
        res.text().await.expect("Failed to read body")
    );

    // Other addresses are unaffected
    let res = app
        .submit(Some("c@x.com"), Some("5.6.7.8"))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    assert_eq!(
        vec!["a@x.com", "b@x.com", "c@x.com"],
        stored_emails(&pool).await
    );

    Ok(())
}

#[sqlx::test]
async fn accepted_submission_succeeds_without_page(pool: SqlitePool) -> sqlx::Result<()> {
    let page_file = Path::new(env!("CARGO_MANIFEST_DIR")).join("static/missing.html");
    let app = TestApp::spawn_with_page(&pool, Gatekeeper::new(60, 10), page_file).await;

    let res = app.landing_page().await.expect("Failed to execute request");
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());

    let res = app
        .submit(Some("test@test.com"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(vec!["test@test.com"], stored_emails(&pool).await);

    Ok(())
}

#[sqlx::test]
async fn unhandled_method_is_a_bad_request(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .request(Method::DELETE, "")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[sqlx::test]
async fn store_failure_is_a_server_error(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    pool.close().await;

    let res = app
        .submit(Some("test@test.com"), None)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!(
        "Internal Server Error",
        res.text().await.expect("Failed to read body")
    );

    Ok(())
}
