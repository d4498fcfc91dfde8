mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn signin_failure_uses_error_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signin", server.base_url))
        .json(&json!({ "email": "nobody@campus.edu", "password": "not-a-real-password" }))
        .send()
        .await?;

    // Unknown account, or no database to look it up in
    assert!(!res.status().is_success(), "unexpected status: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false, "{}", body);
    assert!(body.get("error").is_some(), "missing 'error': {}", body);
    assert!(body.get("code").is_some(), "missing 'code': {}", body);
    Ok(())
}

#[tokio::test]
async fn signup_rejects_privileged_roles_before_touching_storage() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", server.base_url))
        .json(&json!({
            "name": "Mallory",
            "email": "mallory@campus.edu",
            "password": "password123",
            "role": "admin"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["role"].is_string(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn protected_api_requires_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/auth/me", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/courses", server.base_url))
        .bearer_auth("forged.token.value")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}
