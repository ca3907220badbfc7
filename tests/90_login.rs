mod common;

use anyhow::Result;
use chrono::Duration;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn login(client: &reqwest::Client, server: &TestServer) -> Result<String> {
    let res = client.post(server.url("/login")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    let token = body["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string();
    assert_eq!(body.as_object().map(|o| o.len()), Some(1), "unexpected body: {}", body);
    Ok(token)
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn login_token_unlocks_api_for_demo_identity() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let token = login(&client, &server).await?;

    let res = client
        .get(server.url("/api/whoami"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "identity": "demo" }));

    let res = client
        .post(server.url("/api/notes"))
        .bearer_auth(&token)
        .json(&json!({ "title": "hello", "content": "world" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let note = res.json::<Value>().await?;
    assert_eq!(note["userId"], "demo");

    let res = client
        .get(server.url("/api/notes"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let notes = res.json::<Value>().await?;
    assert_eq!(notes.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn login_ignores_identity_in_body() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/login"))
        .json(&json!({ "userId": "root" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let token = res.json::<Value>().await?["token"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let res = client
        .get(server.url("/api/whoami"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.json::<Value>().await?["identity"], "demo");
    Ok(())
}

#[tokio::test]
async fn alice_session_lasts_exactly_its_ttl() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let token = server.app.token_with_ttl("alice", Duration::hours(1));

    let res = client
        .get(server.url("/api/whoami"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["identity"], "alice");

    server.app.clock.advance(Duration::hours(1) + Duration::minutes(1));

    let res = client
        .get(server.url("/api/whoami"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "unauthorized" }));
    Ok(())
}
