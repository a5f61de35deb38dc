//! API integration tests
//!
//! Run against a live server (the memory backend is enough):
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ADMIN_EMAIL: &str = "admin@spincity.test";
const ADMIN_PASSWORD: &str = "admin-pass";
const ADMIN_KEY: &str = "1234";

/// Helper to get a token for the test admin, registering it on a fresh server
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let response = if response.status().is_success() {
        response
    } else {
        client
            .post(format!("{}/auth/register", BASE_URL))
            .json(&json!({
                "name": "Test Admin",
                "email": ADMIN_EMAIL,
                "password": ADMIN_PASSWORD,
                "adminKey": ADMIN_KEY
            }))
            .send()
            .await
            .expect("Failed to send register request")
    };

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to pass the admin-key gate and get a confirmation token
async fn confirm_admin_key(client: &Client, token: &str) -> String {
    let response = client
        .post(format!("{}/session/admin-key/open", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "action": "integration test delete" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .post(format!("{}/session/admin-key/verify", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "adminKey": ADMIN_KEY }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    body["confirmationToken"]
        .as_str()
        .expect("No confirmation token")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    get_auth_token(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid email or password.");
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], ADMIN_EMAIL);
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_contact() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/contacts", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "fullName": "Integration Client",
            "phone": "555-0100",
            "address": "1 Test Street"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let contact_id = body["id"].as_str().expect("No contact ID").to_string();

    // Deleting without the admin key is refused
    let response = client
        .delete(format!("{}/contacts/{}", BASE_URL, contact_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let confirmation = confirm_admin_key(&client, &token).await;
    let response = client
        .delete(format!("{}/contacts/{}", BASE_URL, contact_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("X-Confirmation-Token", confirmation)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_list_users() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_get_dashboard() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["totalClients"].is_number());
    assert!(body["activeRentals"].is_number());
    assert!(body["openRepairs"].is_number());
    assert!(body["systemUsers"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_get_settings() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/settings", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["notificationSettings"].is_object());
    assert!(body.get("adminKey").is_none());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/contacts", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
