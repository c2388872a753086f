//! API integration tests
//!
//! These run against a live server with the seed data loaded
//! (admin/librarian/member accounts, a handful of books and copies).

use reqwest::{redirect, Client};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Helper to log in and return a bearer token
async fn get_auth_token(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Client that reports redirects instead of following them
fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client")
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
async fn test_readiness_probes_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "librarian"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "librarian");
}

#[tokio::test]
#[ignore]
async fn test_index_counts_and_visit_counter() {
    // A cookie store makes the second request reuse the session
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let response = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let first: Value = response.json().await.expect("Failed to parse response");
    assert!(first["num_books"].is_number());
    assert!(first["num_instances"].is_number());
    assert!(first["num_instances_available"].is_number());
    assert!(first["num_authors"].is_number());
    assert!(first["num_genres"].is_number());
    let first_visits = first["num_visits"].as_i64().expect("No visit counter");
    assert!(first_visits >= 1);

    let response = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["num_visits"].as_i64(), Some(first_visits + 1));
}

#[tokio::test]
#[ignore]
async fn test_list_books_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert!(body["items"].as_array().unwrap().len() <= 10);
}

#[tokio::test]
#[ignore]
async fn test_get_book_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_authors_by_birth_year_rejects_non_year() {
    let client = Client::new();

    let response = client
        .get(format!("{}/author/birth/18x5/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/author/birth/1965/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["birth_year"], 1965);
    assert!(body["authors"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/mybooks/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_requires_group_membership() {
    let client = Client::new();

    // The librarian account is staff, not in the Library Members group
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .get(format!("{}/mybooks/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_lists_own_loans_soonest_due_first() {
    let client = Client::new();
    let token = get_auth_token(&client, "member", "member").await;

    // Resolve the member's own user id
    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    let me: Value = response.json().await.expect("Failed to parse response");
    let user_id = me["id"].as_i64().expect("No user ID");

    let response = client
        .get(format!("{}/mybooks/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("No items array");

    // Every row belongs to the requester and due dates never decrease
    let mut previous: Option<String> = None;
    for item in items {
        assert_eq!(item["borrower_id"].as_i64(), Some(user_id));
        let due_back = item["due_back"].as_str().expect("No due date").to_string();
        if let Some(prev) = &previous {
            assert!(*prev <= due_back, "loans out of due-date order");
        }
        previous = Some(due_back);
    }
}

#[tokio::test]
#[ignore]
async fn test_borrowed_list_requires_permission() {
    let client = Client::new();

    // Plain member lacks can_mark_returned
    let token = get_auth_token(&client, "member", "member").await;

    let response = client
        .get(format!("{}/borrowed/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .get(format!("{}/borrowed/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    // On-loan copies only, due soonest first
    let items = body["items"].as_array().unwrap();
    for item in items {
        assert_eq!(item["status"], Value::Null, "loaned rows carry no status field");
    }
}

#[tokio::test]
#[ignore]
async fn test_create_update_and_delete_author() {
    let client = no_redirect_client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    // The blank form proposes a default date of death
    let response = client
        .get(format!("{}/authors/create/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["form"]["date_of_death"], "2020-06-11");

    // Create
    let response = client
        .post(format!("{}/authors/create/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Ursula",
            "last_name": "Le Guin",
            "date_of_birth": "1929-10-21"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let author_id = body["id"].as_i64().expect("No author ID");

    // Update
    let response = client
        .post(format!("{}/authors/{}/update/", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "date_of_death": "2018-01-22"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["date_of_death"], "2018-01-22");
    assert_eq!(body["first_name"], "Ursula");

    // Delete redirects back to the author list
    let response = client
        .post(format!("{}/authors/{}/delete/", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get("location").map(|v| v.to_str().unwrap()),
        Some("/authors/")
    );

    let response = client
        .get(format!("{}/authors/{}/", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_author_create_requires_permission() {
    let client = Client::new();
    let token = get_auth_token(&client, "member", "member").await;

    let response = client
        .post(format!("{}/authors/create/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Nope",
            "last_name": "Denied"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_book() {
    let client = no_redirect_client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .post(format!("{}/books/create/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "summary": "A book created by the integration tests",
            "isbn": "9780000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");

    // Book deletion also lands on the author list
    let response = client
        .post(format!("{}/books/{}/delete/", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get("location").map(|v| v.to_str().unwrap()),
        Some("/authors/")
    );
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_long_isbn() {
    let client = Client::new();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .post(format!("{}/books/create/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Bad ISBN",
            "isbn": "97800000000000"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_renew_book_flow() {
    let client = no_redirect_client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    // Pick an on-loan copy from the librarian's borrowed list
    let response = client
        .get(format!("{}/borrowed/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("No items array");
    if items.is_empty() {
        return; // seed data has no active loans
    }
    let instance_id = items[0]["id"].as_str().expect("No instance ID").to_string();
    let book_id = items[0]["book_id"].as_i64().expect("No book ID");
    let borrower_id = items[0]["borrower_id"].clone();

    // The form proposes a date three weeks out
    let response = client
        .get(format!("{}/book/{}/renew/", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let proposed = body["form"]["due_back"].as_str().expect("No proposed date");
    let proposed_date = chrono::NaiveDate::parse_from_str(proposed, "%Y-%m-%d").unwrap();
    let delta = proposed_date - chrono::Utc::now().date_naive();
    assert_eq!(delta.num_days(), 21);

    // A renewal in the past is rejected with field errors
    let response = client
        .post(format!("{}/book/{}/renew/", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": "2000-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["field"], "due_back");
    assert_eq!(body["errors"][0]["message"], "Invalid date - renewal in past");

    // A valid renewal redirects to the borrowed list
    let response = client
        .post(format!("{}/book/{}/renew/", BASE_URL, instance_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "due_back": proposed }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers().get("location").map(|v| v.to_str().unwrap()),
        Some("/borrowed/")
    );

    // The renewal wrote the due date and nothing else
    let response = client
        .get(format!("{}/books/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let renewed = body["instances"]
        .as_array()
        .expect("No instances array")
        .iter()
        .find(|i| i["id"] == Value::String(instance_id.clone()))
        .expect("Renewed copy missing from book detail")
        .clone();

    assert_eq!(renewed["status"], "on_loan");
    assert_eq!(renewed["borrower_id"], borrower_id);
    assert_eq!(renewed["due_back"], proposed);
}

#[tokio::test]
#[ignore]
async fn test_renew_requires_permission() {
    let client = Client::new();
    let token = get_auth_token(&client, "member", "member").await;

    let response = client
        .get(format!(
            "{}/book/00000000-0000-0000-0000-000000000000/renew/",
            BASE_URL
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
