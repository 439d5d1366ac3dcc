//! API integration tests
//!
//! These run against a live server at localhost:8080 whose database holds a
//! `librarian` user (password `librarian`) granted the three catalog
//! permissions. Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated token for the librarian fixture user
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/accounts/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "librarian"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create an author, book and copy to exercise the loan workflow.
/// Returns the copy's UUID.
async fn create_borrowed_copy(client: &Client, token: &str, due_in_days: i64) -> String {
    let author: Value = client
        .post(format!("{}/catalog/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"first_name": "John", "last_name": "Smith"}))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse author");

    let book: Value = client
        .post(format!("{}/catalog/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Book Title",
            "summary": "My book summary",
            "isbn": "ABCDEFG",
            "author_id": author["id"]
        }))
        .send()
        .await
        .expect("Failed to create book")
        .json()
        .await
        .expect("Failed to parse book");

    let me: Value = client
        .get(format!("{}/accounts/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to get identity")
        .json()
        .await
        .expect("Failed to parse identity");

    let due_back = (Utc::now().date_naive() + Duration::days(due_in_days)).to_string();
    let copy: Value = client
        .post(format!("{}/catalog/books/{}/instances", BASE_URL, book["id"]))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "imprint": "Unlikely Imprint, 2016",
            "status": "on_loan",
            "due_back": due_back,
            "borrower_id": me["id"]
        }))
        .send()
        .await
        .expect("Failed to create copy")
        .json()
        .await
        .expect("Failed to parse copy");

    copy["id"].as_str().expect("No copy id").to_string()
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

    let response = client
        .post(format!("{}/accounts/login", BASE_URL))
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
        .post(format!("{}/accounts/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_counts() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_number());
    assert!(body["num_instances"].is_number());
    assert!(body["num_instances_available"].is_number());
    assert!(body["num_authors"].is_number());
    assert!(body["num_visits"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_borrowed_list_redirects_to_login() {
    // Follow no redirects so the 302 and its destination are observable
    let client = Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client
        .get(format!("{}/catalog/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header");
    assert!(location.starts_with("/api/v1/accounts/login"));
    assert!(location.contains("next=/api/v1/catalog/loans/mine"));
}

#[tokio::test]
#[ignore]
async fn test_author_list_pagination_is_ten() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Thirteen authors guarantee at least two pages
    for n in 0..13 {
        let response = client
            .post(format!("{}/catalog/authors", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "first_name": format!("Christian {}", n),
                "last_name": format!("Surname {}", n)
            }))
            .send()
            .await
            .expect("Failed to create author");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: Value = client
        .get(format!("{}/catalog/authors?page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to list authors")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["is_paginated"], true);
    assert_eq!(body["per_page"], 10);
    assert!(body["total"].as_i64().unwrap() >= 13);

    let last_page = body["num_pages"].as_i64().unwrap();
    let body: Value = client
        .get(format!("{}/catalog/authors?page={}", BASE_URL, last_page))
        .send()
        .await
        .expect("Failed to list authors")
        .json()
        .await
        .expect("Failed to parse response");

    let remainder = body["items"].as_array().unwrap().len() as i64;
    assert!(remainder >= 1 && remainder <= 10);
    assert_eq!(
        body["total"].as_i64().unwrap(),
        (last_page - 1) * 10 + remainder
    );
}

#[tokio::test]
#[ignore]
async fn test_author_create_requires_login() {
    let client = Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client
        .post(format!("{}/catalog/authors", BASE_URL))
        .json(&json!({"first_name": "Juan", "last_name": "Perez"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
#[ignore]
async fn test_renewal_form_defaults_three_weeks_out() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let copy_id = create_borrowed_copy(&client, &token, 5).await;

    let response = client
        .get(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let expected = (Utc::now().date_naive() + Duration::weeks(3)).to_string();
    assert_eq!(body["due_back"], expected.as_str());
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_renewal_accepts_two_weeks_and_points_at_all_borrowed() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let copy_id = create_borrowed_copy(&client, &token, 5).await;

    let proposed = (Utc::now().date_naive() + Duration::weeks(2)).to_string();
    let response = client
        .post(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"due_back": proposed}))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due_back"], proposed.as_str());
    assert_eq!(body["next"], "/api/v1/catalog/loans");

    // The committed date is visible on the next form presentation
    let form: Value = client
        .get(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["instance"]["due_back"], proposed.as_str());
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejects_past_and_far_future_dates() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let copy_id = create_borrowed_copy(&client, &token, 5).await;
    let original_due = (Utc::now().date_naive() + Duration::days(5)).to_string();

    // A week in the past
    let proposed = (Utc::now().date_naive() - Duration::weeks(1)).to_string();
    let body: Value = client
        .post(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"due_back": proposed}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["errors"][0]["field"], "due_back");
    assert_eq!(body["errors"][0]["message"], "Invalid date - renewal in past");

    // Five weeks ahead
    let proposed = (Utc::now().date_naive() + Duration::weeks(5)).to_string();
    let body: Value = client
        .post(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({"due_back": proposed}))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        body["errors"][0]["message"],
        "Invalid date - renewal more than 4 weeks ahead"
    );

    // The copy is untouched after both rejections
    let form: Value = client
        .get(format!("{}/catalog/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["instance"]["due_back"], original_due.as_str());
}

#[tokio::test]
#[ignore]
async fn test_renewal_of_unknown_copy_is_404_even_with_permission() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let unknown = uuid::Uuid::new_v4();
    let response = client
        .get(format!("{}/catalog/instances/{}/renew", BASE_URL, unknown))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_lists_only_on_loan_copies() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let on_loan_id = create_borrowed_copy(&client, &token, 3).await;

    let body: Value = client
        .get(format!("{}/catalog/loans/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let items = body["items"].as_array().unwrap();
    assert!(items.iter().any(|c| c["id"] == on_loan_id.as_str()));
    // Ascending due-back order within the page
    let dates: Vec<&str> = items.iter().map(|c| c["due_back"].as_str().unwrap()).collect();
    for window in dates.windows(2) {
        assert!(window[0] <= window[1]);
    }
}

#[tokio::test]
#[ignore]
async fn test_all_borrowed_is_sorted_across_pages() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Enough copies to span two pages, with interleaved due dates
    for n in 0..12 {
        create_borrowed_copy(&client, &token, n % 5).await;
    }

    let mut page = 1;
    let mut previous: Option<String> = None;
    loop {
        let body: Value = client
            .get(format!("{}/catalog/loans?page={}", BASE_URL, page))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");

        for copy in body["items"].as_array().unwrap() {
            let due = copy["due_back"].as_str().unwrap().to_string();
            if let Some(ref prev) = previous {
                assert!(prev <= &due, "page {} breaks due-back ordering", page);
            }
            previous = Some(due);
        }

        if page >= body["num_pages"].as_i64().unwrap() {
            break;
        }
        page += 1;
    }
}
