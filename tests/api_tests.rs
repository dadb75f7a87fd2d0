//! End-to-end page tests
//!
//! These run against a live server with a migrated database:
//! run with `cargo test -- --ignored` while the server listens on :8080.

use reqwest::{redirect::Policy, Client, StatusCode};

const BASE_URL: &str = "http://localhost:8080";

/// Client that surfaces redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value =
        serde_json::from_str(&response.text().await.expect("Failed to read body"))
            .expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_home_redirects_to_books() {
    let response = client()
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/books");
}

#[tokio::test]
#[ignore]
async fn test_create_then_list() {
    let http = client();

    let response = http
        .post(format!("{}/books/new", BASE_URL))
        .form(&[
            ("title", "Dune"),
            ("author", "Frank Herbert"),
            ("genre", "Science Fiction"),
            ("year", "1965"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/books");

    let page = http
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(page.contains("Dune"));
    assert!(page.contains("Frank Herbert"));
}

#[tokio::test]
#[ignore]
async fn test_create_with_empty_title_redisplays_the_form() {
    let response = client()
        .post(format!("{}/books/new", BASE_URL))
        .form(&[("title", ""), ("author", "Frank Herbert")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let page = response.text().await.expect("Failed to read body");
    assert!(page.contains("Please provide a value for &quot;title&quot;."));
    assert!(page.contains("value=\"Frank Herbert\""));
}

#[tokio::test]
#[ignore]
async fn test_search_by_title_substring() {
    let page = client()
        .get(format!("{}/search?s=Dune", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(page.contains("Search Results"));
    assert!(page.contains("Dune"));
}

#[tokio::test]
#[ignore]
async fn test_search_by_year() {
    let page = client()
        .get(format!("{}/search?s=1965", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(page.contains("Dune"));
}

#[tokio::test]
#[ignore]
async fn test_search_with_no_match_renders_empty_list() {
    let page = client()
        .get(format!("{}/search?s=xyzzy-no-such-book", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(page.contains("No books found."));
}

#[tokio::test]
#[ignore]
async fn test_missing_book_renders_not_found_page() {
    let response = client()
        .get(format!("{}/books/99999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = response.text().await.expect("Failed to read body");
    assert!(page.contains("Page Not Found"));
}

#[tokio::test]
#[ignore]
async fn test_delete_of_missing_book_is_not_found() {
    let response = client()
        .post(format!("{}/books/99999999/delete", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_unmatched_route_renders_not_found_page() {
    let response = client()
        .get(format!("{}/no/such/page", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
