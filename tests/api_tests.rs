//! API integration tests
//!
//! These run against a live server with a clean database:
//! `cargo test -- --ignored`

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";
const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Create a user and return its id; email is salted to keep runs independent
async fn create_user(client: &Client, name: &str, email: &str) -> i64 {
    let salt = unique_nanos();
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "name": name,
            "email": format!("{}-{}", salt, email)
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user ID")
}

/// Create an item owned by `owner_id` and return its id
async fn create_item(client: &Client, owner_id: i64, name: &str, available: bool) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for borrowing", name),
            "available": available
        }))
        .send()
        .await
        .expect("Failed to send create item request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("No item ID")
}

/// Book an item one to two days from now and return the booking id
async fn create_booking(client: &Client, booker_id: i64, item_id: i64) -> i64 {
    let now = Utc::now();
    let start = (now + Duration::days(1)).to_rfc3339();
    let end = (now + Duration::days(2)).to_rfc3339();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, booker_id)
        .json(&json!({
            "item_id": item_id,
            "start": start,
            "end": end
        }))
        .send()
        .await
        .expect("Failed to send create booking request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(body["status"], "WAITING");
    body["id"].as_i64().expect("No booking ID")
}

fn unique_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

#[tokio::test]
#[ignore]
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
async fn test_missing_user_header_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_blank_name_defaults_to_email() {
    let client = Client::new();
    let salt = unique_nanos();
    let email = format!("{}-noname@example.com", salt);

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], body["email"]);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let salt = unique_nanos();
    let email = format!("{}-dup@example.com", salt);

    let first = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "First", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 201);

    let second = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "Second", "email": email }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_search_excludes_unavailable_items() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "search-owner@example.com").await;

    let salt = unique_nanos();
    let name = format!("Drill-{}", salt);
    let listed = create_item(&client, owner, &name, true).await;
    let _hidden = create_item(&client, owner, &name, false).await;

    let response = client
        .get(format!("{}/items/search", BASE_URL))
        .query(&[("text", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body.as_array().expect("Expected an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(listed));
}

#[tokio::test]
#[ignore]
async fn test_blank_search_returns_nothing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search", BASE_URL))
        .query(&[("text", " ")])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_booking_unavailable_item_fails() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "unavail-owner@example.com").await;
    let renter = create_user(&client, "Renter", "unavail-renter@example.com").await;
    let item = create_item(&client, owner, "Broken ladder", false).await;

    let now = Utc::now();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_ID_HEADER, renter)
        .json(&json!({
            "item_id": item,
            "start": (now + Duration::days(1)).to_rfc3339(),
            "end": (now + Duration::days(2)).to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Nothing was persisted for the renter
    let response = client
        .get(format!("{}/bookings?state=ALL", BASE_URL))
        .header(USER_ID_HEADER, renter)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_user_partial_update_merges_fields() {
    let client = Client::new();
    let user = create_user(&client, "Original", "merge-user@example.com").await;

    let current: Value = client
        .get(format!("{}/users/{}", BASE_URL, user))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse user");
    let email = current["email"].as_str().unwrap().to_string();

    // Patching the name leaves the email untouched
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user))
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"].as_str(), Some(email.as_str()));

    // A blank name in the patch is ignored
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, user))
        .json(&json!({ "name": " " }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed");
}

#[tokio::test]
#[ignore]
async fn test_user_update_to_taken_email_conflicts() {
    let client = Client::new();
    let first = create_user(&client, "First", "taken-first@example.com").await;
    let second = create_user(&client, "Second", "taken-second@example.com").await;

    let first_email: Value = client
        .get(format!("{}/users/{}", BASE_URL, first))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse user");

    let response = client
        .patch(format!("{}/users/{}", BASE_URL, second))
        .json(&json!({ "email": first_email["email"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Re-submitting a user's own email is not a conflict
    let response = client
        .patch(format!("{}/users/{}", BASE_URL, first))
        .json(&json!({ "email": first_email["email"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "lifecycle-owner@example.com").await;
    let renter = create_user(&client, "Renter", "lifecycle-renter@example.com").await;
    let stranger = create_user(&client, "Stranger", "lifecycle-stranger@example.com").await;
    let item = create_item(&client, owner, "Pressure washer", true).await;

    let booking = create_booking(&client, renter, item).await;

    // Approval by someone other than the owner is forbidden
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking))
        .header(USER_ID_HEADER, renter)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Owner approves
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "APPROVED");

    // A second approval always conflicts
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // Booker and owner can read the booking, a stranger cannot
    for reader in [renter, owner] {
        let response = client
            .get(format!("{}/bookings/{}", BASE_URL, booking))
            .header(USER_ID_HEADER, reader)
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking))
        .header(USER_ID_HEADER, stranger)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_renter_bookings_are_listed_newest_start_first() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "list-owner@example.com").await;
    let renter = create_user(&client, "Renter", "list-renter@example.com").await;
    let first_item = create_item(&client, owner, "Tent", true).await;
    let second_item = create_item(&client, owner, "Canoe", true).await;

    let first = create_booking(&client, renter, first_item).await;
    let second = create_booking(&client, renter, second_item).await;

    let response = client
        .get(format!("{}/bookings?state=ALL", BASE_URL))
        .header(USER_ID_HEADER, renter)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let bookings = body.as_array().expect("Expected an array");
    assert_eq!(bookings.len(), 2);

    let ids: Vec<i64> = bookings
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));

    let starts: Vec<&str> = bookings
        .iter()
        .map(|b| b["start"].as_str().unwrap())
        .collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(starts, sorted);
}

#[tokio::test]
#[ignore]
async fn test_owner_items_carry_next_booking_hint() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "hint-owner@example.com").await;
    let renter = create_user(&client, "Renter", "hint-renter@example.com").await;
    let item = create_item(&client, owner, "Projector", true).await;

    create_booking(&client, renter, item).await;

    let response = client
        .get(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"].as_i64() == Some(item))
        .expect("Item missing from owner listing");

    // The booking starts tomorrow, so it shows up as next, not last
    assert!(entry["next_booking"].is_string());
    assert!(entry["last_booking"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_completed_booking() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "comment-owner@example.com").await;
    let renter = create_user(&client, "Renter", "comment-renter@example.com").await;
    let item = create_item(&client, owner, "Sander", true).await;

    // The renter's booking has not even started yet
    create_booking(&client, renter, item).await;

    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_ID_HEADER, renter)
        .json(&json!({ "text": "Great tool" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_request_board_flow() {
    let client = Client::new();
    let requester = create_user(&client, "Requester", "board-requester@example.com").await;
    let owner = create_user(&client, "Owner", "board-owner@example.com").await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_ID_HEADER, requester)
        .json(&json!({ "description": "Looking for a telescope" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let request_id = body["id"].as_i64().expect("No request ID");

    // The owner lists an item against the request
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_ID_HEADER, owner)
        .json(&json!({
            "name": "Telescope",
            "description": "8-inch reflector",
            "available": true,
            "request_id": request_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // The request now carries its fulfilling item
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_ID_HEADER, requester)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));

    // Visible to others under /requests/all, not under their own /requests
    let response = client
        .get(format!("{}/requests/all", BASE_URL))
        .header(USER_ID_HEADER, owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let listed = body
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"].as_i64() == Some(request_id));
    assert!(listed);
}

#[tokio::test]
#[ignore]
async fn test_item_update_is_owner_only() {
    let client = Client::new();
    let owner = create_user(&client, "Owner", "patch-owner@example.com").await;
    let other = create_user(&client, "Other", "patch-other@example.com").await;
    let item = create_item(&client, owner, "Bike", true).await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_ID_HEADER, other)
        .json(&json!({ "available": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Partial update by the owner leaves other fields intact
    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_ID_HEADER, owner)
        .json(&json!({ "available": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Bike");
    assert_eq!(body["available"], false);
}
