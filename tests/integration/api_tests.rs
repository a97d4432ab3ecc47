// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use billbrief::infrastructure::database::entities::{subscription, user_query};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn index_lists_at_most_five_bills() {
    let app = create_test_app(7, false).await;

    let response = app.server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Bill 1"));
    assert!(html.contains("Bill 5"));
    assert!(!html.contains("Bill 6"));
    assert!(html.contains("action=\"/subscribe\""));
}

#[tokio::test]
async fn interact_page_renders_with_empty_store() {
    let app = create_test_app(0, false).await;

    let response = app.server.get("/interact").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("No bills have been collected yet."));
}

#[tokio::test]
async fn interact_json_records_question_and_answers() {
    let app = create_test_app(3, false).await;

    let response = app
        .server
        .post("/interact_json")
        .json(&json!({ "message": "Which bills cover deepfakes?" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<String>(), "Answer drawn from 3 bills.");

    let stored = user_query::Entity::find()
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].query_text, "Which bills cover deepfakes?");

    let requests = app.llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0]["messages"][1]["content"],
        "Answer the question based on the bill summaries: Which bills cover deepfakes?"
    );
}

#[tokio::test]
async fn subscribe_stores_email_and_redirects() {
    let app = create_test_app(2, false).await;

    let response = app
        .server
        .post("/subscribe")
        .form(&[("email", "reader@example.com")])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/interact");
    assert_eq!(
        subscription::Entity::find()
            .count(app.db.as_ref())
            .await
            .unwrap(),
        1
    );
    assert_eq!(*app.mailer.sent.lock().unwrap(), vec!["reader@example.com"]);
}

#[tokio::test]
async fn subscribe_without_email_fails() {
    let app = create_test_app(0, false).await;

    let response = app
        .server
        .post("/subscribe")
        .form(&[("name", "no email")])
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Subscription failed");
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn subscribe_with_malformed_email_is_rejected() {
    let app = create_test_app(0, false).await;

    let response = app
        .server
        .post("/subscribe")
        .form(&[("email", "not-an-email")])
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_subscription_conflicts_when_unique() {
    let app = create_test_app(0, true).await;

    app.server
        .post("/subscribe")
        .form(&[("email", "reader@example.com")])
        .await;
    let response = app
        .server
        .post("/subscribe")
        .form(&[("email", "reader@example.com")])
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_subscription_allowed_by_default() {
    let app = create_test_app(0, false).await;

    for _ in 0..2 {
        let response = app
            .server
            .post("/subscribe")
            .form(&[("email", "reader@example.com")])
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    }
    assert_eq!(app.mailer.sent.lock().unwrap().len(), 2);
}
