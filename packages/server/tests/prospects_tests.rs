//! Integration tests for saved prospects.
//!
//! POST /api/prospects, GET /api/prospects, DELETE /api/prospects/:company_id

mod common;

use crate::common::{company, TestHarness};
use axum::http::StatusCode;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestHarness)]
#[tokio::test]
async fn save_list_and_delete_prospect(ctx: &TestHarness) {
    let acme = company("Acme");
    ctx.seed(&[acme.clone()]).await;

    let (status, body) = ctx
        .post_json("/api/prospects", json!({"company_id": acme.id}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Prospect saved successfully");
    assert_eq!(body["data"]["company_id"], acme.id.to_string());

    let (status, body) = ctx.get("/api/prospects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["company"]["name"], "Acme");

    let (status, body) = ctx.delete(&format!("/api/prospects/{}", acme.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Prospect deleted successfully");

    let (_, body) = ctx.get("/api/prospects").await;
    assert_eq!(body["data"], json!([]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_save_is_rejected(ctx: &TestHarness) {
    let acme = company("Acme");
    ctx.seed(&[acme.clone()]).await;

    ctx.post_json("/api/prospects", json!({"company_id": acme.id}))
        .await;
    let (status, body) = ctx
        .post_json("/api/prospects", json!({"company_id": acme.id}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Company already saved as prospect");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn saving_unknown_company_is_not_found(ctx: &TestHarness) {
    for id in [json!(Uuid::now_v7()), json!("not-a-uuid")] {
        let (status, body) = ctx
            .post_json("/api/prospects", json!({"company_id": id}))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Company not found");
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_body_field_is_bad_request(ctx: &TestHarness) {
    let (status, body) = ctx.post_json("/api/prospects", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_unsaved_prospect_is_not_found(ctx: &TestHarness) {
    let (status, body) = ctx
        .delete(&format!("/api/prospects/{}", Uuid::now_v7()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Prospect not found");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn prospects_are_listed_newest_first(ctx: &TestHarness) {
    let first = company("First");
    let second = company("Second");
    ctx.seed(&[first.clone(), second.clone()]).await;

    ctx.post_json("/api/prospects", json!({"company_id": first.id}))
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ctx.post_json("/api/prospects", json!({"company_id": second.id}))
        .await;

    let (_, body) = ctx.get("/api/prospects").await;
    assert_eq!(body["data"][0]["company"]["name"], "Second");
    assert_eq!(body["data"][1]["company"]["name"], "First");
}
