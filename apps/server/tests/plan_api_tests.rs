//! HTTP-level tests for the plan API: conditional writes, additive merge,
//! search projection, and lifecycle events.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::*;

#[tokio::test]
async fn create_then_read_returns_deep_equal_plan_with_same_etag() {
    let app = test_app().await;
    let plan = sample_plan("p1");

    let (status, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(plan.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let create_etag = etag(&headers);

    let (status, headers, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(etag(&headers), create_etag);
    assert_eq!(json_body(&body), plan);
}

#[tokio::test]
async fn duplicate_create_conflicts_and_keeps_the_first_aggregate() {
    let app = test_app().await;

    let (status, _, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut second = sample_plan("p1");
    second["planType"] = json!("outOfNetwork");
    let (status, _, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(second))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, _, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(json_body(&body)["planType"], "inNetwork");
}

#[tokio::test]
async fn invalid_plan_is_rejected_with_issue_list() {
    let app = test_app().await;

    let mut plan = sample_plan("p1");
    plan["_org"] = json!("not a hostname!");
    let (status, _, body) = app.request(Method::POST, "/v1/plan", &[], Some(plan)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    // Structurally broken body (missing planCostShares) is also a 400.
    let broken = json!({ "objectId": "p2" });
    let (status, _, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(broken))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored either time.
    let (status, _, _) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_missing_plan_is_not_found() {
    let app = test_app().await;
    let (status, _, _) = app.request(Method::GET, "/v1/plan/ghost", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conditional_read_returns_not_modified_on_matching_token() {
    let app = test_app().await;

    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let token = etag(&headers);

    let (status, headers, body) = app
        .request(
            Method::GET,
            "/v1/plan/p1",
            &[("if-none-match", &token)],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_MODIFIED);
    assert_eq!(etag(&headers), token);
    assert!(body.is_empty());
}

#[tokio::test]
async fn update_without_token_is_precondition_required_and_changes_nothing() {
    let app = test_app().await;

    app.request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;

    let (status, _, _) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[],
            Some(json!({ "linkedPlanServices": [sample_service("s1")] })),
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);

    let (_, _, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(json_body(&body)["linkedPlanServices"], json!([]));
}

#[tokio::test]
async fn update_with_stale_token_fails_and_carries_the_current_token() {
    let app = test_app().await;

    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let current = etag(&headers);

    let (status, headers, _) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[("if-match", "\"stale\"")],
            Some(json!({ "linkedPlanServices": [sample_service("s1")] })),
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(etag(&headers), current);

    let (_, _, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(json_body(&body)["linkedPlanServices"], json!([]));
}

#[tokio::test]
async fn update_appends_then_repeating_it_is_a_no_op() {
    let app = test_app().await;

    // Create with no linked services; token T1.
    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let t1 = etag(&headers);

    // Add s1 under T1; token moves to T2.
    let (status, headers, body) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[("if-match", &t1)],
            Some(json!({ "linkedPlanServices": [sample_service("s1")] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let t2 = etag(&headers);
    assert_ne!(t2, t1);
    let merged = json_body(&body);
    assert_eq!(merged["linkedPlanServices"].as_array().unwrap().len(), 1);

    // Same s1 under T2: distinct no-op outcome, token unchanged.
    let (status, headers, body) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[("if-match", &t2)],
            Some(json!({ "linkedPlanServices": [sample_service("s1")] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["added"], 0);
    assert_eq!(etag(&headers), t2);

    let (_, _, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(
        json_body(&body)["linkedPlanServices"].as_array().unwrap().len(),
        1
    );
}

#[tokio::test]
async fn update_with_mixed_duplicates_appends_only_novel_entries() {
    let app = test_app().await;

    let mut plan = sample_plan("p1");
    plan["linkedPlanServices"] = json!([sample_service("s1")]);
    let (_, headers, _) = app.request(Method::POST, "/v1/plan", &[], Some(plan)).await;
    let token = etag(&headers);

    let (status, _, body) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[("if-match", &token)],
            Some(json!({
                "linkedPlanServices": [sample_service("s1"), sample_service("s2")]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let merged = json_body(&body);
    let ids: Vec<&str> = merged["linkedPlanServices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["objectId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s1", "s2"]);

    // Re-read to confirm persistence of the merge.
    let (_, _, body) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(
        json_body(&body)["linkedPlanServices"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn update_body_must_be_a_linked_service_array() {
    let app = test_app().await;

    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let token = etag(&headers);

    for body in [
        json!({}),
        json!({ "linkedPlanServices": "nope" }),
        json!({ "linkedPlanServices": [{ "objectId": "s1" }] }),
    ] {
        let (status, _, _) = app
            .request(
                Method::PATCH,
                "/v1/plan/p1",
                &[("if-match", &token)],
                Some(body),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn update_reports_missing_plan_before_body_shape() {
    let app = test_app().await;

    let (status, _, _) = app
        .request(
            Method::PATCH,
            "/v1/plan/ghost",
            &[("if-match", "\"t\"")],
            Some(json!({ "linkedPlanServices": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_reports_missing_token_before_body_shape() {
    let app = test_app().await;

    app.request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;

    let (status, _, _) = app
        .request(Method::PATCH, "/v1/plan/p1", &[], Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);

    // A stale token likewise wins over the malformed body.
    let (status, _, _) = app
        .request(
            Method::PATCH,
            "/v1/plan/p1",
            &[("if-match", "\"stale\"")],
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn delete_with_matching_token_removes_plan_and_parent_document() {
    let app = test_app().await;

    let mut plan = sample_plan("p1");
    plan["linkedPlanServices"] = json!([sample_service("s1")]);
    let (_, headers, _) = app.request(Method::POST, "/v1/plan", &[], Some(plan)).await;
    let token = etag(&headers);
    assert!(app.search.document("p1").is_some());

    let (status, _, _) = app
        .request(Method::DELETE, "/v1/plan/p1", &[("if-match", &token)], None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.search.document("p1").is_none());

    // Deleting again: the identifier no longer resolves.
    let (status, _, _) = app
        .request(Method::DELETE, "/v1/plan/p1", &[("if-match", &token)], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_a_matching_token() {
    let app = test_app().await;

    app.request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;

    let (status, _, _) = app.request(Method::DELETE, "/v1/plan/p1", &[], None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let (status, _, _) = app
        .request(
            Method::DELETE,
            "/v1/plan/p1",
            &[("if-match", "\"stale\"")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let (status, _, _) = app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_projects_the_full_join_family() {
    let app = test_app().await;

    let mut plan = sample_plan("p1");
    plan["linkedPlanServices"] = json!([sample_service("s1")]);
    app.request(Method::POST, "/v1/plan", &[], Some(plan)).await;

    // Parent, one child, two grandchildren, all routed to the plan id.
    assert_eq!(
        app.search.ids_routed_to("p1"),
        vec!["p1", "s1", "s1-cs", "s1-ref"]
    );
}

#[tokio::test]
async fn lifecycle_events_are_published_per_action() {
    let app = test_app().await;

    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let token = etag(&headers);
    app.request(Method::GET, "/v1/plan/p1", &[], None).await;
    app.request(Method::DELETE, "/v1/plan/p1", &[("if-match", &token)], None)
        .await;

    app.wait_for_events(3).await;
    let topics: Vec<String> = app
        .events
        .messages()
        .into_iter()
        .map(|(topic, _)| topic)
        .collect();
    assert_eq!(topics, vec!["plan.created", "plan.accessed", "plan.deleted"]);
}

#[tokio::test]
async fn conditional_read_with_matching_token_publishes_no_access_event() {
    let app = test_app().await;

    let (_, headers, _) = app
        .request(Method::POST, "/v1/plan", &[], Some(sample_plan("p1")))
        .await;
    let token = etag(&headers);
    app.wait_for_events(1).await;

    app.request(
        Method::GET,
        "/v1/plan/p1",
        &[("if-none-match", &token)],
        None,
    )
    .await;

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.events.messages().len(), 1);
}
