// Contract tests for the entity HTTP surface
//
// Every entity is served from the same generic handlers; these tests pin
// the status codes and error body shapes callers rely on.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use cane_registry::core::traits::QueryExecutor;
use cane_registry::modules::{configure_api, health};
use helpers::*;

macro_rules! init_app {
    ($executor:expr) => {{
        let executor: Arc<dyn QueryExecutor> = $executor;
        test::init_service(
            App::new()
                .app_data(web::Data::new(executor.clone()))
                .configure(health::configure)
                .configure(|cfg| configure_api(cfg, &executor)),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_create_returns_created_entity() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::post()
        .uri("/api/associations")
        .set_json(json!({
            "name": "NOSPA",
            "dues_frequency": "annual",
            "member_count": 120
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "NOSPA");
    assert_eq!(body["dues_frequency"], "annually");
    assert_eq!(body["member_count"], 120);
    assert_eq!(body["status"], "active");
    assert!(body.get("created_at").is_some());
    assert!(body.get("updated_at").is_some());
}

#[actix_web::test]
async fn test_duplicate_returns_bad_request_with_field() {
    let app = init_app!(create_test_executor().await);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/sugar-mills")
            .set_json(json!({ "name": "Ursumco", "plant_code": "URS", "capacity": 8000 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], 400);
            assert_eq!(body["error"]["field"], "plant_code");
            assert!(body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("already exists"));
        }
    }
}

#[actix_web::test]
async fn test_non_object_body_is_bad_request() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::post()
        .uri("/api/valid-id-types")
        .set_json(json!(["Passport"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].get("field").is_none());
}

#[actix_web::test]
async fn test_missing_entity_returns_not_found() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::get().uri("/api/planters/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Planter not found");
    assert_eq!(body["error"]["code"], 404);

    let req = test::TestRequest::get()
        .uri("/api/user-profiles/by-key/nobody@registry.ph")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_blocked_hard_delete_returns_conflict() {
    let executor = create_test_executor().await;
    let app = init_app!(executor.clone());

    let req = test::TestRequest::post()
        .uri("/api/associations")
        .set_json(json!({ "name": "NOSPA" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let association_id = created["id"].as_i64().unwrap();

    insert_equipment(&executor, "trucks", association_id).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/associations/{}/hard", association_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], 409);
    assert_eq!(
        body["error"]["blocking"],
        json!([{ "category": "equipment", "count": 1 }])
    );
}

#[actix_web::test]
async fn test_soft_delete_returns_no_content() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::post()
        .uri("/api/planters")
        .set_json(json!({ "first_name": "Juan", "last_name": "Dela Cruz" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/planters/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/planters/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "inactive");

    let req = test::TestRequest::get()
        .uri("/api/planters?status=active")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_planters_have_no_hard_delete_route() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::delete()
        .uri("/api/planters/1/hard")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_empty_patch_is_bad_request() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::post()
        .uri("/api/planters")
        .set_json(json!({ "first_name": "Juan", "last_name": "Dela Cruz" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/planters/{}", id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "Validation error: No planter fields to update");
}

#[actix_web::test]
async fn test_list_rejects_bad_query_parameters() {
    let app = init_app!(create_test_executor().await);

    for uri in [
        "/api/planters?limit=ten",
        "/api/planters?status=archived",
        "/api/planters?nickname=JD",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_web::test]
async fn test_statistics_shape() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::post()
        .uri("/api/planters")
        .set_json(json!({
            "first_name": "Juan",
            "last_name": "Dela Cruz",
            "gender": "m",
            "farm_size": 4.25
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/planters/statistics")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["active"], 1);
    assert_eq!(body["inactive"], 0);
    assert_eq!(body["byGender"], json!({ "male": 1 }));
    assert_eq!(body["byAssociation"], json!({ "unassigned": 1 }));
    assert_eq!(body["totalFarmSize"].as_f64(), Some(4.25));
}

#[actix_web::test]
async fn test_health_reports_database() {
    let app = init_app!(create_test_executor().await);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"], "healthy");
}
