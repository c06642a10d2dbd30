//! HTTP API tests
//!
//! The router is served in-process by axum-test, backed by the in-memory
//! history store and a static extractor.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_claims::adapters::{InMemoryHistoryStore, StaticExtractor};
use domain_claims::{ClaimExtractor, HistoryStore};
use interface_api::config::ApiConfig;
use interface_api::create_router;
use test_utils::{ClaimTextFixtures, FieldsBuilder, ReplyFixtures};

fn server_with(extractor: Arc<dyn ClaimExtractor>, store: Arc<InMemoryHistoryStore>) -> TestServer {
    let store: Arc<dyn HistoryStore> = store;
    TestServer::new(create_router(extractor, store, ApiConfig::default()))
        .expect("Failed to start test server")
}

fn server(reply: impl Into<String>) -> (TestServer, Arc<InMemoryHistoryStore>) {
    let store = Arc::new(InMemoryHistoryStore::new());
    let server = server_with(Arc::new(StaticExtractor::replying(reply)), store.clone());
    (server, store)
}

async fn extract(server: &TestServer, claim_text: &str) -> Value {
    let response = server
        .post("/api/v1/claims/extract")
        .json(&json!({ "claim_text": claim_text }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (server, _) = server(ReplyFixtures::example(0));
        let response = server.get("/api/v1/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_store_health() {
        let (server, store) = server(ReplyFixtures::example(0));

        let response = server.get("/api/v1/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["store"]["status"], "healthy");

        store.set_unavailable(true);
        let response = server.get("/api/v1/health/ready").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_request_id_is_returned() {
        let (server, _) = server(ReplyFixtures::example(0));
        let response = server.get("/api/v1/health").await;
        assert!(!response.header("x-request-id").is_empty());
    }
}

mod extract_tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_stores_claim() {
        let (server, store) = server(ReplyFixtures::fenced_example(2));
        let body = extract(&server, ClaimTextFixtures::kitchen_fire()).await;

        assert!(body["record_id"].is_i64());
        assert_eq!(body["fields"]["loss_type"], "Fire");
        assert_eq!(body["completeness"]["percentage"], 100.0);
        assert_eq!(body["highlights"]["status"], "marked");
        assert!(body["warnings"].as_array().unwrap().is_empty());
        assert!(!body["recommendations"].as_array().unwrap().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_claim_rejected() {
        let (server, store) = server(ReplyFixtures::example(0));
        let response = server
            .post("/api/v1/claims/extract")
            .json(&json!({ "claim_text": "   " }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "empty_claim");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_bad_gateway() {
        let store = Arc::new(InMemoryHistoryStore::new());
        let server = server_with(Arc::new(StaticExtractor::failing("gemini")), store.clone());

        let response = server
            .post("/api/v1/claims/extract")
            .json(&json!({ "claim_text": ClaimTextFixtures::water_leak() }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.json::<Value>()["error"], "extraction_failure");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_parse_failure_returns_raw_reply() {
        let (server, store) = server(ReplyFixtures::not_json());
        let response = server
            .post("/api/v1/claims/extract")
            .json(&json!({ "claim_text": ClaimTextFixtures::water_leak() }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "parse_failure");
        assert_eq!(body["raw_response"], ReplyFixtures::not_json());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_fields_reported_as_warning() {
        let (server, _) = server(ReplyFixtures::partial());
        let body = extract(&server, "Phone stolen on the bus").await;

        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0]["kind"], "missing_fields");
        assert_eq!(body["completeness"]["percentage"], 25.0);
    }

    #[tokio::test]
    async fn test_completeness_same_after_read_back() {
        let reply = FieldsBuilder::complete().severity("Severe").to_reply();
        let (server, _) = server(reply);
        let created = extract(&server, "Storm tore the roof off").await;
        assert_eq!(created["completeness"]["percentage"], 87.5);

        let id = created["record_id"].as_i64().unwrap();
        let detail = server.get(&format!("/api/v1/claims/{id}")).await.json::<Value>();
        assert_eq!(detail["completeness"], created["completeness"]);
    }

    #[tokio::test]
    async fn test_runaway_highlighting_is_skipped() {
        let reply = FieldsBuilder::complete()
            .explanation("'o' 'r' 'd' 'e' 'c' 'l' 'a' 's' 'p' 'n' 't' 'g'")
            .to_reply();
        let (server, _) = server(reply);
        let created = extract(&server, "o").await;

        assert_eq!(created["highlights"]["status"], "skipped");
        assert_eq!(created["highlights"]["text"], "o");

        let id = created["record_id"].as_i64().unwrap();
        let detail = server.get(&format!("/api/v1/claims/{id}")).await.json::<Value>();
        assert_eq!(detail["highlights"]["status"], "skipped");
    }

    #[tokio::test]
    async fn test_store_outage_still_returns_result() {
        let store = Arc::new(InMemoryHistoryStore::unavailable());
        let server = server_with(
            Arc::new(StaticExtractor::replying(ReplyFixtures::example(1))),
            store,
        );

        let response = server
            .post("/api/v1/claims/extract")
            .json(&json!({ "claim_text": ClaimTextFixtures::flooded_vehicle() }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert!(body["record_id"].is_null());
        assert_eq!(body["warnings"][0]["kind"], "persistence");
        assert_eq!(body["fields"]["severity"], "Critical");
    }
}

mod history_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_and_search() {
        let (server, _) = server(FieldsBuilder::complete().to_reply());
        extract(&server, "Laptop stolen from a FIRE exit").await;
        extract(&server, "Bike stolen from the porch").await;

        let all = server.get("/api/v1/claims").await.json::<Value>();
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["claim_text"], "Bike stolen from the porch");

        let hits = server
            .get("/api/v1/claims")
            .add_query_param("keyword", "fire")
            .await
            .json::<Value>();
        assert_eq!(hits.as_array().unwrap().len(), 1);

        let limited = server
            .get("/api/v1/claims")
            .add_query_param("limit", 1)
            .await
            .json::<Value>();
        assert_eq!(limited.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_limit_rejected() {
        let (server, _) = server(ReplyFixtures::example(0));
        let response = server.get("/api/v1/claims").add_query_param("limit", 0).await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_get_claim_detail() {
        let (server, _) = server(ReplyFixtures::example(0));
        let created = extract(&server, ClaimTextFixtures::minor_accident()).await;
        let id = created["record_id"].as_i64().unwrap();

        let response = server.get(&format!("/api/v1/claims/{id}")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["id"], id);
        assert_eq!(body["estimated_loss"], "₹7,000");
        assert_eq!(body["completeness"]["filled"], 8);
        assert_eq!(body["has_recommendations"], true);
        assert!(body["highlights"]["keywords"]
            .as_array()
            .unwrap()
            .contains(&json!("minor accident")));

        let prefixed = server.get(&format!("/api/v1/claims/CLM-{id}")).await;
        assert_eq!(prefixed.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let (server, _) = server(ReplyFixtures::example(0));

        let missing = server.get("/api/v1/claims/999").await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<Value>()["error"], "not_found");

        let malformed = server.get("/api/v1/claims/abc").await;
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let (server, store) = server(ReplyFixtures::example(3));
        let first = extract(&server, ClaimTextFixtures::water_leak()).await;
        extract(&server, ClaimTextFixtures::water_leak()).await;
        let id = first["record_id"].as_i64().unwrap();

        let deleted = server.delete(&format!("/api/v1/claims/{id}")).await.json::<Value>();
        assert_eq!(deleted["deleted"], true);

        let again = server.delete(&format!("/api/v1/claims/{id}")).await.json::<Value>();
        assert_eq!(again["deleted"], false);

        let cleared = server.delete("/api/v1/claims").await.json::<Value>();
        assert_eq!(cleared["deleted"], 1);
        assert!(store.is_empty().await);

        let cleared_again = server.delete("/api/v1/claims").await.json::<Value>();
        assert_eq!(cleared_again["deleted"], 0);
    }

    #[tokio::test]
    async fn test_exports() {
        let (server, _) = server(ReplyFixtures::example(0));
        let created = extract(&server, ClaimTextFixtures::minor_accident()).await;
        let id = created["record_id"].as_i64().unwrap();

        let single = server.get(&format!("/api/v1/claims/{id}/export")).await;
        assert_eq!(single.status_code(), StatusCode::OK);
        let disposition = single.header("content-disposition");
        assert!(disposition.to_str().unwrap().contains(&format!("claim_{id}_")));
        assert!(single.text().contains("₹7,000"));
        assert_eq!(single.json::<Value>()["loss_type"], "Accident");

        let history = server.get("/api/v1/claims/export").await;
        assert_eq!(history.status_code(), StatusCode::OK);
        assert!(history
            .header("content-disposition")
            .to_str()
            .unwrap()
            .contains("claims_history_"));
        assert_eq!(history.json::<Value>().as_array().unwrap().len(), 1);
    }
}

mod recommendation_tests {
    use super::*;

    fn ranks(body: &Value) -> Vec<u8> {
        body["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| match r["priority"].as_str().unwrap() {
                "Critical" => 1,
                "High" => 2,
                "Medium" => 3,
                _ => 4,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_recommendations_sorted_for_display() {
        let (server, _) = server(ReplyFixtures::warehouse_fire());
        let created = extract(&server, ClaimTextFixtures::warehouse_fire()).await;
        let id = created["record_id"].as_i64().unwrap();

        let body = server
            .get(&format!("/api/v1/claims/{id}/recommendations"))
            .await
            .json::<Value>();

        let ranks = ranks(&body);
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

        let actions: Vec<&str> = body["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["action"].as_str().unwrap())
            .collect();
        assert!(actions.contains(&"Supervisor Approval Required"));
        assert!(actions.contains(&"Request Fire Department Report"));
    }

    #[tokio::test]
    async fn test_regenerate_replaces_set() {
        let (server, store) = server(ReplyFixtures::example(2));
        let created = extract(&server, ClaimTextFixtures::kitchen_fire()).await;
        let id = created["record_id"].as_i64().unwrap();
        let original = created["recommendations"].as_array().unwrap().len();

        let response = server.post(&format!("/api/v1/claims/{id}/recommendations")).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>()["recommendations"].as_array().unwrap().len(),
            original
        );

        let stored = store
            .get_recommendations(core_kernel::ClaimId::new(id))
            .await
            .unwrap();
        assert_eq!(stored.len(), original);
    }

    #[tokio::test]
    async fn test_recommendations_for_unknown_claim() {
        let (server, _) = server(ReplyFixtures::example(2));

        let get = server.get("/api/v1/claims/77/recommendations").await;
        assert_eq!(get.status_code(), StatusCode::NOT_FOUND);

        let regenerate = server.post("/api/v1/claims/77/recommendations").await;
        assert_eq!(regenerate.status_code(), StatusCode::NOT_FOUND);
    }
}

mod highlight_and_analytics_tests {
    use super::*;

    #[tokio::test]
    async fn test_highlight_endpoint() {
        let (server, _) = server(ReplyFixtures::example(0));
        let response = server
            .post("/api/v1/highlight")
            .json(&json!({
                "text": "customer reported FIRE damage",
                "explanation": "Classified as 'fire'"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["status"], "marked");
        assert!(body["html"].as_str().unwrap().contains(">FIRE</span>"));
    }

    #[tokio::test]
    async fn test_highlight_refuses_runaway_markup() {
        let (server, _) = server(ReplyFixtures::example(0));
        let response = server
            .post("/api/v1/highlight")
            .json(&json!({
                "text": "o",
                "explanation": "'o' 'r' 'd' 'e' 'c' 'l' 'a' 's' 'p' 'n' 't' 'g'"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_highlight_without_quotes() {
        let (server, _) = server(ReplyFixtures::example(0));
        let body = server
            .post("/api/v1/highlight")
            .json(&json!({ "text": "plain text", "explanation": "nothing quoted" }))
            .await
            .json::<Value>();

        assert_eq!(body["status"], "no_keywords");
        assert_eq!(body["text"], "plain text");
    }

    #[tokio::test]
    async fn test_analytics_and_stats() {
        let (server, _) = server(ReplyFixtures::example(2));
        extract(&server, ClaimTextFixtures::kitchen_fire()).await;
        extract(&server, ClaimTextFixtures::kitchen_fire()).await;

        let analytics = server.get("/api/v1/analytics").await.json::<Value>();
        assert_eq!(analytics["total_claims"], 2);
        assert_eq!(analytics["most_common_loss_type"], "Fire");
        assert_eq!(analytics["average_estimated_loss"], 5000.0);
        assert_eq!(analytics["high_confidence_share"], 100.0);

        let stats = server.get("/api/v1/analytics/stats").await.json::<Value>();
        assert_eq!(stats["total_claims"], 2);
        assert_eq!(stats["severity_breakdown"]["High"], 2);
    }

    #[tokio::test]
    async fn test_empty_analytics() {
        let (server, _) = server(ReplyFixtures::example(0));
        let analytics = server.get("/api/v1/analytics").await.json::<Value>();

        assert_eq!(analytics["total_claims"], 0);
        assert!(analytics["most_common_severity"].is_null());
        assert!(analytics["average_estimated_loss"].is_null());
    }
}
