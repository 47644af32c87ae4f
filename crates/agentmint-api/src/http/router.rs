//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Agents
        .route(
            "/agents",
            get(handlers::agent::list_agents).post(handlers::agent::create_agent),
        )
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent)
                .put(handlers::agent::update_agent)
                .delete(handlers::agent::delete_agent),
        )
        // Chat
        .route(
            "/agents/{id}/chat",
            get(handlers::chat::get_history)
                .post(handlers::chat::send_message)
                .delete(handlers::chat::clear_history),
        )
        // NFTs
        .route(
            "/agents/{id}/transactions",
            get(handlers::nft::agent_transactions),
        )
        .route("/nfts/create", post(handlers::nft::create_nft))
        .route("/nfts/buy", post(handlers::nft::buy_nft))
        .route("/transactions", get(handlers::nft::buyer_transactions))
        // Service
        .route("/config", get(handlers::system::get_config))
        .route("/health", get(handlers::system::health));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmint_core::agent::fallback::FixedPicker;
    use agentmint_core::agent::responder::ResponseGenerator;
    use agentmint_infra::json::store::JsonAgentStore;
    use agentmint_infra::memory::chat::MemoryChatRepository;
    use agentmint_infra::store::{CatalogStore, ChatStore};
    use agentmint_types::config::GlobalConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const BOUNDARY: &str = "agentmint-test-boundary";
    const WALLET: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";
    const BUYER: &str = "0x1111111111111111111111111111111111111111";

    fn test_router() -> Router {
        let config = GlobalConfig::default();
        let generator =
            ResponseGenerator::new(None, &config.completion).with_picker(FixedPicker(0));
        let state = AppState::from_parts(
            CatalogStore::Json(JsonAgentStore::in_memory()),
            ChatStore::Memory(MemoryChatRepository::new()),
            generator,
            &config,
            std::env::temp_dir(),
        );
        build_router(state)
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, mime, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create_agent(router: &Router, name: &str) -> String {
        let (status, body) = send(
            router,
            multipart(
                "/api/v1/agents",
                &[
                    Part::Text("agentName", name),
                    Part::Text("role", "Travel planning"),
                    Part::Text("tools", r#"["web_search","file_analysis"]"#),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["agent"]["id"].as_str().unwrap().to_string()
    }

    async fn mint(router: &Router, agent_id: &str, supply: &str) -> (StatusCode, Value) {
        send(
            router,
            multipart(
                "/api/v1/nfts/create",
                &[
                    Part::Text("agentId", agent_id),
                    Part::Text("name", "Atlas Pass"),
                    Part::Text("description", "Lifetime access"),
                    Part::Text("price", "0.25"),
                    Part::Text("supply", supply),
                    Part::File("image", "pass.png", "image/png", b"png-bytes"),
                    Part::Text("creatorAddress", WALLET),
                    Part::Text("walletConnected", "true"),
                ],
            ),
        )
        .await
    }

    fn buy(agent_id: &str) -> Request<Body> {
        json_request(
            "POST",
            "/api/v1/nfts/buy",
            json!({"agentId": agent_id, "buyerAddress": BUYER, "walletConnected": true}),
        )
    }

    #[tokio::test]
    async fn test_create_agent_with_document_returns_greeting() {
        let router = test_router();
        let (status, body) = send(
            &router,
            multipart(
                "/api/v1/agents",
                &[
                    Part::Text("name", "Atlas"),
                    Part::Text("role", "Travel planning"),
                    Part::File("file", "notes.txt", "text/plain", b"Kyoto in spring"),
                ],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let agent = &body["data"]["agent"];
        assert_eq!(agent["name"], "Atlas");
        assert_eq!(agent["tools"], json!(["web_search"]));
        assert_eq!(agent["document"]["file_name"], "notes.txt");
        let greeting = body["data"]["initial_response"].as_str().unwrap();
        assert!(greeting.contains("Atlas"));
        assert!(greeting.contains("notes.txt"));
        assert!(body["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_agent_requires_name_and_role() {
        let router = test_router();
        let (status, body) = send(
            &router,
            multipart("/api/v1/agents", &[Part::Text("role", "Travel")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_list_get_update_delete_agent() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let (status, body) = send(&router, get("/api/v1/agents")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["status"], "active");

        let (status, body) = send(
            &router,
            json_request(
                "PUT",
                &format!("/api/v1/agents/{id}"),
                json!({"role": "Food tours", "status": "disabled"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["role"], "Food tours");

        let (_, body) = send(&router, get("/api/v1/agents?status=active")).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/agents/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, get(&format!("/api/v1/agents/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "AGENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let router = test_router();
        let (status, _) = send(&router, get("/api/v1/agents/not-a-uuid")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_round_trip_uses_fallback() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let (status, body) = send(&router, get(&format!("/api/v1/agents/{id}/chat"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, body) = send(
            &router,
            json_request(
                "POST",
                &format!("/api/v1/agents/{id}/chat"),
                json!({"message": "Plan Kyoto"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reply = body["data"]["reply"].as_str().unwrap();
        assert!(reply.contains("Atlas"));
        assert!(reply.contains("Plan Kyoto"));
        let history = body["data"]["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["role"], "assistant");

        let (_, body) = send(&router, get(&format!("/api/v1/agents/{id}/chat"))).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let clear = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/agents/{id}/chat"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, clear).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&router, get(&format!("/api/v1/agents/{id}/chat"))).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message_and_unknown_agent() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let (status, _) = send(
            &router,
            json_request(
                "POST",
                &format!("/api/v1/agents/{id}/chat"),
                json!({"message": "   "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = uuid::Uuid::now_v7();
        let (status, _) = send(&router, get(&format!("/api/v1/agents/{unknown}/chat"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_bodies_use_envelope() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let targets = [
            ("POST", format!("/api/v1/agents/{id}/chat")),
            ("PUT", format!("/api/v1/agents/{id}")),
            ("POST", "/api/v1/nfts/buy".to_string()),
        ];
        for (method, uri) in targets {
            let request = Request::builder()
                .method(method)
                .uri(&uri)
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap();
            let (status, body) = send(&router, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR", "{method} {uri}");
            assert!(body["data"].is_null());
        }

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/nfts/buy")
            .body(Body::from(r#"{"agentId":"x"}"#))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_mint_and_buy_until_sold_out() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let (status, body) = mint(&router, &id, "1").await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["nft"]["supply"], 1);
        assert_eq!(body["data"]["nft"]["price"], "0.25");
        assert_eq!(
            body["data"]["nft"]["creator_address"],
            "0xabcdef0123456789abcdef0123456789abcdef01"
        );
        assert!(
            body["data"]["nft"]["image"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );

        let (status, _) = mint(&router, &id, "5").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&router, buy(&id)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["nft"]["supply"], 0);
        assert_eq!(body["data"]["transaction"]["buyer_address"], BUYER);
        assert!(
            body["data"]["transaction"]["transaction_hash"]
                .as_str()
                .unwrap()
                .starts_with("0x")
        );

        let (status, body) = send(&router, buy(&id)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errors"][0]["code"], "OUT_OF_STOCK");

        let (_, body) = send(&router, get(&format!("/api/v1/agents/{id}/transactions"))).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&router, get(&format!("/api/v1/transactions?buyer={BUYER}"))).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&router, get("/api/v1/transactions")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mint_validation_and_wallet_errors() {
        let router = test_router();
        let id = create_agent(&router, "Atlas").await;

        let (status, body) = mint(&router, &id, "0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, _) = mint(&router, &id, "many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            json_request(
                "POST",
                "/api/v1/nfts/buy",
                json!({"agentId": id, "buyerAddress": BUYER, "walletConnected": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "WALLET_ERROR");

        let (status, body) = send(&router, buy(&id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "NFT_NOT_FOUND");

        let (_, body) = send(&router, get(&format!("/api/v1/agents/{id}"))).await;
        assert!(body["data"].get("nft").is_none());
    }

    #[tokio::test]
    async fn test_config_and_health_without_key() {
        let router = test_router();

        let (status, body) = send(&router, get("/api/v1/config")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({"has_completion_key": false, "real_ai": false, "fallback_mode": true})
        );

        let (status, body) = send(&router, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["services"]["storage"], "healthy");
        assert_eq!(body["data"]["services"]["completion"], "not_configured");
    }
}
