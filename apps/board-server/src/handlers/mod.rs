//! HTTP handlers and route configuration.

mod donations;
mod health;
mod posts;
mod profile;
mod votes;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/categories", web::get().to(posts::categories))
            .route("/profile/{address}", web::get().to(profile::profile))
            // Board routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/facets", web::get().to(posts::facets))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}/vote", web::post().to(votes::cast_vote))
                    .route("/{id}/donate", web::post().to(donations::donate)),
            ),
    );
}

#[cfg(all(test, feature = "dev-chain"))]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use basecamp_core::domain::Address;
    use basecamp_core::domain::network::{BASE_SEPOLIA, Deployments};
    use basecamp_core::ports::{ChainError, TxHash, TxStatus, WalletClient};
    use basecamp_core::services::BoardConfig;
    use basecamp_infra::{DevChain, DevChainConfig, InMemoryStore};

    use super::*;
    use crate::config::{AppConfig, ChainConfig, SessionConfig};
    use crate::middleware::session::SESSION_HEADER;
    use crate::state::AppState;

    const AUTHOR: &str = "0x00000000000000000000000000000000000000aa";

    fn config(wallet: Option<&str>) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_path: None,
            storage_quota: None,
            board: BoardConfig::default(),
            sessions: SessionConfig::default(),
            chain: ChainConfig {
                wallet_address: wallet.map(|a| Address::parse(a).unwrap()),
                chain_id: BASE_SEPOLIA,
                badge_contract: Deployments {
                    sepolia: Some(
                        Address::parse("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap(),
                    ),
                    ..Default::default()
                },
            },
        }
    }

    fn state(wallet: Option<&str>) -> AppState {
        state_with(config(wallet))
    }

    fn state_with(config: AppConfig) -> AppState {
        let chain = Arc::new(DevChain::new(DevChainConfig {
            chain_id: config.chain.chain_id,
            account: config.chain.wallet_address.clone(),
            badge_contract: config.chain.badge_contract.clone(),
            ..Default::default()
        }));
        AppState::from_parts(
            Arc::new(InMemoryStore::new()),
            false,
            chain.clone(),
            chain,
            &config,
        )
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_reports_board_settings() {
        let mut config = config(None);
        config.board.page_size = 3;
        let app = app!(state_with(config));

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["persistent"], false);
        assert_eq!(body["chainId"], BASE_SEPOLIA);
        assert_eq!(body["pageSize"], 3);
    }

    #[actix_web::test]
    async fn test_list_posts_returns_seeds() {
        let app = app!(state(None));

        let req = test::TestRequest::get().uri("/api/posts?sort=popular").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["totalMatches"], 4);
        assert_eq!(body["data"]["items"][0]["id"], 1);
    }

    #[actix_web::test]
    async fn test_get_post_requires_session() {
        let app = app!(state(None));

        let req = test::TestRequest::get().uri("/api/posts/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_views_count_once_per_session() {
        let app = app!(state(None));

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/api/posts/3")
                .insert_header((SESSION_HEADER, "tab-a"))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"]["views"], 190);
        }

        let req = test::TestRequest::get()
            .uri("/api/posts/3")
            .insert_header((SESSION_HEADER, "tab-b"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["views"], 191);
    }

    #[actix_web::test]
    async fn test_evicted_session_counts_again() {
        let mut config = config(None);
        config.sessions.capacity = 1;
        let state = state_with(config);
        let sessions = state.sessions.clone();
        let app = app!(state);

        let open = |session: &str| {
            test::TestRequest::get()
                .uri("/api/posts/3")
                .insert_header((SESSION_HEADER, session.to_string()))
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, open("tab-a")).await;
        assert_eq!(body["data"]["views"], 190);
        let body: Value = test::call_and_read_body_json(&app, open("tab-b")).await;
        assert_eq!(body["data"]["views"], 191);
        assert_eq!(sessions.len().await, 1);

        // "tab-a" was evicted to make room for "tab-b".
        let body: Value = test::call_and_read_body_json(&app, open("tab-a")).await;
        assert_eq!(body["data"]["views"], 192);
    }

    #[actix_web::test]
    async fn test_vote_toggle_and_switch() {
        let app = app!(state(None));

        let vote = |direction: &str| {
            test::TestRequest::post()
                .uri("/api/posts/1/vote")
                .insert_header((SESSION_HEADER, "viewer-1"))
                .set_json(json!({ "vote": direction }))
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, vote("up")).await;
        assert_eq!(body["data"]["likes"], 157);
        assert_eq!(body["data"]["userVote"], "up");

        let body: Value = test::call_and_read_body_json(&app, vote("down")).await;
        assert_eq!(body["data"]["likes"], 156);
        assert_eq!(body["data"]["dislikes"], 4);
        assert_eq!(body["data"]["userVote"], "down");

        let body: Value = test::call_and_read_body_json(&app, vote("down")).await;
        assert_eq!(body["data"]["dislikes"], 3);
        assert!(body["data"]["userVote"].is_null());
    }

    #[actix_web::test]
    async fn test_unknown_post_is_problem_document() {
        let app = app!(state(None));

        let req = test::TestRequest::post()
            .uri("/api/posts/999/vote")
            .insert_header((SESSION_HEADER, "viewer-1"))
            .set_json(json!({ "vote": "up" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
    }

    #[actix_web::test]
    async fn test_create_post_claims_badge() {
        let app = app!(state(Some(AUTHOR)));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({
                "title": "Hello Base",
                "content": "first post",
                "category": "build",
                "tags": ["base"]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["post"]["author"], "0x0000...00aa");
        assert_eq!(body["data"]["post"]["donationAddress"], AUTHOR);
        assert_eq!(body["data"]["badge"]["status"], "claimed");

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["totalMatches"], 5);
        assert_eq!(body["data"]["items"][0]["title"], "Hello Base");
    }

    #[actix_web::test]
    async fn test_create_post_without_wallet() {
        let app = app!(state(None));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "t", "content": "c", "category": "build" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    /// Reports the account once, then behaves as disconnected.
    struct DisconnectingWallet {
        inner: Arc<DevChain>,
        seen: AtomicBool,
    }

    #[async_trait::async_trait]
    impl WalletClient for DisconnectingWallet {
        async fn current_address(&self) -> Option<Address> {
            if self.seen.swap(true, Ordering::SeqCst) {
                return None;
            }
            self.inner.current_address().await
        }

        async fn chain_id(&self) -> Result<u64, ChainError> {
            self.inner.chain_id().await
        }

        async fn send_value(&self, to: &Address, amount_wei: u128) -> Result<TxHash, ChainError> {
            self.inner.send_value(to, amount_wei).await
        }

        async fn await_confirmation(&self, tx: &TxHash) -> Result<TxStatus, ChainError> {
            self.inner.await_confirmation(tx).await
        }
    }

    #[actix_web::test]
    async fn test_create_post_survives_wallet_disconnect() {
        let config = config(Some(AUTHOR));
        let chain = Arc::new(DevChain::new(DevChainConfig {
            chain_id: config.chain.chain_id,
            account: config.chain.wallet_address.clone(),
            badge_contract: config.chain.badge_contract.clone(),
            ..Default::default()
        }));
        let wallet = Arc::new(DisconnectingWallet {
            inner: chain.clone(),
            seen: AtomicBool::new(false),
        });
        let app = app!(AppState::from_parts(
            Arc::new(InMemoryStore::new()),
            false,
            wallet,
            chain,
            &config,
        ));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "t", "content": "c", "category": "build" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["post"]["authorAddress"], AUTHOR);
        assert_eq!(body["data"]["badge"]["status"], "claimed");
    }

    #[actix_web::test]
    async fn test_create_post_validation() {
        let app = app!(state(Some(AUTHOR)));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "", "content": "c", "category": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_donate_to_seed_post() {
        let app = app!(state(Some(AUTHOR)));

        let req = test::TestRequest::post()
            .uri("/api/posts/2/donate")
            .set_json(json!({ "amount": "0.5" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["amountWei"], 500_000_000_000_000_000u64);
    }

    #[actix_web::test]
    async fn test_profile_summarizes_author() {
        let app = app!(state(Some(AUTHOR)));

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "t", "content": "c", "category": "build" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/profile/{}", AUTHOR))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["posts"], 1);
        assert_eq!(body["data"]["registered"], false);
    }

    #[actix_web::test]
    async fn test_categories_and_facets() {
        let app = app!(state(None));

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 10);

        let req = test::TestRequest::get().uri("/api/posts/facets").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 4);
    }
}
