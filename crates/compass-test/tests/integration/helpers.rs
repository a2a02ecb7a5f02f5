#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Builds the full router over an in-memory auth store, so tests exercise
//! the real middleware and handlers without a database.

use salvo::Service;
use salvo::test::{RequestBuilder, TestClient};

use compass_test::app::api::routes;
use compass_test::component::config::{
    AuthConfig, ConfigHandler, DatabaseConfig, LoggingConfig, ServerConfig, Settings,
};
use compass_test::component::store::MemoryAuthStore;
use compass_test::component::util::idcodec::IdCodec;

use compass_app::codec_handler::CodecHandler;
use compass_app::store_handler::StoreHandler;

pub const SALT: &str = "integration-test-salt";
pub const COOKIE_NAME: &str = "compass_session";
pub const BASE: &str = "http://127.0.0.1:5800";

pub fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            salt: SALT.to_string(),
            min_token_length: 8,
            session_ttl_secs: 604_800,
            cookie_name: COOKIE_NAME.to_string(),
            cookie_secure: false,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8710,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

pub fn test_codec() -> IdCodec {
    IdCodec::new(SALT, 8)
}

/// The application under test: full router, in-memory store.
pub struct TestApp {
    pub store: MemoryAuthStore,
    pub service: Service,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryAuthStore::new();
        let router = salvo::Router::new()
            .hoop(ConfigHandler {
                settings: test_settings(),
            })
            .hoop(StoreHandler::new(store.clone()))
            .hoop(CodecHandler::new(test_codec()))
            .push(routes());

        Self {
            store,
            service: Service::new(router),
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        TestClient::get(format!("{BASE}{path}"))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        TestClient::post(format!("{BASE}{path}"))
    }

    /// Signs up a user through the HTTP API and returns the session cookie
    /// value from the response.
    pub async fn signup(&self, role: &str, username: &str, email: &str) -> String {
        let content = self
            .post(&format!("/api/auth/signup/{role}"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": "hunter2hunter2",
            }))
            .send(&self.service)
            .await;

        session_cookie_value(&content).expect("signup sets the session cookie")
    }

    /// The encoded identifier token for a user id, as it appears in URLs.
    pub fn encoded_id(&self, user_id: i32) -> String {
        test_codec().encode(u64::from(user_id.unsigned_abs()))
    }
}

pub fn cookie_header(token: &str) -> String {
    format!("{COOKIE_NAME}={token}")
}

/// Extracts the session cookie value set on a response, if any.
pub fn session_cookie_value(content: &salvo::Response) -> Option<String> {
    content
        .cookies()
        .get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// True when the response instructs the browser to drop the session cookie.
pub fn clears_session_cookie(content: &salvo::Response) -> bool {
    content
        .cookies()
        .get(COOKIE_NAME)
        .is_some_and(|c| c.value().is_empty())
}
