use std::sync::{Arc, Mutex};

use serde_json::json;
use storefront_client::types::{Credential, Role};
use storefront_client::{Config, CredentialStore, Identity, MemoryStore, StorefrontClient};
use tracing::subscriber::{DefaultGuard, set_default};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Registry, fmt};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct VecWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl std::io::Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.lines.lock().unwrap();
        guard.push(String::from_utf8_lossy(buf).into_owned());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (Arc<Mutex<Vec<String>>>, DefaultGuard) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let writer_lines = lines.clone();
    let subscriber = Registry::default().with(
        fmt::Layer::default()
            .with_writer(move || VecWriter {
                lines: writer_lines.clone(),
            })
            .with_target(false)
            .with_level(true)
            .with_ansi(false),
    );
    let guard = set_default(subscriber);
    (lines, guard)
}

fn seeded_store(access: &str, refresh: &str) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .save(
            &Credential {
                access_token: access.to_string(),
                refresh_token: refresh.to_string(),
                token_type: "Bearer".to_string(),
            },
            &Identity {
                username: "coral".to_string(),
                role: Role::User,
                id: "u-1".to_string(),
            },
        )
        .expect("seed session");
    store
}

#[tokio::test]
async fn refreshes_and_replays_once_after_an_unauthorized_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 1,
                "productId": 7,
                "productName": "Mechanical Keyboard",
                "productPrice": 89.99,
                "quantity": 2,
                "subtotal": 179.98
            }],
            "totalItems": 2,
            "totalPrice": 179.98
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "refreshToken": "R2",
            "tokenType": "Bearer",
            "username": "coral",
            "role": "USER",
            "userId": "u-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store("stale", "R1");
    let client = StorefrontClient::builder(Config::from_base_url(&server.uri()))
        .store(Arc::clone(&store) as Arc<dyn CredentialStore>)
        .build()
        .expect("client builds");

    let (lines, guard) = capture_logs();
    let cart = client
        .cart()
        .get()
        .await
        .expect("cart fetch succeeds after refresh");
    drop(guard);

    assert_eq!(cart.total_items, 2);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product_name, "Mechanical Keyboard");

    // The replayed call ran on the rotated credential pair.
    assert_eq!(store.access_token().as_deref(), Some("fresh"));
    assert_eq!(store.refresh_token().as_deref(), Some("R2"));

    let logs = lines.lock().unwrap().clone();
    assert!(
        logs.iter()
            .any(|line| line.contains("WARN") && line.contains("unauthorized")),
        "expected warning log mentioning the unauthorized response, got: {:?}",
        logs
    );
}

#[tokio::test]
async fn a_successful_replay_keeps_the_original_request_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cart/items"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    // The replay must carry the same JSON body as the first attempt.
    Mock::given(method("POST"))
        .and(path("/api/v1/cart/items"))
        .and(header("Authorization", "Bearer fresh"))
        .and(body_json(json!({"productId": 7, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "productId": 7,
            "productName": "Mechanical Keyboard",
            "productPrice": 89.99,
            "quantity": 2,
            "subtotal": 179.98
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "fresh",
            "refreshToken": "R2",
            "tokenType": "Bearer",
            "username": "coral",
            "role": "USER",
            "userId": "u-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store("stale", "R1");
    let client = StorefrontClient::builder(Config::from_base_url(&server.uri()))
        .store(Arc::clone(&store) as Arc<dyn CredentialStore>)
        .build()
        .expect("client builds");

    let item = client
        .cart()
        .add(7, 2)
        .await
        .expect("add succeeds after refresh");
    assert_eq!(item.product_id, 7);
    assert_eq!(item.quantity, 2);
}
