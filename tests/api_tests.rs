// tests/api_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use notecards::{
    config::Config,
    generation::{BackendError, DisabledBackend, GenerationBackend},
    routes,
    state::AppState,
};
use sqlx::sqlite::SqlitePoolOptions;

/// Backend that answers every prompt with the same text.
struct CannedBackend(&'static str);

#[async_trait]
impl GenerationBackend for CannedBackend {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok(self.0.to_string())
    }
}

/// Backend that always fails like an unreachable server.
struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError::Transport("connection refused".to_string()))
    }
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        hf_api_token: None,
        hf_api_url: "http://127.0.0.1:9/".to_string(),
        hf_model: "test-model".to_string(),
        ai_max_new_tokens: 800,
        ai_temperature: 0.7,
        ai_top_p: 0.95,
        ai_timeout_secs: 1,
    }
}

/// Spawns the app on a random port with a fresh in-memory database.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app(backend: Arc<dyn GenerationBackend>) -> String {
    // One connection that never expires, so the in-memory database survives.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool, test_config(), backend);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a fresh user and returns its bearer token.
async fn register_user(client: &reqwest::Client, address: &str) -> String {
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": unique_name(),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().expect("Token not found").to_string()
}

const WATER_NOTES: &str = "Water boils at 100 degrees Celsius. It is the main solvent of life.";

#[tokio::test]
async fn unknown_path_404() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_and_login_flow() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();
    let username = unique_name();

    let register = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": "learner@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(register.status().as_u16(), 201);
    let body: serde_json::Value = register.json().await.unwrap();
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["type"], "Bearer");

    // Duplicate username
    let duplicate = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);

    let bad_login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_login.status().as_u16(), 401);

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["token"].as_str().expect("Token not found");

    let check: serde_json::Value = client
        .get(format!("{}/api/auth/check", address))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["authenticated"], true);
    assert_eq!(check["username"], username.as_str());
}

#[tokio::test]
async fn register_fails_validation() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();

    // Username too short
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": "yo", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": unique_name(),
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn generate_requires_auth() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/flashcards/generate", address))
        .json(&serde_json::json!({ "notes": WATER_NOTES }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let check: serde_json::Value = client
        .get(format!("{}/api/auth/check", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["authenticated"], false);
}

#[tokio::test]
async fn generate_rejects_missing_or_blank_notes() {
    let address = spawn_app(Arc::new(CannedBackend("Q: a\nA: b"))).await;
    let client = reqwest::Client::new();
    let token = register_user(&client, &address).await;

    for body in [serde_json::json!({}), serde_json::json!({ "notes": "   \n" })] {
        let response = client
            .post(format!("{}/api/flashcards/generate", address))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let error: serde_json::Value = response.json().await.unwrap();
        assert_eq!(error["error"], "No notes provided");
    }
}

#[tokio::test]
async fn generate_returns_parsed_ai_cards() {
    let reply = "Q: At what temperature does water boil?\nA: 100 degrees Celsius\n\nQ: What is the main solvent of life?\nA: Water";
    let address = spawn_app(Arc::new(CannedBackend(reply))).await;
    let client = reqwest::Client::new();
    let token = register_user(&client, &address).await;

    let body: serde_json::Value = client
        .post(format!("{}/api/flashcards/generate", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "notes": WATER_NOTES }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!({
            "flashcards": [
                { "question": "At what temperature does water boil?", "answer": "100 degrees Celsius" },
                { "question": "What is the main solvent of life?", "answer": "Water" }
            ]
        })
    );
}

#[tokio::test]
async fn generate_falls_back_when_backend_fails_or_reply_is_unusable() {
    let expected = serde_json::json!({
        "flashcards": [
            { "question": "Explain: Water boils at 100 degrees", "answer": "Water boils at 100 degrees Celsius" },
            { "question": "What is It?", "answer": "the main solvent of life" }
        ]
    });

    let backends: [Arc<dyn GenerationBackend>; 2] = [
        Arc::new(FailingBackend),
        Arc::new(CannedBackend("Sorry, I can only chat.")),
    ];
    for backend in backends {
        let address = spawn_app(backend).await;
        let client = reqwest::Client::new();
        let token = register_user(&client, &address).await;

        let response = client
            .post(format!("{}/api/flashcards/generate", address))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "notes": WATER_NOTES }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn generated_markup_is_sanitized() {
    let reply = "Q: What is <b>bold</b>?<script>alert(1)</script>\nA: Emphasis";
    let address = spawn_app(Arc::new(CannedBackend(reply))).await;
    let client = reqwest::Client::new();
    let token = register_user(&client, &address).await;

    let body: serde_json::Value = client
        .post(format!("{}/api/flashcards/generate", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "notes": WATER_NOTES }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["flashcards"][0]["question"], "What is bold?");
    assert_eq!(body["flashcards"][0]["answer"], "Emphasis");
}

#[tokio::test]
async fn generated_text_keeps_special_characters() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();
    let token = register_user(&client, &address).await;

    let body: serde_json::Value = client
        .post(format!("{}/api/flashcards/generate", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "notes": "Salt & pepper is a pair where 3 < 5 holds." }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["flashcards"],
        serde_json::json!([
            { "question": "What is Salt & pepper?", "answer": "a pair where 3 < 5 holds" }
        ])
    );
}

#[tokio::test]
async fn saved_decks_are_listed_per_user() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();
    let token_a = register_user(&client, &address).await;
    let token_b = register_user(&client, &address).await;

    let flashcards = serde_json::json!([
        { "question": "What is Mitosis?", "answer": "cell division producing two identical daughter cells" }
    ]);

    for notes in ["first deck", "second deck"] {
        let response = client
            .post(format!("{}/api/flashcards/save", address))
            .bearer_auth(&token_a)
            .json(&serde_json::json!({ "notes": notes, "flashcards": flashcards }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert!(body["id"].as_i64().is_some());
    }

    let empty = client
        .post(format!("{}/api/flashcards/save", address))
        .bearer_auth(&token_a)
        .json(&serde_json::json!({ "notes": "n", "flashcards": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status().as_u16(), 400);

    let blank_card = client
        .post(format!("{}/api/flashcards/save", address))
        .bearer_auth(&token_a)
        .json(&serde_json::json!({
            "notes": "n",
            "flashcards": [{ "question": "   ", "answer": "\n\t" }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_card.status().as_u16(), 400);

    let decks: Vec<serde_json::Value> = client
        .get(format!("{}/api/flashcards/saved", address))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0]["notes"], "second deck");
    assert_eq!(decks[0]["flashcards"], flashcards);

    let others: Vec<serde_json::Value> = client
        .get(format!("{}/api/flashcards/saved", address))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(others.is_empty());
}

#[tokio::test]
async fn logout_revokes_token() {
    let address = spawn_app(Arc::new(DisabledBackend)).await;
    let client = reqwest::Client::new();
    let token = register_user(&client, &address).await;

    let logout: serde_json::Value = client
        .post(format!("{}/api/auth/logout", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(logout["success"], true);

    let response = client
        .post(format!("{}/api/flashcards/generate", address))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "notes": WATER_NOTES }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let check: serde_json::Value = client
        .get(format!("{}/api/auth/check", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["authenticated"], false);
}
