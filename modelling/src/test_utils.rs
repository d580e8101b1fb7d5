//! Test utilities shared by unit and integration tests.

use crate::{
    AppState,
    auth::session,
    build_router,
    config::Config,
    db::{
        handlers::{Models, Repository, Users},
        models::{
            models::ModelCreateDBRequest,
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{ModelId, ParameterId, UserId, ValueId, ValueType},
};
use axum_test::TestServer;
use sqlx::PgPool;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        ..Default::default()
    }
}

/// The full application router over `pool`, configured with [`create_test_config`].
pub fn create_test_server(pool: PgPool) -> TestServer {
    let state = AppState::builder().db(pool).config(create_test_config()).build();
    TestServer::new(build_router(state)).expect("Failed to create test server")
}

pub async fn create_test_user(pool: &PgPool, email: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: None,
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_model(pool: &PgPool, owner: UserId, name: &str) -> ModelId {
    let mut tx = pool.begin().await.expect("Failed to begin transaction");
    let model = Models::new(&mut tx)
        .create(&ModelCreateDBRequest {
            name: name.to_string(),
            owner,
        })
        .await
        .expect("Failed to create test model");
    tx.commit().await.expect("Failed to commit test model");
    model.id
}

/// Insert a parameter with the given values directly, returning its id and the value ids in order.
pub async fn create_test_parameter(
    pool: &PgPool,
    model_id: ModelId,
    name: &str,
    value_type: ValueType,
    values: &[&str],
) -> (ParameterId, Vec<ValueId>) {
    let parameter_id: ParameterId = sqlx::query_scalar("INSERT INTO parameters (model_id, name, value_type) VALUES ($1, $2, $3) RETURNING id")
        .bind(model_id)
        .bind(name)
        .bind(value_type)
        .fetch_one(pool)
        .await
        .expect("Failed to create test parameter");

    let mut value_ids = Vec::with_capacity(values.len());
    for value in values {
        let id: ValueId = sqlx::query_scalar("INSERT INTO parameter_values (parameter_id, value) VALUES ($1, $2) RETURNING id")
            .bind(parameter_id)
            .bind(*value)
            .fetch_one(pool)
            .await
            .expect("Failed to create test value");
        value_ids.push(id);
    }

    (parameter_id, value_ids)
}

/// `Authorization` header value for a freshly issued token
pub fn bearer_for(email: &str, config: &Config) -> String {
    let token = session::create_session_token(email, config).expect("Failed to create session token");
    format!("Bearer {token}")
}
