//! Login: exchanges an email (and password, where one is set) for a session token.

use axum::extract::State;

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::auth::{LoginRequest, LoginResponse, TokenResponse},
    },
    auth::{credentials, password, session},
    config::TokenTransport,
    db::handlers::Users,
    errors::Error,
};

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    }
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Unknown user"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<LoginResponse, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut conn)
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "User".to_string(),
            id: request.email.clone(),
        })?;

    // Users without a stored hash log in by email alone
    if let Some(hash) = user.password_hash.clone() {
        let password = request.password.clone().ok_or_else(invalid_credentials)?;
        let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password verification task: {e}"),
            })??;

        if !is_valid {
            return Err(invalid_credentials());
        }
    }

    let token = session::create_session_token(&user.email, &state.config)?;
    let cookie = match state.config.auth.transport {
        TokenTransport::Cookie => Some(credentials::session_cookie(&token, &state.config.auth)),
        TokenTransport::Bearer => None,
    };

    Ok(LoginResponse {
        body: TokenResponse { token },
        cookie,
    })
}
