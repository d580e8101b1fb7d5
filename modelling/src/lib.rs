//! # modelling: multi-tenant catalog of configurable models
//!
//! A model is a named product (a car, a laptop, ...) made of parameters. Each parameter has an
//! ordered set of values, and both carry per-language translations. Constraints relate a value
//! of one parameter to a value of another (`excludes` / `requires`). Every model is owned by
//! one or more users and is invisible to everyone else.
//!
//! ## Architecture
//!
//! - **HTTP**: [Axum](https://github.com/tokio-rs/axum) handlers under [`api`], documented with
//!   `utoipa` ([`openapi`])
//! - **Request pipeline**: an ordered [`middleware::MiddlewareChain`] of decorators (trace id,
//!   logging, locale, content type, identity, authorization) folded onto each route group
//! - **Request context**: [`context::RequestContext`] carries the trace id, locale and
//!   authenticated subject from the decorators to the handlers
//! - **Storage**: PostgreSQL via [SQLx](https://github.com/launchbadge/sqlx); repositories in
//!   [`db::handlers`], LEFT JOIN aggregation in [`db::aggregate`], transactional bulk writes in
//!   [`db::upsert`]
//! - **Auth**: HS256 session tokens ([`auth::session`]) carried as a bearer header or a cookie,
//!   optional argon2 passwords ([`auth::password`])
//!
//! ## Request flow
//!
//! ```text
//! request -> trace -> logging -> locale -> content type -> identity -> authorization -> handler
//! ```
//!
//! `/login` gets only the first four decorators, `/models` adds identity, and every route under
//! `/models/{model_id}` adds the ownership check. A decorator that rejects a request stops it
//! there; the handler never runs.
//!
//! ## Quick start
//!
//! ```no_run
//! use modelling::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = modelling::config::Args { config: "config.yaml".into(), validate: false };
//!     let config = Config::load(&args)?;
//!     modelling::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async { tokio::signal::ctrl_c().await.ok(); }).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::handlers::{auth as login, constraints, models, parameters, translations, values},
    auth::password,
    db::{errors::DbError, handlers::Users, models::users::UserCreateDBRequest},
    middleware::MiddlewareChain,
    openapi::ApiDoc,
    types::UserId,
};
use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tracing::{debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the modelling database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial user if it doesn't exist, or reset its password if one is given.
///
/// Runs at startup when `admin_email` is configured. Idempotent.
#[instrument(skip_all)]
pub async fn create_initial_user(email: &str, password: Option<&str>, db: &PgPool) -> Result<UserId, DbError> {
    let password_hash = password
        .map(password::hash_string)
        .transpose()
        .map_err(|e| DbError::Other(anyhow::anyhow!("Failed to hash initial user password: {}", e.user_message())))?;

    let mut tx = db.begin().await?;
    let mut users = Users::new(&mut tx);

    let id = match users.get_user_by_email(email).await? {
        Some(existing) => {
            if let Some(hash) = &password_hash {
                users.set_password_hash(existing.id, hash).await?;
            }
            existing.id
        }
        None => {
            users
                .create(&UserCreateDBRequest {
                    email: email.to_string(),
                    password_hash,
                })
                .await?
                .id
        }
    };

    tx.commit().await?;
    Ok(id)
}

/// Build the application router.
///
/// Routes are grouped by how much of the decorator chain they need; each group gets its own
/// [`MiddlewareChain`]. Health and docs sit outside the chain.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new().route("/login", post(login::login));

    let authenticated = Router::new().route("/models", get(models::list_models).post(models::create_model));

    let owned = Router::new()
        .route("/models/{model_id}", get(models::get_model).delete(models::delete_model))
        .route(
            "/models/{model_id}/parameters",
            get(parameters::list_parameters).post(parameters::create_parameter),
        )
        .route("/models/{model_id}/parameters/{parameter_id}", delete(parameters::delete_parameter))
        .route(
            "/models/{model_id}/parameters/{parameter_id}/translations",
            get(translations::list_parameter_translations).patch(translations::modify_parameter_translations),
        )
        .route(
            "/models/{model_id}/parameters/{parameter_id}/values",
            get(values::list_values).patch(values::modify_values),
        )
        .route(
            "/models/{model_id}/parameters/{parameter_id}/values/{value_id}/translations",
            get(translations::list_value_translations).patch(translations::modify_value_translations),
        )
        .route(
            "/models/{model_id}/constraints",
            get(constraints::list_constraints).post(constraints::create_constraint),
        )
        .route("/models/{model_id}/constraints/{constraint_id}", delete(constraints::delete_constraint));

    let owned_chain = MiddlewareChain::owned(&state);
    debug!("Protected routes use decorators: {:?}", owned_chain.names());

    Router::new()
        .merge(MiddlewareChain::public(&state).apply(public))
        .merge(MiddlewareChain::authenticated(&state).apply(authenticated))
        .merge(owned_chain.apply(owned))
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
}

/// Connect, migrate and seed the initial user.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout)
        .connect(&config.database.url)
        .await?;
    migrator().run(&pool).await?;

    if let Some(email) = &config.admin_email {
        let id = create_initial_user(email, config.admin_password.as_deref(), &pool).await?;
        info!(user_id = id, "Initial user ready: {}", email);
    }

    Ok(pool)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting modelling with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Modelling listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
