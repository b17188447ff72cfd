//! Axum extractors and shared application state

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use sqlx::PgPool;
use std::sync::Arc;

use tb_auth::{extract_bearer_token, CurrentUser, GatePolicy, JwtService};
use tb_core::config::AppConfig;
use tb_core::pagination::Pagination as PageParams;
use tb_export::{ExportService, LocalStorage};
use tb_notifications::{FeedbackSink, TracingFeedbackSink};

use crate::error::ApiError;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Option<PgPool>,
    pub jwt: Arc<JwtService>,
    pub gate: GatePolicy,
    pub feedback: Arc<dyn FeedbackSink>,
    pub export: Arc<ExportService<LocalStorage>>,
}

impl AppState {
    /// Build the state from configuration and an optional database pool.
    pub fn new(config: &AppConfig, pool: Option<PgPool>) -> Self {
        let storage = LocalStorage::new(&config.export.storage_path, config.export.base_url.clone());

        Self {
            pool,
            jwt: Arc::new(JwtService::new(config.auth.jwt_secret.as_bytes())),
            gate: GatePolicy::from_config(config.auth.edit_follows_manage),
            feedback: Arc::new(TracingFeedbackSink),
            export: Arc::new(ExportService::new(storage)),
        }
    }

    /// The database pool, or a 500 when running without a database.
    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.pool
            .as_ref()
            .ok_or_else(|| ApiError::internal("Database is not available"))
    }
}

/// Authenticated user extractor: validates the bearer token and resolves the
/// acting identity.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Expected a bearer token"))?;

        let user = app_state
            .jwt
            .authenticate(token)
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pagination query parameters
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_page_size() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_size: 20,
            offset: 0,
        }
    }
}

pub struct Pagination(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PaginationParams::default()));
        Ok(Pagination(PageParams::new(params.page_size, params.offset)))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PageParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
