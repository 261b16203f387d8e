//! Ledger service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AppState,
    error::ApiError,
    middleware::{CurrentSession, SESSION_COOKIE, auth_middleware, session_token},
    models::{NewAccount, NewTransaction, User},
};

/// Request for registration and login
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
}

/// Response describing the logged-in user
#[derive(Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub open_sessions: i64,
}

/// Create the router for the ledger service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:id", get(get_account))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/report", post(report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(state.store.pool())
        .await
        .unwrap_or(false);
    let status = if database { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "ledger",
        "database": database,
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Registration attempt for user: {}", payload.username);

    if !state
        .store
        .register(&payload.username, &payload.password)
        .await?
    {
        return Err(ApiError::BadRequest(
            "Username already exists or invalid input.".to_string(),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Registered successfully"})),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.is_allowed(&payload.username).await {
        warn!("Login throttled for user: {}", payload.username);
        return Err(ApiError::TooManyRequests);
    }

    let Some(token) = state
        .store
        .authenticate(&payload.username, &payload.password)
        .await?
    else {
        state.rate_limiter.record_failure(&payload.username).await;
        return Err(ApiError::InvalidCredentials);
    };

    state.rate_limiter.reset(&payload.username).await;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .path("/");

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

/// Logout endpoint; succeeds whether or not a session was open
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session_token(&headers) {
        state.store.logout(&token).await?;
    }

    let cleared = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((
        cleared,
        Json(json!({"message": "Logged out successfully"})),
    ))
}

/// Current user endpoint
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    let open_sessions = state.store.open_sessions(session.user.id).await?;

    Ok(Json(MeResponse {
        user: session.user,
        open_sessions,
    }))
}

/// List the caller's accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.store.list_accounts(session.user.id).await?;
    Ok(Json(accounts))
}

/// Create an account for the caller
pub async fn create_account(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(payload): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .store
        .create_account(
            session.user.id,
            &payload.name,
            &payload.account_type,
            payload.opening_balance,
        )
        .await?;

    if !created {
        return Err(ApiError::BadRequest(
            "Account name and type are required.".to_string(),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Account created"})),
    ))
}

/// Get one of the caller's accounts
pub async fn get_account(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .store
        .get_account(session.user.id, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(account))
}

/// List the caller's transactions, newest first
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.store.list_transactions(session.user.id).await?;
    Ok(Json(transactions))
}

/// Record a transaction on one of the caller's accounts
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Json(payload): Json<NewTransaction>,
) -> Result<impl IntoResponse, ApiError> {
    let recorded = state
        .store
        .create_transaction(
            session.user.id,
            payload.account_id,
            &payload.kind,
            payload.amount,
            &payload.description,
        )
        .await?;

    if !recorded {
        return Err(ApiError::BadRequest(
            "Transaction needs kind income or expense, a positive amount, a description and one of your accounts."
                .to_string(),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Transaction recorded"})),
    ))
}

/// Render a report for a snapshot posted as the raw request body
pub async fn report(body: String) -> Result<impl IntoResponse, ApiError> {
    let snapshot = planner::parse_snapshot(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON snapshot: {}", e)))?;

    Ok(Json(json!({
        "report": planner::render_report(&snapshot),
        "summary": planner::summarize(&snapshot),
    })))
}
