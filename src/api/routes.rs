//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::{Principal, Summary, TransactionKind};
use crate::error::AppError;
use crate::service::{
    CategoryRecord, CategoryService, NewTransaction, TransactionRecord, TransactionService,
    UserService,
};

use super::middleware::{auth_middleware, logging_middleware};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category_id: Uuid,
}

impl From<TransactionPayload> for NewTransaction {
    fn from(payload: TransactionPayload) -> Self {
        Self {
            description: payload.description,
            amount: payload.amount,
            kind: payload.kind,
            date: payload.date,
            category_id: payload.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_per_page() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionRecord>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

// =========================================================================
// Router
// =========================================================================

/// Build the application router.
///
/// Auth endpoints are public; everything else under `/api` sits behind the
/// bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route(
            "/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route("/transactions/summary", get(financial_summary))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    let auth = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", auth.merge(protected))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// Auth endpoints
// =========================================================================

/// Register a new account
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    UserService::new(state.pool)
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Authenticate and issue a bearer token
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let principal = UserService::new(state.pool)
        .authenticate(&request.email, &request.password)
        .await?;

    let token = state.tokens.issue(&principal)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        email: principal.email,
        name: principal.name,
    }))
}

// =========================================================================
// Category endpoints
// =========================================================================

async fn create_category(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryRecord>), AppError> {
    let category = CategoryService::new(state.pool)
        .create(principal.id, &payload.name, &payload.icon, &payload.color)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

async fn list_categories(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<CategoryRecord>>, AppError> {
    let categories = CategoryService::new(state.pool).list(principal.id).await?;

    Ok(Json(categories))
}

async fn get_category(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryRecord>, AppError> {
    let category = CategoryService::new(state.pool)
        .get(id, principal.id)
        .await?;

    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryRecord>, AppError> {
    let category = CategoryService::new(state.pool)
        .update(id, principal.id, &payload.name, &payload.icon, &payload.color)
        .await?;

    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CategoryService::new(state.pool)
        .delete(id, principal.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Transaction endpoints
// =========================================================================

async fn create_transaction(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<TransactionRecord>), AppError> {
    let transaction = TransactionService::new(state.pool)
        .create(principal.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn list_transactions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let page = query.page.max(0);
    let per_page = query.per_page.clamp(1, 100);

    let (transactions, total) = TransactionService::new(state.pool)
        .list(principal.id, page, per_page)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions,
        total,
        page,
        per_page,
    }))
}

async fn get_transaction(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionRecord>, AppError> {
    let transaction = TransactionService::new(state.pool)
        .get(id, principal.id)
        .await?;

    Ok(Json(transaction))
}

async fn update_transaction(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    let transaction = TransactionService::new(state.pool)
        .update(id, principal.id, payload.into())
        .await?;

    Ok(Json(transaction))
}

async fn delete_transaction(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TransactionService::new(state.pool)
        .delete(id, principal.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Financial summary over an optional date range
async fn financial_summary(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, AppError> {
    let summary = TransactionService::new(state.pool)
        .summary(principal.id, query.start_date, query.end_date)
        .await?;

    Ok(Json(summary))
}
