//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{parse_instant, Amount, DateRange, DomainError, RequestContext, TransactionType};
use crate::error::AppError;
use crate::handlers::{
    CreateCategoryCommand, CreateCategoryHandler, CreateTransactionCommand,
    CreateTransactionHandler, DeleteCategoryCommand, DeleteCategoryHandler,
    DeleteTransactionCommand, DeleteTransactionHandler, UpdateCurrencyCommand,
    UserSettingsHandler,
};
use crate::models::{
    Category, CategoryId, CategoryRow, Transaction, TransactionRow, UserSettings,
    TRANSACTION_COLUMNS,
};
use crate::state::{AppSettings, AppState};
use crate::stats::{
    BalanceStats, CategoryStat, HistoryDataPoint, HistoryPeriod, HistoryTimeframe, MonthlyStat,
    StatsService,
};

use super::extract::{empty_string_as_none, ValidatedJson, ValidatedQuery};

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 3, max = 20))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[validate(length(min = 1))]
    pub date: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[validate(length(min = 1))]
    pub category: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCurrencyRequest {
    #[validate(length(min = 1))]
    pub currency: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoriesQuery {
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub kind: Option<TransactionType>,
}

/// `from` / `to` bounds shared by the stats endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct RangeQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl RangeQuery {
    pub fn range(&self, max_days: i64) -> Result<DateRange, AppError> {
        date_range(self.from.as_deref(), self.to.as_deref(), max_days)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub kind: Option<TransactionType>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HistoryDataQuery {
    pub timeframe: HistoryTimeframe,
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
}

fn date_range(from: Option<&str>, to: Option<&str>, max_days: i64) -> Result<DateRange, AppError> {
    match (from, to) {
        (Some(from), Some(to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok(DateRange::parse(from, to, max_days)?)
        }
        _ => Err(AppError::MissingDateParameters),
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:category_id", delete(delete_category))
        // Transactions
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/:transaction_id", delete(delete_transaction))
        // Stats
        .route("/stats/balance", get(balance_stats))
        .route("/stats/categories", get(category_stats))
        .route("/stats/monthly", get(monthly_stats))
        // History
        .route("/history-periods", get(history_periods))
        .route("/history-data", get(history_data))
        // Settings
        .route("/user-settings", get(get_user_settings))
        .route("/settings/currency", put(update_currency))
}

// =========================================================================
// Categories
// =========================================================================

/// List the caller's categories
async fn list_categories(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<CategoriesQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
        r#"
        SELECT created_at, name, user_id, icon, type
        FROM categories
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR type = $2)
        ORDER BY name ASC
        "#,
    )
    .bind(&context.user_id)
    .bind(query.kind.map(|kind| kind.as_str()))
    .fetch_all(&pool)
    .await?;

    let categories = rows
        .into_iter()
        .map(Category::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(categories))
}

/// Create a category
async fn create_category(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let handler = CreateCategoryHandler::new(pool);

    let command = CreateCategoryCommand::new(request.name, request.kind).with_icon(request.icon);
    let category = handler.execute(command, &context).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a category addressed as `name|type`
async fn delete_category(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    Path(category_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: CategoryId = category_id.parse()?;

    DeleteCategoryHandler::new(pool)
        .execute(DeleteCategoryCommand::new(id), &context)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Transactions
// =========================================================================

/// List the caller's transactions within a date range, newest first
async fn list_transactions(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<TransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let range = date_range(
        query.from.as_deref(),
        query.to.as_deref(),
        settings.max_date_range_days,
    )?;

    let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
        r#"
        SELECT {TRANSACTION_COLUMNS}
        FROM transactions
        WHERE user_id = $1
          AND date >= $2 AND date <= $3
          AND ($4::TEXT IS NULL OR category = $4)
          AND ($5::TEXT IS NULL OR type = $5)
        ORDER BY date DESC
        "#
    ))
    .bind(&context.user_id)
    .bind(range.from())
    .bind(range.to())
    .bind(query.category.as_deref())
    .bind(query.kind.map(|kind| kind.as_str()))
    .fetch_all(&pool)
    .await?;

    let transactions = rows
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::debug!(
        user_id = %context.user_id,
        count = transactions.len(),
        "Listed transactions"
    );

    Ok(Json(transactions))
}

/// Record a transaction
async fn create_transaction(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    ValidatedJson(request): ValidatedJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let amount = Amount::new(request.amount).map_err(DomainError::from)?;
    let date = parse_instant(&request.date)?;

    let command = CreateTransactionCommand::new(amount, date, request.kind, request.category)
        .with_description(request.description.unwrap_or_default());

    let transaction = CreateTransactionHandler::new(pool)
        .execute(command, &context)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Delete one of the caller's transactions
async fn delete_transaction(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let transaction_id = Uuid::parse_str(&transaction_id)
        .map_err(|_| AppError::InvalidRequest(format!("invalid transaction id: {}", transaction_id)))?;

    DeleteTransactionHandler::new(pool)
        .execute(DeleteTransactionCommand::new(transaction_id), &context)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Stats
// =========================================================================

async fn balance_stats(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<RangeQuery>,
) -> Result<Json<BalanceStats>, AppError> {
    let range = query.range(settings.max_date_range_days)?;
    let stats = StatsService::new(pool).balance(&context.user_id, &range).await?;
    Ok(Json(stats))
}

async fn category_stats(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<RangeQuery>,
) -> Result<Json<Vec<CategoryStat>>, AppError> {
    let range = query.range(settings.max_date_range_days)?;
    let stats = StatsService::new(pool).categories(&context.user_id, &range).await?;
    Ok(Json(stats))
}

async fn monthly_stats(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<RangeQuery>,
) -> Result<Json<Vec<MonthlyStat>>, AppError> {
    let range = query.range(settings.max_date_range_days)?;
    let stats = StatsService::new(pool).monthly(&context.user_id, &range).await?;
    Ok(Json(stats))
}

// =========================================================================
// History
// =========================================================================

async fn history_periods(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
) -> Result<Json<Vec<i32>>, AppError> {
    let years = StatsService::new(pool).history_periods(&context.user_id).await?;
    Ok(Json(years))
}

async fn history_data(
    State(pool): State<PgPool>,
    Extension(context): Extension<RequestContext>,
    ValidatedQuery(query): ValidatedQuery<HistoryDataQuery>,
) -> Result<Json<Vec<HistoryDataPoint>>, AppError> {
    let period = HistoryPeriod::new(query.timeframe, query.year, query.month)?;
    let points = StatsService::new(pool).history_data(&context.user_id, period).await?;
    Ok(Json(points))
}

// =========================================================================
// Settings
// =========================================================================

async fn get_user_settings(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
) -> Result<Json<UserSettings>, AppError> {
    let user_settings = UserSettingsHandler::new(pool, settings.default_currency)
        .get_or_create(&context)
        .await?;
    Ok(Json(user_settings))
}

async fn update_currency(
    State(pool): State<PgPool>,
    State(settings): State<AppSettings>,
    Extension(context): Extension<RequestContext>,
    ValidatedJson(request): ValidatedJson<UpdateCurrencyRequest>,
) -> Result<Json<UserSettings>, AppError> {
    let currency = request.currency.parse()?;

    let user_settings = UserSettingsHandler::new(pool, settings.default_currency)
        .update_currency(UpdateCurrencyCommand::new(currency), &context)
        .await?;
    Ok(Json(user_settings))
}
