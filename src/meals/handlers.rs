use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::foods::repo::FoodItem;
use crate::stats;
use crate::{auth::AuthUser, state::AppState};

use super::draft::DraftItem;
use super::dto::{
    AddItemRequest, CommitRequest, DraftOpened, DraftResponse, ListMealsQuery, MealResponse,
    MealSummary, SetNameRequest, UpdateAmountRequest,
};
use super::services::{self, CommitError, MealsError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/drafts", post(open_draft))
        .route("/meals/drafts/:id", get(get_draft).delete(discard_draft))
        .route("/meals/drafts/:id/items", post(add_draft_item))
        .route(
            "/meals/drafts/:id/items/:food_id",
            put(update_draft_item).delete(remove_draft_item),
        )
        .route("/meals/drafts/:id/name", put(set_draft_name))
        .route("/meals/drafts/:id/commit", post(commit_draft))
        .route("/meals/:id", get(get_meal).delete(delete_meal))
}

// --- draft composition ---

#[instrument(skip(state))]
pub async fn open_draft(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> (StatusCode, Json<DraftOpened>) {
    let id = state.drafts.open(user_id);
    (StatusCode::CREATED, Json(DraftOpened { id }))
}

#[instrument(skip(state))]
pub async fn get_draft(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftResponse>, (StatusCode, String)> {
    let session = state
        .drafts
        .get(id, user_id)
        .ok_or((StatusCode::NOT_FOUND, "Draft session not found".into()))?;
    Ok(Json(DraftResponse::new(id, session.draft)))
}

#[instrument(skip(state, body))]
pub async fn add_draft_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<DraftResponse>, (StatusCode, String)> {
    if !body.amount_g.is_finite() {
        return Err((StatusCode::BAD_REQUEST, "amount_g must be a number".into()));
    }

    // Snapshot the reference at add time; commit re-reads it.
    let food = FoodItem::get(&state.db, body.food_id)
        .await
        .map_err(internal)?
        .filter(|f| f.user_id == user_id)
        .ok_or((StatusCode::NOT_FOUND, "Food not found".into()))?;

    let item = DraftItem {
        food_id: food.id,
        name: food.name,
        amount_g: body.amount_g,
        kcal_per_100g: food.kcal_per_100g.unwrap_or(0.0),
        carb_per_100g: food.carb_per_100g.unwrap_or(0.0),
        fat_per_100g: food.fat_per_100g.unwrap_or(0.0),
        protein_per_100g: food.protein_per_100g.unwrap_or(0.0),
    };
    let draft = state
        .drafts
        .update_draft(id, user_id, |d| d.add_item(item))
        .ok_or((StatusCode::NOT_FOUND, "Draft session not found".into()))?;
    Ok(Json(DraftResponse::new(id, draft)))
}

#[instrument(skip(state))]
pub async fn update_draft_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, food_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateAmountRequest>,
) -> Result<Json<DraftResponse>, (StatusCode, String)> {
    let draft = state
        .drafts
        .update_draft(id, user_id, |d| d.update_item_amount(food_id, body.amount_g))
        .ok_or((StatusCode::NOT_FOUND, "Draft session not found".into()))?;
    Ok(Json(DraftResponse::new(id, draft)))
}

#[instrument(skip(state))]
pub async fn remove_draft_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, food_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DraftResponse>, (StatusCode, String)> {
    let draft = state
        .drafts
        .update_draft(id, user_id, |d| d.remove_item(food_id))
        .ok_or((StatusCode::NOT_FOUND, "Draft session not found".into()))?;
    Ok(Json(DraftResponse::new(id, draft)))
}

#[instrument(skip(state, body))]
pub async fn set_draft_name(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetNameRequest>,
) -> Result<Json<DraftResponse>, (StatusCode, String)> {
    let draft = state
        .drafts
        .update_draft(id, user_id, |d| d.set_meal_name(body.meal_name))
        .ok_or((StatusCode::NOT_FOUND, "Draft session not found".into()))?;
    Ok(Json(DraftResponse::new(id, draft)))
}

#[instrument(skip(state))]
pub async fn discard_draft(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let existed = services::discard_session(&state, id, user_id)
        .await
        .map_err(meals_error)?;
    if existed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Draft session not found".into()))
    }
}

#[instrument(skip(state, body))]
pub async fn commit_draft(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CommitRequest>,
) -> Result<(StatusCode, Json<MealResponse>), (StatusCode, String)> {
    let meal = services::commit_draft(&state, id, user_id, &body)
        .await
        .map_err(commit_error)?;
    Ok((StatusCode::CREATED, Json(meal.into())))
}

// --- persisted meals ---

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<ListMealsQuery>,
) -> Result<Json<Vec<MealSummary>>, (StatusCode, String)> {
    let meals = stats::services::meals_for_date(&state, user_id, p.date)
        .await
        .map_err(internal)?;
    Ok(Json(meals.into_iter().map(MealSummary::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealSummary>, (StatusCode, String)> {
    let meal = stats::services::meal_with_items(&state, user_id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Meal not found".into()))?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    services::delete_meal(&state, user_id, id)
        .await
        .map_err(meals_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- error mapping ---

fn commit_error(e: CommitError) -> (StatusCode, String) {
    let status = match &e {
        CommitError::UnknownSession => StatusCode::NOT_FOUND,
        CommitError::EmptyDraft | CommitError::InvalidTime(_) => StatusCode::BAD_REQUEST,
        CommitError::FoodNotFound(_) | CommitError::Partial { .. } => StatusCode::CONFLICT,
        CommitError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "commit failed");
    }
    (status, e.to_string())
}

fn meals_error(e: MealsError) -> (StatusCode, String) {
    match e {
        MealsError::NotFound => (StatusCode::NOT_FOUND, "Meal not found".into()),
        MealsError::Store(e) => internal(e),
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "meals store error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
