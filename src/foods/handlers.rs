use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, state::AppState};

use super::dto::{BarcodeLookup, CreateFoodRequest, FoodResponse, SearchQuery};
use super::repo::{FoodItem, NewFoodItem};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods", post(create_food))
        .route("/foods/search", get(search_foods))
        .route("/foods/barcode/:barcode", get(food_by_barcode))
        .route("/foods/lookup/:barcode", get(lookup_barcode))
        .route("/foods/:id", get(get_food))
}

fn validate(body: &CreateFoodRequest) -> Result<(), String> {
    if body.name.trim().is_empty() {
        return Err("name is required".into());
    }
    for (field, value) in [
        ("kcal_per_100g", body.kcal_per_100g),
        ("carb_per_100g", body.carb_per_100g),
        ("fat_per_100g", body.fat_per_100g),
        ("protein_per_100g", body.protein_per_100g),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{field} must be a non-negative number"));
        }
    }
    Ok(())
}

#[instrument(skip(state, body))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), (StatusCode, String)> {
    validate(&body).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    let food = FoodItem::create(
        &state.db,
        NewFoodItem {
            user_id,
            name: body.name.trim().to_string(),
            barcode: body.barcode.unwrap_or_default(),
            kcal_per_100g: Some(body.kcal_per_100g),
            carb_per_100g: Some(body.carb_per_100g),
            fat_per_100g: Some(body.fat_per_100g),
            protein_per_100g: Some(body.protein_per_100g),
        },
    )
    .await
    .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(food.into())))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodResponse>, (StatusCode, String)> {
    let food = FoodItem::get(&state.db, id)
        .await
        .map_err(internal)?
        .filter(|f| f.user_id == user_id)
        .ok_or((StatusCode::NOT_FOUND, "Food not found".into()))?;
    Ok(Json(food.into()))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<SearchQuery>,
) -> Result<Json<Vec<FoodResponse>>, (StatusCode, String)> {
    let foods = FoodItem::search_by_name(&state.db, user_id, &p.q)
        .await
        .map_err(internal)?;
    Ok(Json(foods.into_iter().map(FoodResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn food_by_barcode(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(barcode): Path<String>,
) -> Result<Json<Option<FoodResponse>>, (StatusCode, String)> {
    let food = FoodItem::find_by_barcode(&state.db, user_id, &barcode)
        .await
        .map_err(internal)?;
    Ok(Json(food.map(FoodResponse::from)))
}

/// Local store first, Open Food Facts as fallback. The external product is
/// not persisted here; the client confirms it and POSTs /foods.
#[instrument(skip(state))]
pub async fn lookup_barcode(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(barcode): Path<String>,
) -> Result<Json<BarcodeLookup>, (StatusCode, String)> {
    if let Some(food) = FoodItem::find_by_barcode(&state.db, user_id, &barcode)
        .await
        .map_err(internal)?
    {
        return Ok(Json(BarcodeLookup {
            source: "local",
            food_id: Some(food.id),
            name: food.name,
            barcode: food.barcode,
            kcal_per_100g: food.kcal_per_100g,
            carb_per_100g: food.carb_per_100g,
            fat_per_100g: food.fat_per_100g,
            protein_per_100g: food.protein_per_100g,
        }));
    }

    let product = state
        .food_facts
        .product_by_barcode(&barcode)
        .await
        .map_err(|e| {
            error!(error = %e, %barcode, "food facts lookup failed");
            (StatusCode::BAD_GATEWAY, "barcode lookup failed".to_string())
        })?;

    let Some(product) = product else {
        warn!(%barcode, "barcode unknown locally and externally");
        return Err((StatusCode::NOT_FOUND, "Product not found".into()));
    };

    Ok(Json(BarcodeLookup {
        source: "openfoodfacts",
        food_id: None,
        name: product.name,
        barcode: product.barcode,
        kcal_per_100g: product.kcal_per_100g,
        carb_per_100g: product.carb_per_100g,
        fat_per_100g: product.fat_per_100g,
        protein_per_100g: product.protein_per_100g,
    }))
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "foods store error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
