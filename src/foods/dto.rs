use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::FoodItem;

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    pub kcal_per_100g: f64,
    pub carb_per_100g: f64,
    pub fat_per_100g: f64,
    pub protein_per_100g: f64,
}

#[derive(Debug, Serialize)]
pub struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub barcode: String,
    pub kcal_per_100g: Option<f64>,
    pub carb_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub created_at: OffsetDateTime,
}

impl From<FoodItem> for FoodResponse {
    fn from(f: FoodItem) -> Self {
        Self {
            id: f.id,
            name: f.name,
            barcode: f.barcode,
            kcal_per_100g: f.kcal_per_100g,
            carb_per_100g: f.carb_per_100g,
            fat_per_100g: f.fat_per_100g,
            protein_per_100g: f.protein_per_100g,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Barcode lookup result: the user's own food row when one exists,
/// otherwise the external product for the client to confirm and save.
#[derive(Debug, Serialize)]
pub struct BarcodeLookup {
    pub source: &'static str,
    pub food_id: Option<Uuid>,
    pub name: String,
    pub barcode: String,
    pub kcal_per_100g: Option<f64>,
    pub carb_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
}
