use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::MacroTotals;
use crate::stats::services::MealWithItems;

use super::draft::{DraftItem, DraftTotals, MealDraft};
use super::repo::{Meal, MealItem, MealType};

#[derive(Debug, Serialize)]
pub struct DraftOpened {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub id: Uuid,
    pub meal_name: String,
    pub items: Vec<DraftItem>,
    pub totals: DraftTotals,
}

impl DraftResponse {
    pub fn new(id: Uuid, draft: MealDraft) -> Self {
        let totals = draft.totals();
        Self {
            id,
            meal_name: draft.meal_name,
            items: draft.items,
            totals,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub food_id: Uuid,
    pub amount_g: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount_g: f64,
}

#[derive(Debug, Deserialize)]
pub struct SetNameRequest {
    pub meal_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub meal_type: MealType,
    /// "HH:MM" on today's UTC date.
    pub time_of_day: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub occurred_at: OffsetDateTime,
    pub meal_date: Date,
    pub notes: Option<String>,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            name: m.name,
            meal_type: m.meal_type,
            occurred_at: m.occurred_at,
            meal_date: m.meal_date,
            notes: m.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealSummary {
    pub id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub occurred_at: OffsetDateTime,
    pub meal_date: Date,
    pub notes: Option<String>,
    pub totals: MacroTotals,
    pub items: Vec<MealItem>,
}

impl From<MealWithItems> for MealSummary {
    fn from(m: MealWithItems) -> Self {
        Self {
            id: m.meal.id,
            name: m.meal.name,
            meal_type: m.meal.meal_type,
            occurred_at: m.meal.occurred_at,
            meal_date: m.meal.meal_date,
            notes: m.meal.notes,
            totals: m.totals,
            items: m.items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMealsQuery {
    pub date: Date,
}
