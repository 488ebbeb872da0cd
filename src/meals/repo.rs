use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Breakfast
    }
}

/// Persisted meal header. `meal_date` is derived from `occurred_at` in UTC
/// at create time and is the aggregation key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub occurred_at: OffsetDateTime,
    pub meal_date: Date,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Persisted line item. The nutrition fields are absolute values computed
/// at commit time; they are a point-in-time fact, not a live projection of
/// the food reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealItem {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub amount_g: f64,
    pub kcal: i64,
    pub carb_g: i64,
    pub fat_g: i64,
    pub protein_g: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub occurred_at: OffsetDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMealItem {
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub amount_g: f64,
    pub kcal: i64,
    pub carb_g: i64,
    pub fat_g: i64,
    pub protein_g: i64,
}

impl Meal {
    pub async fn create(db: &PgPool, input: NewMeal) -> anyhow::Result<Meal> {
        let meal_date = dates::utc_date(input.occurred_at);
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (user_id, name, meal_type, occurred_at, meal_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, meal_type, occurred_at, meal_date, notes, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(input.meal_type)
        .bind(input.occurred_at)
        .bind(meal_date)
        .bind(&input.notes)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, meal_type, occurred_at, meal_date, notes, created_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Meals whose `meal_date` falls in `[start, end)`, earliest first.
    pub async fn list_by_date_range(
        db: &PgPool,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, meal_type, occurred_at, meal_date, notes, created_at
            FROM meals
            WHERE user_id = $1 AND meal_date >= $2 AND meal_date < $3
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Delete the header only. Line items must already be gone; use
    /// `services::delete_meal` for the cascading variant.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM meals WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl MealItem {
    pub async fn create(db: &PgPool, input: NewMealItem) -> anyhow::Result<MealItem> {
        let row = sqlx::query_as::<_, MealItem>(
            r#"
            INSERT INTO meal_items (meal_id, food_id, amount_g, kcal, carb_g, fat_g, protein_g)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, meal_id, food_id, amount_g, kcal, carb_g, fat_g, protein_g, created_at
            "#,
        )
        .bind(input.meal_id)
        .bind(input.food_id)
        .bind(input.amount_g)
        .bind(input.kcal)
        .bind(input.carb_g)
        .bind(input.fat_g)
        .bind(input.protein_g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_by_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<Vec<MealItem>> {
        let rows = sqlx::query_as::<_, MealItem>(
            r#"
            SELECT id, meal_id, food_id, amount_g, kcal, carb_g, fat_g, protein_g, created_at
            FROM meal_items
            WHERE meal_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(meal_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete_by_meal(db: &PgPool, meal_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM meal_items WHERE meal_id = $1"#)
            .bind(meal_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
