use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Reusable per-100g food definition, owned by one user. Line items copy
/// absolute values out of it at commit time, so later edits never rewrite
/// history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub barcode: String,
    pub kcal_per_100g: Option<f64>,
    pub carb_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewFoodItem {
    pub user_id: Uuid,
    pub name: String,
    pub barcode: String,
    pub kcal_per_100g: Option<f64>,
    pub carb_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
}

impl FoodItem {
    pub async fn create(db: &PgPool, input: NewFoodItem) -> anyhow::Result<FoodItem> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            INSERT INTO food_items
                (user_id, name, barcode, kcal_per_100g, carb_per_100g, fat_per_100g, protein_per_100g)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, barcode,
                      kcal_per_100g, carb_per_100g, fat_per_100g, protein_per_100g, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.barcode)
        .bind(input.kcal_per_100g)
        .bind(input.carb_per_100g)
        .bind(input.fat_per_100g)
        .bind(input.protein_per_100g)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, user_id, name, barcode,
                   kcal_per_100g, carb_per_100g, fat_per_100g, protein_per_100g, created_at
            FROM food_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_barcode(
        db: &PgPool,
        user_id: Uuid,
        barcode: &str,
    ) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, user_id, name, barcode,
                   kcal_per_100g, carb_per_100g, fat_per_100g, protein_per_100g, created_at
            FROM food_items
            WHERE user_id = $1 AND barcode = $2
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(barcode)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn search_by_name(
        db: &PgPool,
        user_id: Uuid,
        query: &str,
    ) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT id, user_id, name, barcode,
                   kcal_per_100g, carb_per_100g, fat_per_100g, protein_per_100g, created_at
            FROM food_items
            WHERE user_id = $1 AND name ILIKE '%' || $2 || '%'
            ORDER BY name ASC
            LIMIT 20
            "#,
        )
        .bind(user_id)
        .bind(query)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
