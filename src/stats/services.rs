use futures::future::try_join_all;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::repo::{Meal, MealItem};
use crate::nutrition::MacroTotals;
use crate::{dates, state::AppState};

/// A meal together with its line items and their integer-summed subtotal.
#[derive(Debug, Clone)]
pub struct MealWithItems {
    pub meal: Meal,
    pub items: Vec<MealItem>,
    pub totals: MacroTotals,
}

/// Per-meal subtotal: the elementwise sum of its line items. Line items
/// were rounded at commit time, so this is pure integer arithmetic.
pub fn meal_totals(items: &[MealItem]) -> MacroTotals {
    items
        .iter()
        .map(|it| MacroTotals {
            kcal: it.kcal,
            carb_g: it.carb_g,
            fat_g: it.fat_g,
            protein_g: it.protein_g,
        })
        .sum()
}

/// Meals of one calendar day, earliest first, each with its items. Line
/// items are fetched with one request per meal, all in flight at once.
pub async fn meals_for_date(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Vec<MealWithItems>> {
    let (start, end) = dates::day_range(date);
    let meals = Meal::list_by_date_range(&state.db, user_id, start, end).await?;
    let items = try_join_all(meals.iter().map(|m| MealItem::list_by_meal(&state.db, m.id))).await?;
    Ok(meals
        .into_iter()
        .zip(items)
        .map(|(meal, items)| {
            let totals = meal_totals(&items);
            MealWithItems { meal, items, totals }
        })
        .collect())
}

pub async fn meal_with_items(
    state: &AppState,
    user_id: Uuid,
    meal_id: Uuid,
) -> anyhow::Result<Option<MealWithItems>> {
    let Some(meal) = Meal::get(&state.db, user_id, meal_id).await? else {
        return Ok(None);
    };
    let items = MealItem::list_by_meal(&state.db, meal.id).await?;
    let totals = meal_totals(&items);
    Ok(Some(MealWithItems { meal, items, totals }))
}

/// Day-level totals: the fold of per-meal subtotals. Zero vector for a day
/// with no meals; meals on other dates never contribute.
pub async fn daily_totals(
    state: &AppState,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<MacroTotals> {
    let meals = meals_for_date(state, user_id, date).await?;
    Ok(meals.into_iter().map(|m| m.totals).sum())
}

/// Totals for the 7 days ending at `end`, clamped to today. One
/// `daily_totals` per date, all issued concurrently; each entry carries its
/// date so a navigating client can discard superseded responses.
pub async fn weekly_totals(
    state: &AppState,
    user_id: Uuid,
    end: Date,
) -> anyhow::Result<Vec<(Date, MacroTotals)>> {
    let today = dates::utc_date(OffsetDateTime::now_utc());
    let days = dates::week_window(end, today);
    let totals = try_join_all(days.iter().map(|d| daily_totals(state, user_id, *d))).await?;
    Ok(days.into_iter().zip(totals).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn item(kcal: i64, carb_g: i64, fat_g: i64, protein_g: i64) -> MealItem {
        MealItem {
            id: Uuid::new_v4(),
            meal_id: Uuid::new_v4(),
            food_id: Uuid::new_v4(),
            amount_g: 100.0,
            kcal,
            carb_g,
            fat_g,
            protein_g,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn meal_totals_is_the_elementwise_sum() {
        let items = vec![item(300, 20, 10, 25), item(40, 5, 1, 2)];
        let totals = meal_totals(&items);
        assert_eq!(totals.kcal, 340);
        assert_eq!(totals.carb_g, 25);
        assert_eq!(totals.fat_g, 11);
        assert_eq!(totals.protein_g, 27);
    }

    #[test]
    fn meal_totals_over_no_items_is_zero() {
        assert_eq!(meal_totals(&[]), MacroTotals::ZERO);
    }

    #[test]
    fn day_fold_is_order_independent() {
        let a = meal_totals(&[item(300, 20, 10, 25)]);
        let b = meal_totals(&[item(40, 5, 1, 2), item(120, 12, 4, 9)]);
        let forward: MacroTotals = [a, b].into_iter().sum();
        let backward: MacroTotals = [b, a].into_iter().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.kcal, 460);
    }
}
