use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a meal under composition. The per-100g fields are a snapshot
/// of the food reference taken when the line was added; commit re-reads the
/// store (see `services::commit_draft`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftItem {
    pub food_id: Uuid,
    pub name: String,
    pub amount_g: f64,
    pub kcal_per_100g: f64,
    pub carb_per_100g: f64,
    pub fat_per_100g: f64,
    pub protein_per_100g: f64,
}

/// Rounded draft summary shown while composing. Sums run in floating point
/// and round once at the end; persisted line items round per item instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DraftTotals {
    pub kcal: i64,
    pub carb: i64,
    pub fat: i64,
    pub protein: i64,
}

/// A meal being composed. Plain value: every operation consumes the draft
/// and returns the updated one, so the session registry is the only place
/// holding mutable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealDraft {
    pub meal_name: String,
    pub items: Vec<DraftItem>,
}

impl MealDraft {
    /// Add a line, or grow the existing line's amount when the food is
    /// already in the draft. The first snapshot's per-100g values win.
    pub fn add_item(mut self, item: DraftItem) -> Self {
        match self.items.iter_mut().find(|i| i.food_id == item.food_id) {
            Some(existing) => existing.amount_g += item.amount_g,
            None => self.items.push(item),
        }
        self
    }

    /// Drop the line for `food_id`; no-op when absent.
    pub fn remove_item(mut self, food_id: Uuid) -> Self {
        self.items.retain(|i| i.food_id != food_id);
        self
    }

    /// Replace a line's amount in place. Non-finite input counts as zero.
    pub fn update_item_amount(mut self, food_id: Uuid, amount_g: f64) -> Self {
        let amount_g = if amount_g.is_finite() { amount_g } else { 0.0 };
        if let Some(item) = self.items.iter_mut().find(|i| i.food_id == food_id) {
            item.amount_g = amount_g;
        }
        self
    }

    pub fn set_meal_name(mut self, name: impl Into<String>) -> Self {
        self.meal_name = name.into();
        self
    }

    /// Projected totals over the current lines.
    pub fn totals(&self) -> DraftTotals {
        let mut kcal = 0.0;
        let mut carb = 0.0;
        let mut fat = 0.0;
        let mut protein = 0.0;
        for it in &self.items {
            kcal += it.kcal_per_100g * it.amount_g / 100.0;
            carb += it.carb_per_100g * it.amount_g / 100.0;
            fat += it.fat_per_100g * it.amount_g / 100.0;
            protein += it.protein_per_100g * it.amount_g / 100.0;
        }
        DraftTotals {
            kcal: kcal.round() as i64,
            carb: carb.round() as i64,
            fat: fat.round() as i64,
            protein: protein.round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(food_id: Uuid, amount_g: f64, kcal_per_100g: f64) -> DraftItem {
        DraftItem {
            food_id,
            name: "Oats".into(),
            amount_g,
            kcal_per_100g,
            carb_per_100g: 60.0,
            fat_per_100g: 7.0,
            protein_per_100g: 13.0,
        }
    }

    #[test]
    fn adding_same_food_twice_merges_amounts() {
        let id = Uuid::new_v4();
        let draft = MealDraft::default()
            .add_item(item(id, 40.0, 370.0))
            .add_item(item(id, 60.0, 370.0));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].amount_g, 100.0);
    }

    #[test]
    fn merge_keeps_the_first_snapshot() {
        let id = Uuid::new_v4();
        let mut second = item(id, 60.0, 999.0);
        second.name = "Renamed oats".into();
        let draft = MealDraft::default()
            .add_item(item(id, 40.0, 370.0))
            .add_item(second);
        assert_eq!(draft.items[0].kcal_per_100g, 370.0);
        assert_eq!(draft.items[0].name, "Oats");
    }

    #[test]
    fn remove_is_noop_for_unknown_food() {
        let id = Uuid::new_v4();
        let draft = MealDraft::default().add_item(item(id, 40.0, 370.0));
        let draft = draft.remove_item(Uuid::new_v4());
        assert_eq!(draft.items.len(), 1);
        let draft = draft.remove_item(id);
        assert!(draft.items.is_empty());
    }

    #[test]
    fn update_amount_treats_non_finite_as_zero() {
        let id = Uuid::new_v4();
        let draft = MealDraft::default()
            .add_item(item(id, 40.0, 370.0))
            .update_item_amount(id, f64::NAN);
        assert_eq!(draft.items[0].amount_g, 0.0);
        let draft = draft.update_item_amount(id, 85.5);
        assert_eq!(draft.items[0].amount_g, 85.5);
    }

    #[test]
    fn totals_round_after_summing() {
        // 150g of 200 kcal/100g plus 50g of 80 kcal/100g -> 300 + 40
        let draft = MealDraft::default()
            .add_item(item(Uuid::new_v4(), 150.0, 200.0))
            .add_item(item(Uuid::new_v4(), 50.0, 80.0));
        assert_eq!(draft.totals().kcal, 340);
    }

    #[test]
    fn totals_are_insertion_order_independent() {
        let a = item(Uuid::new_v4(), 123.0, 215.0);
        let b = item(Uuid::new_v4(), 45.5, 87.0);
        let c = item(Uuid::new_v4(), 12.0, 530.0);
        let forward = MealDraft::default()
            .add_item(a.clone())
            .add_item(b.clone())
            .add_item(c.clone())
            .totals();
        let backward = MealDraft::default()
            .add_item(c)
            .add_item(b)
            .add_item(a)
            .totals();
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_draft_totals_are_zero() {
        assert_eq!(MealDraft::default().totals(), DraftTotals::default());
    }
}
