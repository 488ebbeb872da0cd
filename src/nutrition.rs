use serde::Serialize;

/// Scale a per-100g reference value to an absolute value for `amount_g`
/// grams, rounded to the nearest whole unit. Missing or non-finite
/// reference values scale to 0.
pub fn scale(per_100: Option<f64>, amount_g: f64) -> i64 {
    match per_100 {
        Some(v) if v.is_finite() && amount_g.is_finite() => (v * amount_g / 100.0).round() as i64,
        _ => 0,
    }
}

/// Summed macro values for one meal or one day. Kcal and grams are whole
/// units; line items are rounded once at commit time and summed as integers
/// from then on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MacroTotals {
    pub kcal: i64,
    pub carb_g: i64,
    pub fat_g: i64,
    pub protein_g: i64,
}

impl MacroTotals {
    pub const ZERO: MacroTotals = MacroTotals {
        kcal: 0,
        carb_g: 0,
        fat_g: 0,
        protein_g: 0,
    };

    pub fn add(self, other: MacroTotals) -> MacroTotals {
        MacroTotals {
            kcal: self.kcal + other.kcal,
            carb_g: self.carb_g + other.carb_g,
            fat_g: self.fat_g + other.fat_g,
            protein_g: self.protein_g + other.protein_g,
        }
    }
}

impl std::iter::Sum for MacroTotals {
    fn sum<I: Iterator<Item = MacroTotals>>(iter: I) -> Self {
        iter.fold(MacroTotals::ZERO, MacroTotals::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_to_nearest_unit() {
        assert_eq!(scale(Some(200.0), 150.0), 300);
        assert_eq!(scale(Some(80.0), 50.0), 40);
        assert_eq!(scale(Some(3.3), 45.0), 1); // 1.485 rounds down
        assert_eq!(scale(Some(3.4), 45.0), 2); // 1.53 rounds up
    }

    #[test]
    fn scale_zero_amount_is_zero() {
        assert_eq!(scale(Some(870.5), 0.0), 0);
        assert_eq!(scale(Some(0.0), 250.0), 0);
    }

    #[test]
    fn scale_missing_reference_is_zero() {
        assert_eq!(scale(None, 120.0), 0);
        assert_eq!(scale(Some(f64::NAN), 120.0), 0);
        assert_eq!(scale(Some(f64::INFINITY), 120.0), 0);
    }

    #[test]
    fn totals_sum_over_empty_is_zero() {
        let sum: MacroTotals = std::iter::empty().sum();
        assert_eq!(sum, MacroTotals::ZERO);
    }

    #[test]
    fn totals_sum_is_order_independent() {
        let a = MacroTotals { kcal: 300, carb_g: 20, fat_g: 10, protein_g: 25 };
        let b = MacroTotals { kcal: 40, carb_g: 5, fat_g: 1, protein_g: 2 };
        let c = MacroTotals { kcal: 120, carb_g: 12, fat_g: 4, protein_g: 9 };
        let forward: MacroTotals = [a, b, c].into_iter().sum();
        let backward: MacroTotals = [c, b, a].into_iter().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward.kcal, 460);
    }
}
