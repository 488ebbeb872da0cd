use serde::Serialize;

const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroKind {
    Carbs,
    Protein,
    Fat,
}

/// One colored arc of the lap. `start`/`end` are fractions of the full
/// ring, 0 at 12 o'clock, increasing clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingSegment {
    pub kind: MacroKind,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "kcal", rename_all = "snake_case")]
pub enum RingSummary {
    NoTarget,
    Remaining(f64),
    OverBy(f64),
}

/// Geometry of the calorie progress ring. The ring is a race track: one lap
/// is 100% of the target. The first lap is split into macro segments; going
/// past the target switches to a single overflow arc on a second lap,
/// capped at one extra lap no matter how far over the user is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingGeometry {
    pub main_progress: f64,
    pub overflow_ratio: f64,
    pub segments: Vec<RingSegment>,
    /// Draw a single neutral arc of `main_progress` instead of segments:
    /// set when totals exist but the macro breakdown is all zero.
    pub neutral_arc: bool,
    pub summary: RingSummary,
}

/// Pure projection of (today's totals, target, macro grams) onto ring
/// geometry. Deterministic; never divides by a non-positive target.
pub fn ring_geometry(
    current: f64,
    target: f64,
    carb_g: f64,
    protein_g: f64,
    fat_g: f64,
) -> RingGeometry {
    if target <= 0.0 {
        return RingGeometry {
            main_progress: 0.0,
            overflow_ratio: 0.0,
            segments: Vec::new(),
            neutral_arc: false,
            summary: RingSummary::NoTarget,
        };
    }

    let main_progress = (current.min(target) / target).clamp(0.0, 1.0);
    let is_over = current > target;
    let overflow_ratio = if is_over {
        ((current - target) / target).min(1.0)
    } else {
        0.0
    };

    // malformed (negative) grams must not invert the ring
    let carb_kcal = carb_g.max(0.0) * KCAL_PER_G_CARB;
    let protein_kcal = protein_g.max(0.0) * KCAL_PER_G_PROTEIN;
    let fat_kcal = fat_g.max(0.0) * KCAL_PER_G_FAT;
    let total_macro_kcal = carb_kcal + protein_kcal + fat_kcal;

    let mut segments = Vec::new();
    let mut neutral_arc = false;
    if is_over {
        // the overflow lap replaces the macro breakdown
    } else if total_macro_kcal <= 0.0 {
        neutral_arc = main_progress > 0.0;
    } else if main_progress > 0.0 {
        let shares = [
            (MacroKind::Carbs, carb_kcal / total_macro_kcal),
            (MacroKind::Protein, protein_kcal / total_macro_kcal),
            (MacroKind::Fat, fat_kcal / total_macro_kcal),
        ];
        let drawn: Vec<&(MacroKind, f64)> = shares.iter().filter(|(_, s)| *s > 0.0).collect();
        let mut cursor = 0.0;
        for (idx, (kind, share)) in drawn.iter().enumerate() {
            // the last segment absorbs the float remainder, so the spans
            // sum to exactly main_progress and never exceed it
            let end = if idx == drawn.len() - 1 {
                main_progress
            } else {
                cursor + main_progress * share
            };
            if end > cursor {
                segments.push(RingSegment {
                    kind: *kind,
                    start: cursor,
                    end,
                });
            }
            cursor = end;
        }
    }

    let summary = if is_over {
        RingSummary::OverBy(current - target)
    } else {
        RingSummary::Remaining((target - current).max(0.0))
    };

    RingGeometry {
        main_progress,
        overflow_ratio,
        segments,
        neutral_arc,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn zero_target_is_the_no_target_state() {
        for current in [0.0, 500.0, 5000.0] {
            let ring = ring_geometry(current, 0.0, 50.0, 25.0, 10.0);
            assert_eq!(ring.summary, RingSummary::NoTarget);
            assert_eq!(ring.main_progress, 0.0);
            assert_eq!(ring.overflow_ratio, 0.0);
            assert!(ring.segments.is_empty());
        }
        let ring = ring_geometry(500.0, -100.0, 50.0, 25.0, 10.0);
        assert_eq!(ring.summary, RingSummary::NoTarget);
    }

    #[test]
    fn exactly_on_target_fills_the_lap_without_overflow() {
        let ring = ring_geometry(2000.0, 2000.0, 50.0, 25.0, 10.0);
        assert!(close(ring.main_progress, 1.0));
        assert_eq!(ring.overflow_ratio, 0.0);
        assert_eq!(ring.summary, RingSummary::Remaining(0.0));
    }

    #[test]
    fn overflow_is_proportional_and_capped_at_one_lap() {
        let half_over = ring_geometry(3000.0, 2000.0, 50.0, 25.0, 10.0);
        assert!(close(half_over.overflow_ratio, 0.5));
        assert_eq!(half_over.summary, RingSummary::OverBy(1000.0));
        // overflow suppresses the macro segments
        assert!(half_over.segments.is_empty());

        let way_over = ring_geometry(6000.0, 2000.0, 50.0, 25.0, 10.0);
        assert!(close(way_over.overflow_ratio, 1.0));
        assert_eq!(way_over.summary, RingSummary::OverBy(4000.0));
    }

    #[test]
    fn segments_split_main_progress_by_macro_share() {
        // carbs 50g -> 200 kcal, protein 25g -> 100 kcal, fat 10g -> 90 kcal
        let ring = ring_geometry(600.0, 2000.0, 50.0, 25.0, 10.0);
        assert!(close(ring.main_progress, 0.3));

        assert_eq!(ring.segments.len(), 3);
        let total = 390.0;
        assert_eq!(ring.segments[0].kind, MacroKind::Carbs);
        assert!(close(ring.segments[0].start, 0.0));
        assert!(close(ring.segments[0].end, 0.3 * 200.0 / total));
        assert_eq!(ring.segments[1].kind, MacroKind::Protein);
        assert!(close(ring.segments[1].end - ring.segments[1].start, 0.3 * 100.0 / total));
        assert_eq!(ring.segments[2].kind, MacroKind::Fat);

        // segments tile the arc and sum to exactly main_progress
        assert!(close(ring.segments[0].end, ring.segments[1].start));
        assert!(close(ring.segments[1].end, ring.segments[2].start));
        assert_eq!(ring.segments[2].end, ring.main_progress);
        let span_sum: f64 = ring.segments.iter().map(|s| s.end - s.start).sum();
        assert!(close(span_sum, ring.main_progress));
    }

    #[test]
    fn last_drawn_segment_absorbs_the_remainder_when_fat_is_zero() {
        let ring = ring_geometry(600.0, 2000.0, 50.0, 25.0, 0.0);
        assert_eq!(ring.segments.len(), 2);
        assert_eq!(ring.segments[1].kind, MacroKind::Protein);
        assert_eq!(ring.segments[1].end, ring.main_progress);
    }

    #[test]
    fn zero_macros_fall_back_to_the_neutral_arc() {
        let ring = ring_geometry(600.0, 2000.0, 0.0, 0.0, 0.0);
        assert!(ring.segments.is_empty());
        assert!(ring.neutral_arc);
        assert!(close(ring.main_progress, 0.3));

        let empty = ring_geometry(0.0, 2000.0, 0.0, 0.0, 0.0);
        assert!(!empty.neutral_arc);
        assert_eq!(empty.summary, RingSummary::Remaining(2000.0));
    }

    #[test]
    fn negative_grams_are_clamped_not_inverted() {
        let ring = ring_geometry(600.0, 2000.0, -50.0, 25.0, 10.0);
        // carbs clamp to zero, so only protein and fat are drawn
        assert_eq!(ring.segments.len(), 2);
        assert_eq!(ring.segments[0].kind, MacroKind::Protein);
        assert!(ring.segments.iter().all(|s| s.end > s.start));
    }

    #[test]
    fn negative_current_stays_on_the_baseline() {
        let ring = ring_geometry(-100.0, 2000.0, 0.0, 0.0, 0.0);
        assert_eq!(ring.main_progress, 0.0);
        assert_eq!(ring.overflow_ratio, 0.0);
        assert_eq!(ring.summary, RingSummary::Remaining(2100.0));
    }
}
