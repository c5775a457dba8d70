//! Crop scoring: triangular membership per axis, weighted into a composite.

use serde::Serialize;

use crate::aggregate::round_to;
use crate::catalog::{CropProfile, Range, CATALOG};

const TEMPERATURE_WEIGHT: f64 = 0.4;
const RAINFALL_WEIGHT: f64 = 0.4;
const SOIL_PH_WEIGHT: f64 = 0.2;

/// Composite scores at or below this are dropped from recommendations.
pub const MIN_MATCH_SCORE: f64 = 0.15;

/// A recommended crop and its composite score in (0.15, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropMatch {
    pub name: &'static str,
    pub score: f64,
}

impl CropMatch {
    /// Score as a whole percentage for display.
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}

/// Triangular membership of `x` in `[min, max]`.
///
/// 1.0 at the midpoint, falling linearly to 0.0 at either bound, 0.0 outside.
/// Non-finite input and empty ranges score 0.0.
pub fn score_range(x: f64, min: f64, max: f64) -> f64 {
    if !x.is_finite() || x < min || x > max {
        return 0.0;
    }
    let span = (max - min) / 2.0;
    if span <= 0.0 {
        return 0.0;
    }
    let mid = (min + max) / 2.0;
    (1.0 - (x - mid).abs() / span).max(0.0)
}

fn axis(x: f64, range: Range) -> f64 {
    score_range(x, range.min, range.max)
}

fn composite(crop: &CropProfile, avg_temp: f64, total_rain: f64, soil_ph: f64) -> f64 {
    let score = TEMPERATURE_WEIGHT * axis(avg_temp, crop.temperature)
        + RAINFALL_WEIGHT * axis(total_rain, crop.rainfall)
        + SOIL_PH_WEIGHT * axis(soil_ph, crop.soil_ph);
    round_to(score, 2)
}

/// Score `catalog` and return matches above [`MIN_MATCH_SCORE`], best first.
///
/// Equal scores keep catalog order.
pub fn recommend_with(
    catalog: &[CropProfile],
    avg_temp: f64,
    total_rain: f64,
    soil_ph: f64,
) -> Vec<CropMatch> {
    let mut matches: Vec<CropMatch> = catalog
        .iter()
        .map(|crop| CropMatch {
            name: crop.name,
            score: composite(crop, avg_temp, total_rain, soil_ph),
        })
        .filter(|m| m.score > MIN_MATCH_SCORE)
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Score the built-in [`CATALOG`].
pub fn recommend_crops(avg_temp: f64, total_rain: f64, soil_ph: f64) -> Vec<CropMatch> {
    recommend_with(&CATALOG, avg_temp, total_rain, soil_ph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn names(matches: &[CropMatch]) -> Vec<&'static str> {
        matches.iter().map(|m| m.name).collect()
    }

    #[test]
    fn test_score_range_midpoint_is_one() {
        assert_relative_eq!(score_range(22.0, 18.0, 26.0), 1.0);
        assert_relative_eq!(score_range(6.25, 5.0, 7.5), 1.0);
    }

    #[test]
    fn test_score_range_bounds_are_zero() {
        assert_eq!(score_range(18.0, 18.0, 26.0), 0.0);
        assert_eq!(score_range(26.0, 18.0, 26.0), 0.0);
    }

    #[test]
    fn test_score_range_outside_is_zero() {
        assert_eq!(score_range(17.9, 18.0, 26.0), 0.0);
        assert_eq!(score_range(200.1, 70.0, 200.0), 0.0);
    }

    #[test]
    fn test_score_range_linear_decay() {
        assert_relative_eq!(score_range(20.0, 18.0, 26.0), 0.5);
        assert_relative_eq!(score_range(120.0, 70.0, 200.0), 1.0 - 15.0 / 65.0);
    }

    #[test]
    fn test_score_range_stays_in_unit_interval() {
        for crop in &CATALOG {
            let r = crop.rainfall;
            let steps = 50;
            for i in 0..=steps {
                let x = r.min + (r.max - r.min) * f64::from(i) / f64::from(steps);
                let s = score_range(x, r.min, r.max);
                assert!((0.0..=1.0).contains(&s), "{} -> {}", x, s);
            }
        }
    }

    #[test]
    fn test_score_range_degenerate_inputs() {
        assert_eq!(score_range(f64::NAN, 0.0, 10.0), 0.0);
        assert_eq!(score_range(f64::INFINITY, 0.0, 10.0), 0.0);
        assert_eq!(score_range(5.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_humid_mild_week_favours_rice() {
        let recs = recommend_crops(22.0, 120.0, 6.0);
        assert_eq!(names(&recs), vec!["Rice", "Maize", "Soybean", "Millets"]);
        assert_relative_eq!(recs[0].score, 0.84);
        assert_relative_eq!(recs[1].score, 0.29);
        assert!(!names(&recs).contains(&"Cotton"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // Soybean and Millets both land on 0.16
        let recs = recommend_crops(22.0, 120.0, 6.0);
        assert_relative_eq!(recs[2].score, 0.16);
        assert_relative_eq!(recs[3].score, 0.16);
        assert_eq!(recs[2].name, "Soybean");
        assert_eq!(recs[3].name, "Millets");
    }

    #[test]
    fn test_hot_dry_week_favours_millets() {
        let recs = recommend_crops(30.0, 15.0, 5.2);
        assert_eq!(names(&recs), vec!["Millets", "Cotton"]);
        assert_relative_eq!(recs[0].score, 0.83);
        assert_relative_eq!(recs[1].score, 0.53);
    }

    #[test]
    fn test_composite_rounds_stored_value() {
        // Rice sums to just under 0.345 and must not round up past Cotton
        let recs = recommend_crops(21.45, 17.2, 7.22);
        assert_eq!(names(&recs), vec!["Millets", "Cotton", "Rice", "Soybean"]);
        assert_relative_eq!(recs[1].score, 0.35);
        assert_relative_eq!(recs[2].score, 0.34);
    }

    #[test]
    fn test_nothing_matches_extreme_conditions() {
        assert!(recommend_crops(-10.0, 500.0, 2.0).is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let catalog = [CropProfile {
            name: "Test",
            temperature: Range::new(0.0, 10.0),
            rainfall: Range::new(0.0, 10.0),
            soil_ph: Range::new(0.0, 10.0),
        }];
        // pH axis alone at 0.75 gives exactly 0.15
        let recs = recommend_with(&catalog, 50.0, 50.0, 3.75);
        assert!(recs.is_empty());
        // 0.2 * 0.8 = 0.16 survives
        let recs = recommend_with(&catalog, 50.0, 50.0, 4.0);
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_output_invariants() {
        let grid = [
            (12.0, 40.0, 6.8),
            (24.0, 80.0, 6.2),
            (28.0, 25.0, 7.0),
            (19.0, 150.0, 5.4),
            (0.0, 0.0, 0.0),
        ];
        for (t, r, p) in grid {
            let recs = recommend_crops(t, r, p);
            assert!(recs.len() <= CATALOG.len());
            let unique: HashSet<&str> = recs.iter().map(|m| m.name).collect();
            assert_eq!(unique.len(), recs.len());
            assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(recs.iter().all(|m| m.score > MIN_MATCH_SCORE && m.score <= 1.0));
        }
    }

    #[test]
    fn test_percent() {
        let m = CropMatch {
            name: "Rice",
            score: 0.84,
        };
        assert_eq!(m.percent(), 84);
    }

    #[test]
    fn test_match_serializes_name_and_score() {
        let m = CropMatch {
            name: "Wheat",
            score: 0.5,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Wheat", "score": 0.5}));
    }
}
