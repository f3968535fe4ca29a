use serde::{Deserialize, Serialize};

/// Relative weight of the two estimates in the aggregate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub roi: f64,
    pub effort: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            roi: 0.6,
            effort: 0.4,
        }
    }
}

/// Combination rule turning the two 0..=1 estimates into a 0..=100 rank
///
/// Pluggable so a deployment can swap the rule without touching the pipeline.
pub trait ScoreAggregator: Send + Sync {
    fn aggregate(&self, roi_score: f64, effort_score: f64) -> f64;
}

/// Default rule: weighted sum where low effort counts in favor
pub struct WeightedAggregator {
    weights: ScoreWeights,
}

impl WeightedAggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }
}

impl Default for WeightedAggregator {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl ScoreAggregator for WeightedAggregator {
    fn aggregate(&self, roi_score: f64, effort_score: f64) -> f64 {
        let roi = roi_score.clamp(0.0, 1.0);
        let effort = effort_score.clamp(0.0, 1.0);
        let combined = self.weights.roi * roi + self.weights.effort * (1.0 - effort);
        (100.0 * combined).clamp(0.0, 100.0)
    }
}

/// Band label for a 0..=1 estimate
pub fn band_label(score: f64) -> &'static str {
    if score < 0.34 {
        "Low"
    } else if score < 0.67 {
        "Medium"
    } else {
        "High"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_case_scores_one_hundred() {
        let agg = WeightedAggregator::default();
        assert_eq!(agg.aggregate(1.0, 0.0), 100.0);
    }

    #[test]
    fn worst_case_scores_zero() {
        let agg = WeightedAggregator::default();
        assert_eq!(agg.aggregate(0.0, 1.0), 0.0);
    }

    #[test]
    fn default_weights_are_honored() {
        let agg = WeightedAggregator::default();
        // 0.6 * 0.5 + 0.4 * (1 - 0.5) = 0.5
        assert!((agg.aggregate(0.5, 0.5) - 50.0).abs() < 1e-9);
        // 0.6 * 1.0 + 0.4 * (1 - 1.0) = 0.6
        assert!((agg.aggregate(1.0, 1.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let agg = WeightedAggregator::default();
        assert_eq!(agg.aggregate(5.0, -2.0), 100.0);
    }

    #[test]
    fn band_labels() {
        assert_eq!(band_label(0.0), "Low");
        assert_eq!(band_label(0.33), "Low");
        assert_eq!(band_label(0.34), "Medium");
        assert_eq!(band_label(0.66), "Medium");
        assert_eq!(band_label(0.67), "High");
        assert_eq!(band_label(1.0), "High");
    }
}
