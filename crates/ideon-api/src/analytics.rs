// Dashboard reductions computed server-side over a user's idea set

use ideon_persist::models::IdeaDoc;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated analytics for a set of evaluated ideas
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_ideas: usize,
    pub average_score: f64,
    pub category_count: BTreeMap<String, usize>,
    pub roi_distribution: BTreeMap<String, usize>,
    pub effort_distribution: BTreeMap<String, usize>,
    /// Keys are "{effort_label}-{roi_label}" pairs
    pub effort_vs_roi: BTreeMap<String, usize>,
    /// Score buckets for ideas scoring 60 or above
    pub score_buckets: BTreeMap<String, usize>,
    /// Raw aggregate scores per category, in input order
    pub category_scores: BTreeMap<String, Vec<f64>>,
    /// Idea counts keyed by "YYYY-MM" of creation
    pub ideas_over_time: BTreeMap<String, usize>,
}

pub fn compute_analytics(ideas: &[IdeaDoc]) -> AnalyticsResponse {
    let mut category_count: BTreeMap<String, usize> = BTreeMap::new();
    let mut roi_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut effort_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut effort_vs_roi: BTreeMap<String, usize> = BTreeMap::new();
    let mut score_buckets: BTreeMap<String, usize> = BTreeMap::new();
    let mut category_scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut ideas_over_time: BTreeMap<String, usize> = BTreeMap::new();

    let mut score_sum = 0.0;

    for idea in ideas {
        score_sum += idea.score;

        *category_count.entry(idea.category.clone()).or_default() += 1;
        *roi_distribution.entry(idea.roi_label.clone()).or_default() += 1;
        *effort_distribution
            .entry(idea.effort_label.clone())
            .or_default() += 1;

        let pair = format!("{}-{}", idea.effort_label, idea.roi_label);
        *effort_vs_roi.entry(pair).or_default() += 1;

        if let Some(bucket) = score_bucket(idea.score) {
            *score_buckets.entry(bucket.to_string()).or_default() += 1;
        }

        category_scores
            .entry(idea.category.clone())
            .or_default()
            .push(idea.score);

        let month = idea.created_at.format("%Y-%m").to_string();
        *ideas_over_time.entry(month).or_default() += 1;
    }

    let average_score = if ideas.is_empty() {
        0.0
    } else {
        score_sum / ideas.len() as f64
    };

    AnalyticsResponse {
        total_ideas: ideas.len(),
        average_score,
        category_count,
        roi_distribution,
        effort_distribution,
        effort_vs_roi,
        score_buckets,
        category_scores,
        ideas_over_time,
    }
}

fn score_bucket(score: f64) -> Option<&'static str> {
    if score >= 90.0 {
        Some("90-100")
    } else if score >= 80.0 {
        Some("80-89")
    } else if score >= 70.0 {
        Some("70-79")
    } else if score >= 60.0 {
        Some("60-69")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use chrono::{TimeZone, Utc};

    fn idea(category: &str, effort: &str, roi: &str, score: f64, ym: (i32, u32)) -> IdeaDoc {
        IdeaDoc {
            id: ObjectId::new(),
            user_id: "u1".to_string(),
            idea_id: ObjectId::new().to_hex(),
            batch: None,
            title: "t".to_string(),
            author: "a".to_string(),
            category: category.to_string(),
            description: "d".to_string(),
            effort_score: 0.5,
            effort_label: effort.to_string(),
            roi_score: 0.5,
            roi_label: roi.to_string(),
            score,
            analysis: bson::Bson::Null,
            created_at: Utc.with_ymd_and_hms(ym.0, ym.1, 15, 12, 0, 0).unwrap(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_empty_set() {
        let analytics = compute_analytics(&[]);
        assert_eq!(analytics.total_ideas, 0);
        assert_eq!(analytics.average_score, 0.0);
        assert!(analytics.category_count.is_empty());
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(score_bucket(59.9), None);
        assert_eq!(score_bucket(60.0), Some("60-69"));
        assert_eq!(score_bucket(69.99), Some("60-69"));
        assert_eq!(score_bucket(70.0), Some("70-79"));
        assert_eq!(score_bucket(90.0), Some("90-100"));
        assert_eq!(score_bucket(100.0), Some("90-100"));
    }

    #[test]
    fn test_reductions() {
        let ideas = vec![
            idea("SaaS", "Low", "High", 85.0, (2025, 1)),
            idea("SaaS", "Medium", "High", 72.0, (2025, 1)),
            idea("Health", "High", "Low", 30.0, (2025, 2)),
        ];

        let analytics = compute_analytics(&ideas);

        assert_eq!(analytics.total_ideas, 3);
        assert!((analytics.average_score - 62.333).abs() < 0.01);
        assert_eq!(analytics.category_count["SaaS"], 2);
        assert_eq!(analytics.roi_distribution["High"], 2);
        assert_eq!(analytics.effort_vs_roi["Low-High"], 1);
        assert_eq!(analytics.score_buckets["80-89"], 1);
        assert_eq!(analytics.score_buckets["70-79"], 1);
        assert_eq!(analytics.score_buckets.get("60-69"), None);
        assert_eq!(analytics.category_scores["SaaS"], vec![85.0, 72.0]);
        assert_eq!(analytics.category_scores["Health"], vec![30.0]);
        assert_eq!(analytics.ideas_over_time["2025-01"], 2);
        assert_eq!(analytics.ideas_over_time["2025-02"], 1);
    }

    #[test]
    fn test_category_scores_are_raw_lists() {
        let ideas = vec![
            idea("SaaS", "Low", "High", 85.0, (2025, 1)),
            idea("SaaS", "Medium", "High", 72.0, (2025, 1)),
        ];

        let json = serde_json::to_value(compute_analytics(&ideas)).unwrap();
        let scores = json["categoryScores"]["SaaS"].as_array().unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], 85.0);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(compute_analytics(&[])).unwrap();
        assert!(json.get("categoryCount").is_some());
        assert!(json.get("roiDistribution").is_some());
        assert!(json.get("scoreBuckets").is_some());
        assert!(json.get("ideasOverTime").is_some());
    }
}
