use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored idea record
///
/// One document per evaluated idea. The upsert identity within a user's data
/// is `(idea_id, batch)`, so re-uploading a batch file overwrites its rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owner (User `_id` hex)
    pub user_id: String,
    /// Ordinal within a batch upload, or a UUID for single submissions
    pub idea_id: String,
    /// Source filename, absent for single submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub effort_score: f64,
    pub effort_label: String,
    pub roi_score: f64,
    pub roi_label: String,
    /// Aggregate ranking score, 0..=100
    pub score: f64,
    /// Full evaluation payload: reasoning, details, search context
    pub analysis: bson::Bson,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IdeaDoc {
        IdeaDoc {
            id: ObjectId::new(),
            user_id: "u1".into(),
            idea_id: "1".into(),
            batch: None,
            title: "Test".into(),
            author: "".into(),
            category: "Uncategorized".into(),
            description: "desc".into(),
            effort_score: 0.4,
            effort_label: "Medium".into(),
            roi_score: 0.8,
            roi_label: "High".into(),
            score: 72.0,
            analysis: bson::Bson::Document(bson::doc! {}),
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn none_batch_is_omitted() {
        let doc = bson::to_document(&sample()).unwrap();
        assert!(!doc.contains_key("batch"));
    }

    #[test]
    fn roundtrips_through_bson() {
        let idea = sample();
        let doc = bson::to_document(&idea).unwrap();
        let back: IdeaDoc = bson::from_document(doc).unwrap();
        assert_eq!(back.idea_id, idea.idea_id);
        assert_eq!(back.score, idea.score);
    }
}
