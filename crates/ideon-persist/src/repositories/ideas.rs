use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::error::{PersistError, Result};
use crate::models::IdeaDoc;

#[derive(Clone)]
pub struct IdeaRepository {
    collection: Collection<IdeaDoc>,
}

impl IdeaRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("ideas");
        Self { collection }
    }

    /// Upsert key: `(user_id, idea_id, batch)`
    fn upsert_filter(idea: &IdeaDoc) -> Document {
        let mut filter = doc! {
            "user_id": &idea.user_id,
            "idea_id": &idea.idea_id,
        };
        match &idea.batch {
            Some(batch) => {
                filter.insert("batch", batch);
            }
            None => {
                filter.insert("batch", doc! { "$exists": false });
            }
        }
        filter
    }

    fn owner_filter(user_id: &str) -> Document {
        doc! { "user_id": user_id }
    }

    fn id_filter(id: ObjectId, user_id: &str) -> Document {
        doc! { "_id": id, "user_id": user_id }
    }

    fn lookup_filter(user_id: &str, idea_id: &str, batch: Option<&str>) -> Document {
        let mut filter = doc! { "user_id": user_id, "idea_id": idea_id };
        if let Some(batch) = batch {
            filter.insert("batch", batch);
        }
        filter
    }

    fn batch_filter(user_id: &str, batch: &str) -> Document {
        doc! { "user_id": user_id, "batch": batch }
    }

    /// Insert or overwrite one scored idea, returning the stored record
    ///
    /// `_id` and `created_at` are only written on insert, so re-uploading a
    /// batch keeps the original identity and creation time.
    pub async fn upsert(&self, idea: &IdeaDoc) -> Result<IdeaDoc> {
        let filter = Self::upsert_filter(idea);

        let mut set_doc = bson::to_document(idea)?;
        set_doc.remove("_id");
        set_doc.remove("created_at");

        let update = doc! {
            "$set": set_doc,
            "$setOnInsert": {
                "_id": idea.id,
                "created_at": bson::to_bson(&idea.created_at)?,
            },
        };

        self.collection
            .update_one(filter.clone(), update)
            .upsert(true)
            .await?;

        self.collection
            .find_one(filter)
            .await?
            .ok_or_else(|| PersistError::IdeaNotFound(idea.idea_id.clone()))
    }

    /// All ideas owned by a user
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<IdeaDoc>> {
        let ideas = self
            .collection
            .find(Self::owner_filter(user_id))
            .await?
            .try_collect()
            .await?;
        Ok(ideas)
    }

    /// One idea by document id, owner-scoped
    pub async fn get(&self, id: ObjectId, user_id: &str) -> Result<Option<IdeaDoc>> {
        Ok(self
            .collection
            .find_one(Self::id_filter(id, user_id))
            .await?)
    }

    /// One idea by its batch ordinal, owner-scoped
    pub async fn lookup(
        &self,
        user_id: &str,
        idea_id: &str,
        batch: Option<&str>,
    ) -> Result<Option<IdeaDoc>> {
        Ok(self
            .collection
            .find_one(Self::lookup_filter(user_id, idea_id, batch))
            .await?)
    }

    /// Top ideas within one batch, aggregate score descending
    pub async fn top_for_batch(
        &self,
        user_id: &str,
        batch: &str,
        limit: i64,
    ) -> Result<Vec<IdeaDoc>> {
        let ideas = self
            .collection
            .find(Self::batch_filter(user_id, batch))
            .sort(doc! { "score": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(ideas)
    }

    /// Top ideas across all of a user's batches
    pub async fn top_overall(&self, user_id: &str, limit: i64) -> Result<Vec<IdeaDoc>> {
        let ideas = self
            .collection
            .find(Self::owner_filter(user_id))
            .sort(doc! { "score": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(ideas)
    }

    /// Delete one idea, owner-scoped; true when something was removed
    pub async fn delete(&self, id: ObjectId, user_id: &str) -> Result<bool> {
        let result = self
            .collection
            .delete_one(Self::id_filter(id, user_id))
            .await?;
        Ok(result.deleted_count > 0)
    }

    /// Delete everything a user owns, returning the removed count
    pub async fn delete_all(&self, user_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(Self::owner_filter(user_id))
            .await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(batch: Option<&str>) -> IdeaDoc {
        IdeaDoc {
            id: ObjectId::new(),
            user_id: "u1".into(),
            idea_id: "1".into(),
            batch: batch.map(|b| b.to_string()),
            title: "Test".into(),
            author: "".into(),
            category: "Uncategorized".into(),
            description: "desc".into(),
            effort_score: 0.4,
            effort_label: "Medium".into(),
            roi_score: 0.8,
            roi_label: "High".into(),
            score: 72.0,
            analysis: bson::Bson::Document(doc! {}),
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn upsert_filter_pins_absent_batch() {
        let filter = IdeaRepository::upsert_filter(&sample(None));
        assert_eq!(
            filter.get_document("batch").unwrap(),
            &doc! { "$exists": false }
        );
    }

    #[test]
    fn upsert_filter_matches_named_batch() {
        let filter = IdeaRepository::upsert_filter(&sample(Some("ideas.csv")));
        assert_eq!(filter.get_str("batch").unwrap(), "ideas.csv");
    }

    // A record is never reachable through a filter missing its owner.
    #[test]
    fn every_filter_is_owner_scoped() {
        let id = ObjectId::new();
        let filters = [
            IdeaRepository::upsert_filter(&sample(None)),
            IdeaRepository::owner_filter("u1"),
            IdeaRepository::id_filter(id, "u1"),
            IdeaRepository::lookup_filter("u1", "3", Some("ideas.csv")),
            IdeaRepository::lookup_filter("u1", "3", None),
            IdeaRepository::batch_filter("u1", "ideas.csv"),
        ];

        for filter in &filters {
            assert_eq!(filter.get_str("user_id").unwrap(), "u1", "{:?}", filter);
        }
    }

    #[test]
    fn lookup_filter_keys_on_ordinal_and_batch() {
        let filter = IdeaRepository::lookup_filter("u1", "3", Some("ideas.csv"));
        assert_eq!(filter.get_str("idea_id").unwrap(), "3");
        assert_eq!(filter.get_str("batch").unwrap(), "ideas.csv");

        let unbatched = IdeaRepository::lookup_filter("u1", "3", None);
        assert!(!unbatched.contains_key("batch"));
    }
}
