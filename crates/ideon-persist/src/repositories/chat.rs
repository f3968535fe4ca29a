use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::error::Result;
use crate::models::ChatMessageDoc;

#[derive(Clone)]
pub struct ChatRepository {
    collection: Collection<ChatMessageDoc>,
}

impl ChatRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chat_messages");
        Self { collection }
    }

    fn idea_filter(idea_id: ObjectId, user_id: &str) -> Document {
        doc! { "idea_id": idea_id, "user_id": user_id }
    }

    fn owner_filter(user_id: &str) -> Document {
        doc! { "user_id": user_id }
    }

    /// Append one turn to an idea's conversation
    pub async fn append(&self, message: &ChatMessageDoc) -> Result<()> {
        self.collection.insert_one(message).await?;
        Ok(())
    }

    /// Full conversation for one idea, oldest first, owner-scoped
    pub async fn history(&self, idea_id: ObjectId, user_id: &str) -> Result<Vec<ChatMessageDoc>> {
        let messages = self
            .collection
            .find(Self::idea_filter(idea_id, user_id))
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    /// Cascade delete when the owning idea is removed
    pub async fn delete_for_idea(&self, idea_id: ObjectId, user_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(Self::idea_filter(idea_id, user_id))
            .await?;
        Ok(result.deleted_count)
    }

    /// Cascade delete for a bulk idea wipe
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

    // Transcript reads and deletes are never reachable without the owner.
    #[test]
    fn every_filter_is_owner_scoped() {
        let idea_id = ObjectId::new();
        let filters = [
            ChatRepository::idea_filter(idea_id, "u1"),
            ChatRepository::owner_filter("u1"),
        ];

        for filter in &filters {
            assert_eq!(filter.get_str("user_id").unwrap(), "u1", "{:?}", filter);
        }
    }

    #[test]
    fn idea_filter_pins_the_owning_idea() {
        let idea_id = ObjectId::new();
        let filter = ChatRepository::idea_filter(idea_id, "u1");
        assert_eq!(filter.get_object_id("idea_id").unwrap(), idea_id);
    }
}
