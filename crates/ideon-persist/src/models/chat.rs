use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Agent,
}

/// One turn of the per-idea conversation, append-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning IdeaDoc `_id`
    pub idea_id: ObjectId,
    pub user_id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageDoc {
    pub fn new(
        idea_id: ObjectId,
        user_id: impl Into<String>,
        role: ChatRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            idea_id,
            user_id: user_id.into(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let msg = ChatMessageDoc::new(ObjectId::new(), "u1", ChatRole::Agent, "hi");
        let doc = bson::to_document(&msg).unwrap();
        assert_eq!(doc.get_str("role").unwrap(), "agent");
    }
}
