use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account record
///
/// Created at registration, read at login and auth checks. The only mutable
/// field is the password hash (reset flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_id_as_underscore_id() {
        let user = User::new("a@b.com", "Ada", "Lovelace", "$argon2id$stub");
        let doc = bson::to_document(&user).unwrap();
        assert!(doc.contains_key("_id"));
        assert_eq!(doc.get_str("email").unwrap(), "a@b.com");
    }
}
