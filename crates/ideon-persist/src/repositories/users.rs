use bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::error::Result;
use crate::models::User;

#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// Insert a new user record
    pub async fn create(&self, user: User) -> Result<User> {
        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let filter = doc! { "email": email };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_by_id(&self, user_id: ObjectId) -> Result<Option<User>> {
        let filter = doc! { "_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Replace the stored password hash (reset flow)
    pub async fn set_password_hash(&self, user_id: ObjectId, password_hash: &str) -> Result<()> {
        let filter = doc! { "_id": user_id };
        let update = doc! { "$set": { "password_hash": password_hash } };
        self.collection.update_one(filter, update).await?;
        Ok(())
    }
}
