use std::time::Duration;

use bson::doc;
use mongodb::{options::ClientOptions, Client};

use crate::error::{PersistError, Result};
use crate::repositories::{ChatRepository, IdeaRepository, UserRepository};

const SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;
const CONNECT_TIMEOUT_MS: u64 = 5000;

/// Handle to the MongoDB-backed stores
///
/// One client per process; repositories are cheap clones over the same
/// connection pool.
#[derive(Clone)]
pub struct PersistClient {
    client: Client,
    database: String,
    users: UserRepository,
    ideas: IdeaRepository,
    chat: ChatRepository,
}

impl PersistClient {
    /// Connect to MongoDB and build the repositories
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        options.server_selection_timeout =
            Some(Duration::from_millis(SERVER_SELECTION_TIMEOUT_MS));
        options.connect_timeout = Some(Duration::from_millis(CONNECT_TIMEOUT_MS));

        let client =
            Client::with_options(options).map_err(|e| PersistError::Connection(e.to_string()))?;

        let users = UserRepository::new(&client, database);
        let ideas = IdeaRepository::new(&client, database);
        let chat = ChatRepository::new(&client, database);

        Ok(Self {
            client,
            database: database.to_string(),
            users,
            ideas,
            chat,
        })
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn ideas(&self) -> &IdeaRepository {
        &self.ideas
    }

    pub fn chat(&self) -> &ChatRepository {
        &self.chat
    }

    /// Round-trip to the server, used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
