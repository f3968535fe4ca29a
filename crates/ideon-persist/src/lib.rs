pub mod client;
pub mod error;
pub mod models;
pub mod repositories;

pub use client::PersistClient;
pub use error::{PersistError, Result};
pub use models::{ChatMessageDoc, ChatRole, IdeaDoc, User};
pub use repositories::{ChatRepository, IdeaRepository, UserRepository};
