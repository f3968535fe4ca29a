mod chat;
mod idea;
mod user;

pub use chat::{ChatMessageDoc, ChatRole};
pub use idea::IdeaDoc;
pub use user::User;
