mod chat;
mod ideas;
mod users;

pub use chat::ChatRepository;
pub use ideas::IdeaRepository;
pub use users::UserRepository;
