use crate::config::Config;
use ideon_agent::chat::IdeaChatAgent;
use ideon_agent::pipeline::Evaluator;
use ideon_persist::PersistClient;
use std::sync::Arc;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<PersistClient>,
    pub evaluator: Arc<Evaluator>,
    pub chat_agent: Arc<IdeaChatAgent>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: PersistClient,
        evaluator: Evaluator,
        chat_agent: IdeaChatAgent,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist: Arc::new(persist),
            evaluator: Arc::new(evaluator),
            chat_agent: Arc::new(chat_agent),
        }
    }
}
