pub mod chat;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod search;
pub mod submission;

pub use chat::{IdeaChatAgent, IdeaContext};
pub use error::EvalError;
pub use pipeline::{EffortEstimate, Evaluation, Evaluator, RoiEstimate};
pub use scoring::{band_label, ScoreAggregator, ScoreWeights, WeightedAggregator};
pub use search::{SearchProvider, SearchResult, TavilyClient};
pub use submission::IdeaSubmission;
