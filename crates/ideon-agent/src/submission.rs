use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// One idea as received from a caller, before evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaSubmission {
    #[serde(default)]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl IdeaSubmission {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: description.into(),
            author: String::new(),
            category: default_category(),
            timestamp: None,
        }
    }

    /// Empty-category submissions fall back to the default label
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.title = self.title.trim().to_string();
        if self.category.trim().is_empty() {
            self.category = default_category();
        }
        self
    }
}
