//! News lookup port trait.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(String),

    #[error("news feed could not be parsed: {0}")]
    Parse(String),
}

pub trait NewsPort {
    fn search(&self, symbol: &str, language: &str) -> Result<Vec<NewsItem>, NewsError>;
}
