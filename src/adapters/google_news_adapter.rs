//! Google News RSS search adapter (`net` feature).

use crate::ports::news_port::{NewsError, NewsItem, NewsPort};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://news.google.com";

pub struct GoogleNewsAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl GoogleNewsAdapter {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NewsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NewsError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Edition parameters for a language code: `fr` -> (`fr`, `FR`), `en` -> (`en`, `US`).
fn edition(language: &str) -> (String, String) {
    let lang = language.trim().to_lowercase();
    let country = match lang.as_str() {
        "en" => "US".to_string(),
        other => other.to_uppercase(),
    };
    (lang, country)
}

pub(crate) fn parse_feed(content: &[u8]) -> Result<Vec<NewsItem>, NewsError> {
    let channel = rss::Channel::read_from(content).map_err(|e| NewsError::Parse(e.to_string()))?;
    Ok(channel
        .items()
        .iter()
        .filter_map(|item| {
            Some(NewsItem {
                title: item.title()?.trim().to_string(),
                link: item.link().unwrap_or_default().to_string(),
            })
        })
        .collect())
}

impl NewsPort for GoogleNewsAdapter {
    fn search(&self, symbol: &str, language: &str) -> Result<Vec<NewsItem>, NewsError> {
        let (lang, country) = edition(language);
        let ceid = format!("{}:{}", country, lang);
        let response = self
            .client
            .get(format!("{}/rss/search", self.base_url))
            .query(&[
                ("q", symbol),
                ("hl", lang.as_str()),
                ("gl", country.as_str()),
                ("ceid", ceid.as_str()),
            ])
            .send()
            .map_err(|e| NewsError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::Request(format!("HTTP {}", response.status())));
        }
        let content = response
            .bytes()
            .map_err(|e| NewsError::Request(e.to_string()))?;
        parse_feed(&content[..])
    }
}
