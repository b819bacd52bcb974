//! Headline lookup for the top of the ranking.

use tracing::{debug, warn};

use crate::domain::scan_config::NewsSettings;
use crate::domain::scanner::ScanOutcome;
use crate::ports::news_port::NewsPort;

/// Looks up headlines for every ranked result scoring above the threshold.
///
/// A failed lookup leaves that symbol with no headlines; it never affects
/// the ranking. Returns the number of symbols that were looked up.
pub fn attach_news(outcome: &mut ScanOutcome, news: &dyn NewsPort, settings: &NewsSettings) -> usize {
    let mut looked_up = 0;
    for result in outcome.results.iter().filter(|r| r.score > settings.threshold) {
        looked_up += 1;
        let items = match news.search(&result.symbol, &settings.language) {
            Ok(mut items) => {
                items.truncate(settings.max_items);
                debug!(symbol = %result.symbol, headlines = items.len(), "news fetched");
                items
            }
            Err(e) => {
                warn!(symbol = %result.symbol, error = %e, "news lookup failed");
                Vec::new()
            }
        };
        outcome.news.insert(result.symbol.clone(), items);
    }
    looked_up
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scanner::ScoreResult;
    use crate::ports::news_port::{NewsError, NewsItem};
    use std::cell::RefCell;

    struct StubNews {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl NewsPort for StubNews {
        fn search(&self, symbol: &str, language: &str) -> Result<Vec<NewsItem>, NewsError> {
            self.calls
                .borrow_mut()
                .push((symbol.to_string(), language.to_string()));
            if symbol == "DOWN" {
                return Err(NewsError::Request("timeout".into()));
            }
            Ok((0..10)
                .map(|i| NewsItem {
                    title: format!("{} headline {}", symbol, i),
                    link: format!("https://news.example/{}/{}", symbol, i),
                })
                .collect())
        }
    }

    fn scored(symbol: &str, score: i32) -> ScoreResult {
        ScoreResult {
            symbol: symbol.into(),
            name: symbol.into(),
            short_change: None,
            medium_change: None,
            long_change: None,
            rsi: None,
            volume_ratio: None,
            potential: None,
            score,
        }
    }

    #[test]
    fn only_results_above_threshold_are_looked_up() {
        let mut outcome = ScanOutcome {
            results: vec![scored("AAA", 80), scored("BBB", 60), scored("CCC", 40)],
            ..ScanOutcome::default()
        };
        let stub = StubNews {
            calls: RefCell::new(Vec::new()),
        };
        let settings = NewsSettings {
            enabled: true,
            ..NewsSettings::default()
        };

        let looked_up = attach_news(&mut outcome, &stub, &settings);

        assert_eq!(looked_up, 1);
        assert_eq!(*stub.calls.borrow(), vec![("AAA".to_string(), "fr".to_string())]);
        assert_eq!(outcome.news["AAA"].len(), 5);
        assert!(!outcome.news.contains_key("BBB"));
    }

    #[test]
    fn failed_lookup_degrades_to_no_news() {
        let mut outcome = ScanOutcome {
            results: vec![scored("DOWN", 100), scored("UP", 100)],
            ..ScanOutcome::default()
        };
        let stub = StubNews {
            calls: RefCell::new(Vec::new()),
        };

        attach_news(&mut outcome, &stub, &NewsSettings::default());

        assert!(outcome.news["DOWN"].is_empty());
        assert_eq!(outcome.news["UP"].len(), 5);
        assert_eq!(outcome.results.len(), 2);
    }
}
