//! Instrument reference data and the scan universe.
//!
//! The universe is loaded once per scan, deduplicated by symbol (first
//! occurrence wins) and narrowed by a [`CategoryFilter`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Equity,
    Crypto,
    #[default]
    Unknown,
}

const CRYPTO_QUOTE_SUFFIXES: [&str; 3] = ["-USD", "-USDT", "-EUR"];

impl Category {
    /// Category from a symbol alone: crypto pairs are quoted as `BTC-USD`,
    /// every other ticker is taken for an equity.
    pub fn infer(symbol: &str) -> Self {
        let upper = symbol.to_uppercase();
        if CRYPTO_QUOTE_SUFFIXES.iter().any(|s| upper.ends_with(s)) {
            Category::Crypto
        } else {
            Category::Equity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Equity => "equity",
            Category::Crypto => "crypto",
            Category::Unknown => "unknown",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equity" | "stock" | "action" | "actions" => Ok(Category::Equity),
            "crypto" | "cryptocurrency" => Ok(Category::Crypto),
            "" | "unknown" => Ok(Category::Unknown),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub name: Option<String>,
    pub category: Category,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let category = Category::infer(&symbol);
        Self {
            symbol,
            name: None,
            category,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Display name, falling back to the symbol.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Equity,
    Crypto,
}

impl CategoryFilter {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Equity => category == Category::Equity,
            CategoryFilter::Crypto => category == Category::Crypto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Equity => "equity",
            CategoryFilter::Crypto => "crypto",
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "equity" | "stock" | "stocks" => Ok(CategoryFilter::Equity),
            "crypto" => Ok(CategoryFilter::Crypto),
            other => Err(format!(
                "unknown category filter '{}' (expected all, equity or crypto)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    pub instruments: Vec<Instrument>,
}

impl Universe {
    /// Builds a universe, dropping blank symbols and later duplicates.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut seen = HashSet::new();
        let instruments = instruments
            .into_iter()
            .filter_map(|mut inst| {
                inst.symbol = inst.symbol.trim().to_string();
                if inst.symbol.is_empty() || !seen.insert(inst.symbol.clone()) {
                    return None;
                }
                Some(inst)
            })
            .collect();
        Self { instruments }
    }

    pub fn count(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn filtered(&self, filter: CategoryFilter) -> Vec<&Instrument> {
        self.instruments
            .iter()
            .filter(|inst| filter.accepts(inst.category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_crypto_from_quote_suffix() {
        assert_eq!(Category::infer("BTC-USD"), Category::Crypto);
        assert_eq!(Category::infer("eth-usdt"), Category::Crypto);
        assert_eq!(Category::infer("AAPL"), Category::Equity);
        assert_eq!(Category::infer("MC.PA"), Category::Equity);
    }

    #[test]
    fn parse_category() {
        assert_eq!("Equity".parse::<Category>(), Ok(Category::Equity));
        assert_eq!("crypto".parse::<Category>(), Ok(Category::Crypto));
        assert_eq!("".parse::<Category>(), Ok(Category::Unknown));
        assert!("bond".parse::<Category>().is_err());
    }

    #[test]
    fn display_name_falls_back_to_symbol() {
        let inst = Instrument::new("AAPL");
        assert_eq!(inst.display_name(), "AAPL");

        let inst = Instrument::new("AAPL").with_name("Apple Inc.");
        assert_eq!(inst.display_name(), "Apple Inc.");

        let inst = Instrument::new("AAPL").with_name("  ");
        assert_eq!(inst.name, None);
    }

    #[test]
    fn universe_dedupes_keeping_first() {
        let universe = Universe::new(vec![
            Instrument::new("AAPL").with_name("Apple"),
            Instrument::new("BTC-USD"),
            Instrument::new(" AAPL ").with_name("Duplicate"),
            Instrument::new(""),
        ]);

        assert_eq!(universe.count(), 2);
        assert_eq!(universe.instruments[0].display_name(), "Apple");
        assert_eq!(universe.instruments[1].symbol, "BTC-USD");
    }

    #[test]
    fn category_filter_selects() {
        let universe = Universe::new(vec![
            Instrument::new("AAPL"),
            Instrument::new("BTC-USD"),
            Instrument::new("XYZ").with_category(Category::Unknown),
        ]);

        assert_eq!(universe.filtered(CategoryFilter::All).len(), 3);

        let equities = universe.filtered(CategoryFilter::Equity);
        assert_eq!(equities.len(), 1);
        assert_eq!(equities[0].symbol, "AAPL");

        let crypto = universe.filtered(CategoryFilter::Crypto);
        assert_eq!(crypto.len(), 1);
        assert_eq!(crypto[0].symbol, "BTC-USD");
    }

    #[test]
    fn parse_category_filter() {
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("stocks".parse::<CategoryFilter>(), Ok(CategoryFilter::Equity));
        assert!("bonds".parse::<CategoryFilter>().is_err());
    }
}
