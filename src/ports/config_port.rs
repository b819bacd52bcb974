//! Configuration access port trait.
//!
//! Adapters only supply raw strings. The typed getters parse them here, so a
//! value that is present but malformed is an error no matter where it came
//! from; `Ok(None)` means the key is absent or blank.

use crate::domain::error::ScanError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, ScanError> {
        match raw(self.get_string(section, key)) {
            None => Ok(None),
            Some(v) => v.parse().map(Some).map_err(|_| {
                ScanError::invalid(section, key, format!("expected an integer, got '{}'", v))
            }),
        }
    }

    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, ScanError> {
        match raw(self.get_string(section, key)) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Some)
                .ok_or_else(|| {
                    ScanError::invalid(section, key, format!("expected a number, got '{}'", v))
                }),
        }
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, ScanError> {
        match raw(self.get_string(section, key)) {
            None => Ok(None),
            Some(v) => match v.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                _ => Err(ScanError::invalid(
                    section,
                    key,
                    format!("expected true or false, got '{}'", v),
                )),
            },
        }
    }
}

fn raw(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct One(&'static str);

    impl ConfigPort for One {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    struct Nothing;

    impl ConfigPort for Nothing {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn typed_getters_parse_values() {
        assert_eq!(One(" 42 ").get_int("scan", "workers").unwrap(), Some(42));
        assert_eq!(One("-5").get_int("scoring", "penalty_threshold").unwrap(), Some(-5));
        assert_eq!(One("1.75").get_double("scoring", "volume_multiple").unwrap(), Some(1.75));
        for yes in ["true", "YES", "1"] {
            assert_eq!(One(yes).get_bool("news", "enabled").unwrap(), Some(true));
        }
        for no in ["false", "No", "0"] {
            assert_eq!(One(no).get_bool("news", "enabled").unwrap(), Some(false));
        }
    }

    #[test]
    fn absent_or_blank_is_none() {
        assert_eq!(Nothing.get_int("scan", "workers").unwrap(), None);
        assert_eq!(Nothing.get_double("scoring", "rsi_ceiling").unwrap(), None);
        assert_eq!(One("   ").get_bool("news", "enabled").unwrap(), None);
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(matches!(
            One("abc").get_int("scan", "workers"),
            Err(ScanError::ConfigInvalid { ref key, .. }) if key == "workers"
        ));
        assert!(One("NaN").get_double("scoring", "rsi_ceiling").is_err());
        assert!(One("inf").get_double("scoring", "rsi_ceiling").is_err());
        assert!(One("maybe").get_bool("scan", "drop_non_positive").is_err());
    }
}
