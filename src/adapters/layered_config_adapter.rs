//! Command-line overrides layered over a base configuration.
//!
//! Overrides are plain strings, so they go through exactly the same parsing
//! and validation as values read from the INI file.

use crate::ports::config_port::ConfigPort;
use std::collections::HashMap;

pub struct LayeredConfigAdapter<'a> {
    base: &'a dyn ConfigPort,
    overrides: HashMap<(String, String), String>,
}

impl<'a> LayeredConfigAdapter<'a> {
    pub fn new(base: &'a dyn ConfigPort) -> Self {
        Self {
            base,
            overrides: HashMap::new(),
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.overrides
            .insert((section.to_string(), key.to_string()), value.into());
    }

    /// Sets the value only when one is given.
    pub fn set_opt<T: ToString>(&mut self, section: &str, key: &str, value: Option<T>) {
        if let Some(v) = value {
            self.set(section, key, v.to_string());
        }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&String> {
        self.overrides.get(&(section.to_string(), key.to_string()))
    }
}

impl ConfigPort for LayeredConfigAdapter<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key)
            .cloned()
            .or_else(|| self.base.get_string(section, key))
    }
}
