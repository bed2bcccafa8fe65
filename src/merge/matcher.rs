//! Sticky-key pattern matching.
use regex_lite::Regex;

use crate::error::ConfigError;

/// A compiled list of key patterns.
///
/// Patterns are anchored at the start of the key only, so `opencl` matches
/// `opencl_device_priority` but `device` does not match `cldevice_v5`.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    patterns: Vec<(String, Regex)>,
}

impl KeyMatcher {
    /// Compile `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyPattern`] for the first pattern that
    /// is not a valid regular expression.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{p})"))
                    .map(|re| (p.to_string(), re))
                    .map_err(|e| ConfigError::InvalidKeyPattern {
                        pattern: p.to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// The first pattern matching `key`, if any.
    #[must_use]
    pub fn matching_pattern(&self, key: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(key))
            .map(|(p, _)| p.as_str())
    }

    /// Whether any pattern matches `key`.
    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.matching_pattern(key).is_some()
    }
}
