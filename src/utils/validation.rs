//! Input validation primitives.
//!
//! Replace verbose `if ... { return Err(Error::config_invalid_value(..)) }` chains
//! for configured lists and strings.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Require a configured string to be non-empty after trimming.
pub fn require_non_empty<'a>(value: &'a str, key: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::config_invalid_value(key, None, "must not be empty"))
    } else {
        Ok(trimmed)
    }
}

/// Require a configured list to be non-empty and free of duplicates.
pub fn require_unique_list<'a>(values: &'a [String], key: &str) -> Result<&'a [String]> {
    if values.is_empty() {
        return Err(Error::config_invalid_value(
            key,
            None,
            "must list at least one value",
        ));
    }

    let mut seen = HashSet::new();
    for value in values {
        require_non_empty(value, key)?;
        if !seen.insert(value.as_str()) {
            return Err(Error::config_invalid_value(
                key,
                Some(value.clone()),
                format!("duplicate value '{}'", value),
            ));
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn require_non_empty_trims_whitespace() {
        assert_eq!(require_non_empty("  yarn  ", "command.program").unwrap(), "yarn");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace_only() {
        let err = require_non_empty("   ", "confirmToken").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn require_unique_list_accepts_distinct_values() {
        let values = list(&["add", "build"]);
        assert!(require_unique_list(&values, "stages").is_ok());
    }

    #[test]
    fn require_unique_list_rejects_empty() {
        assert!(require_unique_list(&[], "platforms").is_err());
    }

    #[test]
    fn require_unique_list_rejects_duplicates() {
        let values = list(&["android", "ios", "android"]);
        let err = require_unique_list(&values, "platforms").unwrap_err();
        assert_eq!(err.details["value"], "android");
    }
}
