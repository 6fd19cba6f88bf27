//! Option-string mini-language: `key=value[,key=value]*`
//!
//! Used by `--activate`, `--settings` and `--log` for their inline options.
//! Keys are case-sensitive; missing or malformed integer values read as 0.

use std::collections::HashMap;

pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn parse(arg: &str) -> Self {
        let mut values = HashMap::new();
        for token in arg.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) => values.insert(key.to_string(), value.to_string()),
                // Bare key, e.g. "syslog" — treated as present but valueless
                None => values.insert(token.to_string(), String::new()),
            };
        }
        Self { values }
    }

    /// Integer value for `key`; 0 when absent or unparsable.
    pub fn int_value(&self, key: &str) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// String value for `key`; empty when absent.
    pub fn string_value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_int_values() {
        let params = Params::parse("top=50,verbose=1");
        assert_eq!(params.int_value("top"), 50);
        assert_eq!(params.int_value("verbose"), 1);
    }

    #[test]
    fn missing_key_defaults_to_zero() {
        let params = Params::parse("top=50");
        assert_eq!(params.int_value("verbose"), 0);
        assert_eq!(params.string_value("sls"), "");
    }

    #[test]
    fn keys_are_case_sensitive() {
        let params = Params::parse("Top=50");
        assert_eq!(params.int_value("top"), 0);
        assert_eq!(params.int_value("Top"), 50);
    }

    #[test]
    fn garbage_int_reads_as_zero() {
        let params = Params::parse("top=abc");
        assert_eq!(params.int_value("top"), 0);
    }

    #[test]
    fn empty_string_yields_no_values() {
        let params = Params::parse("");
        assert_eq!(params.int_value("top"), 0);
        assert_eq!(params.string_value("sls"), "");
    }

    #[test]
    fn string_values_pass_through() {
        let params = Params::parse("sls=/tmp/1.log,syslog=1");
        assert_eq!(params.string_value("sls"), "/tmp/1.log");
        assert_eq!(params.int_value("syslog"), 1);
    }
}
