use serde::{Deserialize, Serialize};

/// What a successful operation does to the last-error banner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorPolicy {
    /// Successes leave the previous error in place until the next failure
    /// overwrites it.
    #[default]
    Sticky,
    /// Any successful operation clears the banner.
    ClearOnSuccess,
}

impl ErrorPolicy {
    /// Parse the settings/env spelling. Accepts `sticky`, `clearOnSuccess`
    /// and `clear-on-success`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "sticky" => Some(Self::Sticky),
            "clearonsuccess" => Some(Self::ClearOnSuccess),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sticky() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Sticky);
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&ErrorPolicy::ClearOnSuccess).unwrap();
        assert_eq!(json, "\"clearOnSuccess\"");
        let parsed: ErrorPolicy = serde_json::from_str("\"sticky\"").unwrap();
        assert_eq!(parsed, ErrorPolicy::Sticky);
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(ErrorPolicy::parse("Sticky"), Some(ErrorPolicy::Sticky));
        assert_eq!(ErrorPolicy::parse("clear-on-success"), Some(ErrorPolicy::ClearOnSuccess));
        assert_eq!(ErrorPolicy::parse("clear_on_success"), Some(ErrorPolicy::ClearOnSuccess));
        assert_eq!(ErrorPolicy::parse("clearOnSuccess"), Some(ErrorPolicy::ClearOnSuccess));
        assert_eq!(ErrorPolicy::parse("never"), None);
    }
}
