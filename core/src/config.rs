//! Per-transport configuration.
//!
//! Values are passed to the backend as given. A `timeout` of zero means no
//! timeout at all, which is what libcurl does with it.

use serde::{Deserialize, Serialize};

/// Redirect and timeout knobs read by a transport on every send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Follow `Location` headers on 3xx responses.
    pub follow_location: bool,
    /// The most redirects followed before the send fails.
    pub max_redirects: u32,
    /// Whole-transfer timeout, in seconds.
    pub timeout: u64,
}

impl TransportConfig {
    pub const DEFAULT_FOLLOW_LOCATION: bool = true;
    pub const DEFAULT_MAX_REDIRECTS: u32 = 3;
    pub const DEFAULT_TIMEOUT: u64 = 10;
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            follow_location: Self::DEFAULT_FOLLOW_LOCATION,
            max_redirects: Self::DEFAULT_MAX_REDIRECTS,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_three_redirects_within_ten_seconds() {
        let config = TransportConfig::default();
        assert!(config.follow_location);
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: TransportConfig = serde_json::from_str(r#"{"timeout":30}"#).unwrap();
        assert_eq!(config.timeout, 30);
        assert!(config.follow_location);
        assert_eq!(config.max_redirects, 3);
    }

    #[test]
    fn serializes_with_field_names() {
        let config = TransportConfig {
            follow_location: false,
            max_redirects: 0,
            timeout: 5,
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["follow_location"], false);
        assert_eq!(json["max_redirects"], 0);
        assert_eq!(json["timeout"], 5);
    }
}
