use std::env;
use std::time::Duration;

use layers::DEFAULT_STYLE_URL;
use projection::{EPSG_4326, EPSG_6668};
use streaming::DEFAULT_ENDPOINT;

/// Settings read from the environment; command-line flags win over these.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub chat_endpoint: String,
    pub chat_timeout: Option<Duration>,
    pub srs_from: String,
    pub srs_to: String,
    pub style_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = parse_or(lookup("CHAT_TIMEOUT_SECS"), 0u64);
        Self {
            chat_endpoint: lookup("CHAT_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            chat_timeout: timeout_from_secs(timeout_secs),
            srs_from: lookup("SRS_FROM").unwrap_or_else(|| EPSG_6668.to_string()),
            srs_to: lookup("SRS_TO").unwrap_or_else(|| EPSG_4326.to_string()),
            style_url: lookup("MAP_STYLE_URL").unwrap_or_else(|| DEFAULT_STYLE_URL.to_string()),
        }
    }
}

/// Zero means "wait forever".
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::Settings;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.chat_endpoint, "http://127.0.0.1:8000/chat");
        assert_eq!(s.chat_timeout, None);
        assert_eq!(s.srs_from, "EPSG:6668");
        assert_eq!(s.srs_to, "EPSG:4326");
        assert_eq!(
            s.style_url,
            "https://tile.openstreetmap.jp/styles/osm-bright/style.json"
        );
    }

    #[test]
    fn environment_overrides() {
        let s = settings(&[
            ("CHAT_ENDPOINT", "http://localhost:9000/chat"),
            ("CHAT_TIMEOUT_SECS", "30"),
            ("SRS_TO", "WGS84"),
        ]);
        assert_eq!(s.chat_endpoint, "http://localhost:9000/chat");
        assert_eq!(s.chat_timeout, Some(Duration::from_secs(30)));
        assert_eq!(s.srs_to, "WGS84");
    }

    #[test]
    fn unparsable_timeout_falls_back() {
        assert_eq!(settings(&[("CHAT_TIMEOUT_SECS", "soon")]).chat_timeout, None);
    }
}
