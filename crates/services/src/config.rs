use std::env;
use std::time::Duration;

use quiz_core::quiz::DEFAULT_DURATION_SECS;

pub const DEFAULT_API_BASE_URL: &str = "https://ass-server-4qwz.onrender.com/api";
/// The hosted bank can take a while to wake up.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration for the quiz services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    pub api_base_url: String,
    pub duration_secs: u32,
    pub request_timeout: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl QuizConfig {
    /// Read `QUIZ_API_BASE_URL`, `QUIZ_DURATION_SECS` and
    /// `QUIZ_REQUEST_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Blank or unparseable values fall back to the defaults, as does a zero
    /// duration or timeout.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup("QUIZ_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);
        let duration_secs = lookup("QUIZ_DURATION_SECS")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.duration_secs);
        let request_timeout = lookup("QUIZ_REQUEST_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.request_timeout, Duration::from_secs);

        Self {
            api_base_url,
            duration_secs,
            request_timeout,
        }
    }

    #[must_use]
    pub fn questions_url(&self) -> String {
        format!("{}/questions", self.api_base_url)
    }

    #[must_use]
    pub fn submit_url(&self) -> String {
        format!("{}/submit-test", self.api_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = QuizConfig::from_lookup(|_| None);

        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.duration_secs, 3600);
        assert_eq!(
            config.questions_url(),
            "https://ass-server-4qwz.onrender.com/api/questions"
        );
        assert_eq!(
            config.submit_url(),
            "https://ass-server-4qwz.onrender.com/api/submit-test"
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = QuizConfig::from_lookup(lookup_from(&[
            ("QUIZ_API_BASE_URL", "http://localhost:9000/api/"),
            ("QUIZ_DURATION_SECS", "90"),
            ("QUIZ_REQUEST_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.duration_secs, 90);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.questions_url(), "http://localhost:9000/api/questions");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = QuizConfig::from_lookup(lookup_from(&[
            ("QUIZ_API_BASE_URL", "   "),
            ("QUIZ_DURATION_SECS", "0"),
            ("QUIZ_REQUEST_TIMEOUT_SECS", "soon"),
        ]));

        assert_eq!(config, QuizConfig::default());
    }
}
