use std::time::Duration;

/// Default backend API root, the school server on the local machine.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Backend connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without a trailing slash (default: `http://127.0.0.1:8000/api`).
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub access_token: Option<String>,
    /// Per-request timeout (default: 30s).
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                     |
    /// |---------------------------------|-----------------------------|
    /// | `ROLLCALL_API_URL`              | `http://127.0.0.1:8000/api` |
    /// | `ROLLCALL_ACCESS_TOKEN`         | unset                       |
    /// | `ROLLCALL_REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("ROLLCALL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let access_token = std::env::var("ROLLCALL_ACCESS_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let request_timeout = match std::env::var("ROLLCALL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    var: "ROLLCALL_REQUEST_TIMEOUT_SECS",
                    expected: "a positive integer",
                    value: raw,
                })?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let mut config = Self::new(api_url);
        config.access_token = access_token;
        config.request_timeout = request_timeout;
        Ok(config)
    }

    /// Absolute URL for a media path such as a student photo.
    ///
    /// Media is served from the backend origin, i.e. the API root minus
    /// its trailing `/api` segment.
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let origin = self.api_url.strip_suffix("/api").unwrap_or(&self.api_url);
        format!("{}/{}", origin, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let config = ClientConfig::new("http://school.test/api/");
        assert_eq!(config.api_url, "http://school.test/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn media_url_uses_backend_origin() {
        let config = ClientConfig::new(DEFAULT_API_URL);
        assert_eq!(
            config.media_url("/media/students_images/a.jpg"),
            "http://127.0.0.1:8000/media/students_images/a.jpg"
        );
        assert_eq!(
            config.media_url("https://cdn.test/a.jpg"),
            "https://cdn.test/a.jpg"
        );
    }
}
