use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_IDENTITY_URL: &str = "https://www.googleapis.com/userinfo/v2/me";
pub const DEFAULT_DAY_WINDOW_URL: &str =
    "https://riot-rpc-server.adaptable.app/time-util-midnight-timmestamp";
pub const DEFAULT_AGGREGATE_URL: &str =
    "https://www.googleapis.com/fitness/v1/users/me/dataset:aggregate";

/// Upstream endpoints the pipeline talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub identity_url: String,
    pub day_window_url: String,
    pub aggregate_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            day_window_url: DEFAULT_DAY_WINDOW_URL.to_string(),
            aggregate_url: DEFAULT_AGGREGATE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Build from explicit URLs, each of which must be absolute http(s).
    pub fn new(
        identity_url: &str,
        day_window_url: &str,
        aggregate_url: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            identity_url: validate_url("identity_url", identity_url)?,
            day_window_url: validate_url("day_window_url", day_window_url)?,
            aggregate_url: validate_url("aggregate_url", aggregate_url)?,
        })
    }
}

fn validate_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        name,
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::UnsupportedScheme {
            name,
            scheme: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let defaults = Endpoints::default();
        let rebuilt = Endpoints::new(
            &defaults.identity_url,
            &defaults.day_window_url,
            &defaults.aggregate_url,
        )
        .expect("defaults are valid");
        assert_eq!(rebuilt, defaults);
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = Endpoints::new("/me", DEFAULT_DAY_WINDOW_URL, DEFAULT_AGGREGATE_URL)
            .expect_err("relative URL must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                name: "identity_url",
                ..
            }
        ));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = Endpoints::new(DEFAULT_IDENTITY_URL, "ftp://time.example/", DEFAULT_AGGREGATE_URL)
            .expect_err("ftp is not allowed");
        assert_eq!(
            err,
            ConfigError::UnsupportedScheme {
                name: "day_window_url",
                scheme: "ftp".to_string(),
            }
        );
    }
}
