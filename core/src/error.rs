use thiserror::Error;

/// Fatal conditions that terminate a mint invocation.
/// There is no partial result: the first one raised ends the run.
#[derive(Debug, Error)]
pub enum MintError {
    /// No bearer credential was supplied by the execution environment.
    #[error("Need to set ACCESS_TOKEN environment variable")]
    MissingCredential,

    /// A positional argument is absent or cannot be read as the expected type.
    #[error("Malformed argument '{name}': {reason}")]
    MalformedArgument { name: &'static str, reason: String },

    #[error("Error getting email: {0}")]
    IdentityFetch(#[source] UpstreamError),

    #[error("Email does not match")]
    IdentityMismatch,

    #[error("Error getting day window: {0}")]
    DayWindowFetch(#[source] UpstreamError),

    #[error("Cannot mint on the same day")]
    SameDayMint {
        last_mint_time_millis: i64,
        start_time_millis: i64,
    },

    #[error("Cannot encode result: {0}")]
    Encoding(#[from] EncodingError),
}

impl MintError {
    /// Machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            MintError::MissingCredential => codes::MISSING_CREDENTIAL,
            MintError::MalformedArgument { .. } => codes::MALFORMED_ARGUMENT,
            MintError::IdentityFetch(_) => codes::IDENTITY_FETCH_FAILED,
            MintError::IdentityMismatch => codes::IDENTITY_MISMATCH,
            MintError::DayWindowFetch(_) => codes::DAY_WINDOW_FETCH_FAILED,
            MintError::SameDayMint { .. } => codes::SAME_DAY_MINT,
            MintError::Encoding(_) => codes::ENCODING_FAILED,
        }
    }

    /// Hint about what the caller can do to fix the request, if anything.
    pub fn docs_hint(&self) -> Option<&'static str> {
        match self {
            MintError::MissingCredential => {
                Some("Set --access-token or the ACCESS_TOKEN env var to a fitness OAuth token.")
            }
            MintError::MalformedArgument { .. } => {
                Some("Arguments are [claimedEmail, lastMintTimeMillis]; the timestamp is epoch milliseconds.")
            }
            MintError::IdentityMismatch => {
                Some("The claimed email must equal the email of the account behind the access token.")
            }
            MintError::SameDayMint { .. } => Some("Only one mint per day is allowed. Retry after the next day boundary."),
            _ => None,
        }
    }
}

/// Failure of a single outbound request issued through an `Upstream`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected payload from {url}: {message}")]
    Decode { url: String, message: String },
}

/// A `[start, end)` pair that is not a valid day boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DayWindowError {
    #[error("start {start} is after end {end}")]
    Inverted { start: i64, end: i64 },

    #[error("window [{start}, {end}) is not exactly one day long")]
    WrongLength { start: i64, end: i64 },
}

/// Invalid endpoint configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}: invalid URL '{url}': {reason}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        reason: String,
    },

    #[error("{name}: unsupported scheme '{scheme}'")]
    UnsupportedScheme { name: &'static str, scheme: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("negative amount {0} is not a valid uint256")]
    NegativeAmount(i64),
}

/// Error codes surfaced to the invoking consumer
pub mod codes {
    pub const MISSING_CREDENTIAL: &str = "missing_credential";
    pub const MALFORMED_ARGUMENT: &str = "malformed_argument";
    pub const IDENTITY_FETCH_FAILED: &str = "identity_fetch_failed";
    pub const IDENTITY_MISMATCH: &str = "identity_mismatch";
    pub const DAY_WINDOW_FETCH_FAILED: &str = "day_window_fetch_failed";
    pub const SAME_DAY_MINT: &str = "same_day_mint";
    pub const ENCODING_FAILED: &str = "encoding_failed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_variant() {
        let errors = [
            MintError::MissingCredential,
            MintError::MalformedArgument {
                name: "lastMintTimeMillis",
                reason: "not a number".to_string(),
            },
            MintError::IdentityMismatch,
            MintError::SameDayMint {
                last_mint_time_millis: 2,
                start_time_millis: 1,
            },
            MintError::Encoding(EncodingError::NegativeAmount(-1)),
        ];
        let mut seen: Vec<&str> = errors.iter().map(MintError::code).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), errors.len());
    }

    #[test]
    fn upstream_errors_are_wrapped_with_context() {
        let err = MintError::IdentityFetch(UpstreamError::Status {
            url: "https://id.example/me".to_string(),
            status: 401,
        });
        assert_eq!(err.code(), codes::IDENTITY_FETCH_FAILED);
        assert_eq!(
            err.to_string(),
            "Error getting email: https://id.example/me returned status 401"
        );
    }
}
