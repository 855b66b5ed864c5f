use std::fmt;

use crate::error::MintError;

/// Opaque bearer token supplied by the execution environment.
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Positional invocation arguments: `[claimedEmail, lastMintTimeMillis]`.
///
/// `last_mint_time` is kept as received and only parsed when the day gate
/// needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArgs {
    pub claimed_email: String,
    last_mint_time: String,
}

impl InvocationArgs {
    pub fn new(claimed_email: impl Into<String>, last_mint_time_millis: i64) -> Self {
        Self {
            claimed_email: claimed_email.into(),
            last_mint_time: last_mint_time_millis.to_string(),
        }
    }

    pub fn last_mint_time_millis(&self) -> Result<i64, MintError> {
        self.last_mint_time
            .trim()
            .parse::<i64>()
            .map_err(|e| MintError::MalformedArgument {
                name: "lastMintTimeMillis",
                reason: format!("'{}' is not an integer: {e}", self.last_mint_time),
            })
    }
}

/// Check the credential first, then pick the positional arguments apart.
/// Nothing here touches the network.
pub fn validate_request(
    args: &[String],
    credential: Option<&str>,
) -> Result<(InvocationArgs, Credential), MintError> {
    let credential = require_credential(credential)?;

    let claimed_email = args.first().ok_or(MintError::MalformedArgument {
        name: "claimedEmail",
        reason: "missing positional argument 0".to_string(),
    })?;
    let last_mint_time = args.get(1).ok_or(MintError::MalformedArgument {
        name: "lastMintTimeMillis",
        reason: "missing positional argument 1".to_string(),
    })?;

    Ok((
        InvocationArgs {
            claimed_email: claimed_email.clone(),
            last_mint_time: last_mint_time.clone(),
        },
        credential,
    ))
}

/// Whitespace-only tokens count as absent, and surrounding whitespace is
/// stripped before the token is sent.
pub fn require_credential(credential: Option<&str>) -> Result<Credential, MintError> {
    credential
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Credential::new)
        .ok_or(MintError::MissingCredential)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn missing_credential_is_rejected_before_args_are_read() {
        let err = validate_request(&[], None).expect_err("missing credential must fail");
        assert!(matches!(err, MintError::MissingCredential));
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let err = validate_request(&args(&["a@b.c", "0"]), Some("   "))
            .expect_err("blank credential must fail");
        assert!(matches!(err, MintError::MissingCredential));
    }

    #[test]
    fn credential_is_trimmed_before_use() {
        let credential = require_credential(Some(" ya29.token\n")).expect("non-blank token");
        assert_eq!(credential.expose(), "ya29.token");
    }

    #[test]
    fn positional_args_are_extracted() {
        let (parsed, credential) =
            validate_request(&args(&["runner@example.com", "1700000000000"]), Some("tok"))
                .expect("valid request");
        assert_eq!(parsed.claimed_email, "runner@example.com");
        assert_eq!(parsed.last_mint_time_millis().unwrap(), 1_700_000_000_000);
        assert_eq!(credential.expose(), "tok");
    }

    #[test]
    fn missing_timestamp_argument_is_malformed() {
        let err = validate_request(&args(&["runner@example.com"]), Some("tok"))
            .expect_err("one argument is not enough");
        assert!(matches!(
            err,
            MintError::MalformedArgument {
                name: "lastMintTimeMillis",
                ..
            }
        ));
    }

    #[test]
    fn non_integer_timestamp_fails_only_when_read() {
        let (parsed, _) = validate_request(&args(&["runner@example.com", "yesterday"]), Some("tok"))
            .expect("shape is not validated up front");
        assert!(matches!(
            parsed.last_mint_time_millis(),
            Err(MintError::MalformedArgument { .. })
        ));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("ya29.secret");
        assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
    }
}
