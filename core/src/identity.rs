use serde::Deserialize;

use crate::error::{MintError, UpstreamError};
use crate::request::Credential;
use crate::upstream::{Upstream, UpstreamRequest};

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    email: Option<String>,
}

/// Fetch the email of the account behind `credential`.
pub async fn fetch_email<U: Upstream + ?Sized>(
    upstream: &U,
    identity_url: &str,
    credential: &Credential,
) -> Result<String, MintError> {
    let request = UpstreamRequest::get(identity_url).bearer(credential.expose());
    tracing::debug!(url = identity_url, "fetching account identity");

    let body = upstream.send(request).await.map_err(MintError::IdentityFetch)?;
    let info: UserInfoResponse = serde_json::from_value(body).map_err(|e| {
        MintError::IdentityFetch(UpstreamError::Decode {
            url: identity_url.to_string(),
            message: e.to_string(),
        })
    })?;

    info.email.ok_or_else(|| {
        MintError::IdentityFetch(UpstreamError::Decode {
            url: identity_url.to_string(),
            message: "response carries no email".to_string(),
        })
    })
}

/// Exact, case-sensitive comparison.
pub fn verify_identity(fetched_email: &str, claimed_email: &str) -> Result<(), MintError> {
    if fetched_email != claimed_email {
        tracing::warn!("claimed email does not match the authenticated account");
        return Err(MintError::IdentityMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::upstream::Method;
    use crate::upstream::fake::{RecordingUpstream, Reply};

    const URL: &str = "https://id.example/userinfo";

    #[tokio::test]
    async fn fetch_email_sends_bearer_get() {
        let upstream =
            RecordingUpstream::new().route(URL, Reply::Json(json!({"email": "a@example.com"})));
        let email = fetch_email(&upstream, URL, &Credential::new("tok"))
            .await
            .expect("email");
        assert_eq!(email, "a@example.com");

        let calls = upstream.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].header_value("Authorization"), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn fetch_email_error_status_is_fatal() {
        let upstream = RecordingUpstream::new().route(URL, Reply::Status(401));
        let err = fetch_email(&upstream, URL, &Credential::new("tok"))
            .await
            .expect_err("401 must fail");
        assert!(matches!(err, MintError::IdentityFetch(UpstreamError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn fetch_email_without_email_field_is_fatal() {
        let upstream = RecordingUpstream::new().route(URL, Reply::Json(json!({"id": "123"})));
        let err = fetch_email(&upstream, URL, &Credential::new("tok"))
            .await
            .expect_err("payload without email must fail");
        assert!(matches!(err, MintError::IdentityFetch(UpstreamError::Decode { .. })));
    }

    #[test]
    fn verify_identity_is_case_sensitive() {
        verify_identity("a@example.com", "a@example.com").expect("same email passes");
        assert!(matches!(
            verify_identity("A@example.com", "a@example.com"),
            Err(MintError::IdentityMismatch)
        ));
    }
}
