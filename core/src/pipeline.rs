use serde::Serialize;

use crate::config::Endpoints;
use crate::day_window::{DayWindow, check_day_gate, fetch_day_window};
use crate::encoding::encode_uint256;
use crate::error::MintError;
use crate::fitness::{ActivityMetrics, aggregate_metrics};
use crate::identity::{fetch_email, verify_identity};
use crate::request::{require_credential, validate_request};
use crate::score::{CompositeScore, composite_score, tokens_for_score};
use crate::upstream::Upstream;

/// Everything a successful mint evaluation produced.
#[derive(Debug, Clone, Serialize)]
pub struct MintOutcome {
    pub day_window: DayWindow,
    pub metrics: ActivityMetrics,
    pub score: CompositeScore,
    pub tokens: i64,
}

impl MintOutcome {
    pub fn encoded(&self) -> Result<[u8; 32], MintError> {
        Ok(encode_uint256(self.tokens)?)
    }
}

/// One evaluation per call; nothing is carried between calls.
pub struct MintPipeline<U> {
    upstream: U,
    endpoints: Endpoints,
}

impl<U: Upstream> MintPipeline<U> {
    pub fn new(upstream: U, endpoints: Endpoints) -> Self {
        Self {
            upstream,
            endpoints,
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Evaluate a mint request.
    ///
    /// `args` are the positional `[claimedEmail, lastMintTimeMillis]`.
    /// Identity and day window are fetched together, then the identity check and
    /// the day gate run, then the three activity metrics are fetched together and
    /// scored.
    pub async fn compute_mint(
        &self,
        args: &[String],
        credential: Option<&str>,
    ) -> Result<MintOutcome, MintError> {
        let (invocation, credential) = validate_request(args, credential)?;

        let (email, window) = tokio::join!(
            fetch_email(&self.upstream, &self.endpoints.identity_url, &credential),
            fetch_day_window(&self.upstream, &self.endpoints.day_window_url),
        );
        // A mismatched email is reported even when the day window failed.
        let email = email?;
        verify_identity(&email, &invocation.claimed_email)?;
        let window = window?;

        check_day_gate(invocation.last_mint_time_millis()?, &window)?;
        tracing::info!(
            start_time_millis = window.start_time_millis,
            day = ?window.start(),
            "identity and day gate passed"
        );

        let metrics =
            aggregate_metrics(&self.upstream, &self.endpoints.aggregate_url, &credential, &window)
                .await;
        let score = composite_score(&metrics);
        let tokens = tokens_for_score(score.composite);
        tracing::info!(composite = score.composite, tokens, "tokens minted");

        Ok(MintOutcome {
            day_window: window,
            metrics,
            score,
            tokens,
        })
    }

    /// Email-lookup mode: return the verified email of the credential's account.
    pub async fn lookup_email(&self, credential: Option<&str>) -> Result<String, MintError> {
        let credential = require_credential(credential)?;
        fetch_email(&self.upstream, &self.endpoints.identity_url, &credential).await
    }
}
