use buffbucks_core::encoding::to_hex;
use buffbucks_core::{MintPipeline, Upstream};
use serde_json::json;

use crate::util::{print_json, report_failure};

pub async fn run<U: Upstream>(
    pipeline: &MintPipeline<U>,
    args: &[String],
    credential: Option<&str>,
) -> i32 {
    let outcome = match pipeline.compute_mint(args, credential).await {
        Ok(outcome) => outcome,
        Err(e) => return report_failure(&e),
    };
    let encoded = match outcome.encoded() {
        Ok(bytes) => bytes,
        Err(e) => return report_failure(&e),
    };

    print_json(&json!({
        "tokens": outcome.tokens,
        "encoded": to_hex(&encoded),
        "day_window": outcome.day_window,
        "metrics": outcome.metrics,
        "score": outcome.score,
    }))
}
