use buffbucks_core::encoding::{encode_string, to_hex};
use buffbucks_core::{MintPipeline, Upstream};
use serde_json::json;

use crate::util::{print_json, report_failure};

pub async fn run<U: Upstream>(pipeline: &MintPipeline<U>, credential: Option<&str>) -> i32 {
    match pipeline.lookup_email(credential).await {
        Ok(email) => print_json(&json!({
            "encoded": to_hex(&encode_string(&email)),
            "email": email,
        })),
        Err(e) => report_failure(&e),
    }
}
