//! Daily activity aggregation against the fitness dataset API.
//!
//! Three aggregate queries (steps, calories, heart-minutes) are issued together
//! and all of them are awaited. A failing query never aborts the run: the
//! affected metric is logged and counted as zero.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::day_window::{DAY_MILLIS, DayWindow};
use crate::error::UpstreamError;
use crate::request::Credential;
use crate::upstream::{Upstream, UpstreamRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Steps,
    Calories,
    HeartPoints,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Steps, Metric::Calories, Metric::HeartPoints];

    pub fn data_type_name(self) -> &'static str {
        match self {
            Metric::Steps => "com.google.step_count.delta",
            Metric::Calories => "com.google.calories.expended",
            Metric::HeartPoints => "com.google.heart_minutes",
        }
    }

    pub fn data_source_id(self) -> &'static str {
        match self {
            Metric::Steps => {
                "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps"
            }
            Metric::Calories => {
                "derived:com.google.calories.expended:com.google.android.gms:merge_calories_expended"
            }
            Metric::HeartPoints => {
                "derived:com.google.heart_minutes:com.google.android.gms:merge_heart_minutes"
            }
        }
    }

    /// The step query has always gone out without an explicit Content-Type.
    fn declares_json_content_type(self) -> bool {
        !matches!(self, Metric::Steps)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Calories => "calories",
            Metric::HeartPoints => "heart_points",
        }
    }
}

/// Request body for one aggregate query, bucketed by a single day.
pub fn aggregate_body(metric: Metric, window: &DayWindow) -> Value {
    json!({
        "aggregateBy": [{
            "dataTypeName": metric.data_type_name(),
            "dataSourceId": metric.data_source_id(),
        }],
        "bucketByTime": { "durationMillis": DAY_MILLIS },
        "startTimeMillis": window.start_time_millis,
        "endTimeMillis": window.end_time_millis,
    })
}

pub fn aggregate_request(
    metric: Metric,
    aggregate_url: &str,
    credential: &Credential,
    window: &DayWindow,
) -> UpstreamRequest {
    let request =
        UpstreamRequest::post(aggregate_url, aggregate_body(metric, window)).bearer(credential.expose());
    if metric.declares_json_content_type() {
        request.header("Content-Type", "application/json")
    } else {
        request
    }
}

// Aggregate response schema. Every level is optional; absence means no data.

#[derive(Debug, Default, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub bucket: Vec<Bucket>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub dataset: Vec<Dataset>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub point: Vec<DataPoint>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub value: Vec<TypedValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    #[serde(default)]
    pub int_val: Option<i64>,
    #[serde(default)]
    pub fp_val: Option<f64>,
}

impl AggregateResponse {
    /// First value of every point in each bucket's first dataset.
    fn first_values(&self) -> impl Iterator<Item = &TypedValue> {
        self.bucket
            .iter()
            .filter_map(|b| b.dataset.first())
            .flat_map(|d| d.point.iter())
            .filter_map(|p| p.value.first())
    }

    pub fn sum_int(&self) -> i64 {
        self.first_values()
            .map(|v| v.int_val.unwrap_or(0))
            .fold(0i64, i64::saturating_add)
    }

    pub fn sum_fp(&self) -> f64 {
        self.first_values().map(|v| v.fp_val.unwrap_or(0.0)).sum()
    }
}

/// Raw daily totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActivityMetrics {
    pub steps: i64,
    pub calories: f64,
    pub heart_points: f64,
}

async fn fetch_aggregate<U: Upstream + ?Sized>(
    upstream: &U,
    metric: Metric,
    aggregate_url: &str,
    credential: &Credential,
    window: &DayWindow,
) -> Result<AggregateResponse, UpstreamError> {
    tracing::debug!(metric = metric.as_str(), "dispatching aggregate query");
    let body = upstream
        .send(aggregate_request(metric, aggregate_url, credential, window))
        .await?;
    serde_json::from_value(body).map_err(|e| UpstreamError::Decode {
        url: aggregate_url.to_string(),
        message: e.to_string(),
    })
}

/// Soft failure: an errored metric contributes nothing.
fn or_empty(metric: Metric, result: Result<AggregateResponse, UpstreamError>) -> AggregateResponse {
    result.unwrap_or_else(|err| {
        tracing::warn!(metric = metric.as_str(), error = %err, "aggregate query failed, counting metric as zero");
        AggregateResponse::default()
    })
}

/// Fan out the three aggregate queries and wait for all of them.
pub async fn aggregate_metrics<U: Upstream + ?Sized>(
    upstream: &U,
    aggregate_url: &str,
    credential: &Credential,
    window: &DayWindow,
) -> ActivityMetrics {
    let (steps, calories, heart_points) = tokio::join!(
        fetch_aggregate(upstream, Metric::Steps, aggregate_url, credential, window),
        fetch_aggregate(upstream, Metric::Calories, aggregate_url, credential, window),
        fetch_aggregate(upstream, Metric::HeartPoints, aggregate_url, credential, window),
    );

    let metrics = ActivityMetrics {
        steps: or_empty(Metric::Steps, steps).sum_int(),
        calories: or_empty(Metric::Calories, calories).sum_fp(),
        heart_points: or_empty(Metric::HeartPoints, heart_points).sum_fp(),
    };
    tracing::info!(
        steps = metrics.steps,
        calories = metrics.calories,
        heart_points = metrics.heart_points,
        "aggregated daily activity"
    );
    metrics
}
