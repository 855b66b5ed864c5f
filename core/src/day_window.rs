use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DayWindowError, MintError, UpstreamError};
use crate::upstream::{Upstream, UpstreamRequest};

pub const DAY_MILLIS: i64 = 86_400_000;

/// Canonical `[start, end)` boundary of "today" in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    pub start_time_millis: i64,
    pub end_time_millis: i64,
}

impl DayWindow {
    /// Enforces `end - start == DAY_MILLIS`.
    pub fn new(start_time_millis: i64, end_time_millis: i64) -> Result<Self, DayWindowError> {
        if start_time_millis > end_time_millis {
            return Err(DayWindowError::Inverted {
                start: start_time_millis,
                end: end_time_millis,
            });
        }
        let length = end_time_millis.checked_sub(start_time_millis);
        if length != Some(DAY_MILLIS) {
            return Err(DayWindowError::WrongLength {
                start: start_time_millis,
                end: end_time_millis,
            });
        }
        Ok(Self {
            start_time_millis,
            end_time_millis,
        })
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_time_millis)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayWindowResponse {
    start_time: Option<i64>,
    end_time: Option<i64>,
}

/// Fetch today's window from the time-utility endpoint. Unauthenticated.
pub async fn fetch_day_window<U: Upstream + ?Sized>(
    upstream: &U,
    day_window_url: &str,
) -> Result<DayWindow, MintError> {
    tracing::debug!(url = day_window_url, "fetching day window");
    let body = upstream
        .send(UpstreamRequest::get(day_window_url))
        .await
        .map_err(MintError::DayWindowFetch)?;

    let malformed = |message: String| {
        MintError::DayWindowFetch(UpstreamError::Decode {
            url: day_window_url.to_string(),
            message,
        })
    };

    let parsed: DayWindowResponse =
        serde_json::from_value(body).map_err(|e| malformed(e.to_string()))?;
    let (Some(start), Some(end)) = (parsed.start_time, parsed.end_time) else {
        return Err(malformed("startTime and endTime are required".to_string()));
    };
    DayWindow::new(start, end).map_err(|e| malformed(e.to_string()))
}

/// Reject a mint when the last one happened after today's boundary.
/// A last mint exactly on the boundary is allowed.
pub fn check_day_gate(last_mint_time_millis: i64, window: &DayWindow) -> Result<(), MintError> {
    if last_mint_time_millis > window.start_time_millis {
        tracing::info!(
            last_mint_time_millis,
            start_time_millis = window.start_time_millis,
            "already minted today"
        );
        return Err(MintError::SameDayMint {
            last_mint_time_millis,
            start_time_millis: window.start_time_millis,
        });
    }
    Ok(())
}
