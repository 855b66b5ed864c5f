//! # BuffBucks core
//!
//! Computes how many tokens a user may mint for today's activity.
//!
//! A mint evaluation runs in order:
//!
//! - credential and positional arguments are checked ([`request`])
//! - the account email ([`identity`]) and today's boundary ([`day_window`]) are
//!   fetched concurrently
//! - the claimed email must match and the last mint must be before today
//! - steps, calories and heart-minutes are aggregated concurrently ([`fitness`])
//! - the metrics are scored and mapped onto a token amount ([`score`])
//!
//! Nothing is persisted. The caller passes the previous mint time in and
//! receives an [`encoding`]-ready amount back.

pub mod config;
pub mod day_window;
pub mod encoding;
pub mod error;
pub mod fitness;
pub mod identity;
pub mod pipeline;
pub mod request;
pub mod score;
pub mod upstream;

pub use config::Endpoints;
pub use error::{MintError, UpstreamError};
pub use pipeline::{MintOutcome, MintPipeline};
pub use request::{Credential, InvocationArgs};
pub use upstream::{HttpUpstream, Upstream};
