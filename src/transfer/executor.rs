//! Executors carry out a submitted transfer.
//!
//! The flow only ever talks to a [`TransferExecutor`]. The simulated one
//! sleeps then picks a weighted random outcome; tests script outcomes instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::TransferState;

pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "INFT service is temporarily unavailable. Please try again later.";

const REF_PREFIX: &str = "INFT";

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed {
        ref_no: String,
        completed_at: DateTime<Utc>,
    },
    Rejected {
        code: String,
        message: String,
    },
}

impl TransferOutcome {
    /// Success stamped at `at`, with the matching reference number.
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        TransferOutcome::Completed {
            ref_no: reference_number(at),
            completed_at: at,
        }
    }

    pub fn service_unavailable() -> Self {
        TransferOutcome::Rejected {
            code: SERVICE_UNAVAILABLE.to_string(),
            message: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// `INFT` followed by the millisecond timestamp in upper-case base 36.
///
/// Distinct milliseconds give distinct references, and while the encoding
/// keeps its width later timestamps sort after earlier ones.
pub fn reference_number(at: DateTime<Utc>) -> String {
    let mut millis = at.timestamp_millis().max(0) as u64;
    if millis == 0 {
        return format!("{REF_PREFIX}0");
    }
    let mut digits = Vec::with_capacity(10);
    while millis > 0 {
        let d = (millis % 36) as u32;
        digits.push(char::from_digit(d, 36).unwrap_or('0').to_ascii_uppercase());
        millis /= 36;
    }
    let encoded: String = digits.into_iter().rev().collect();
    format!("{REF_PREFIX}{encoded}")
}

/// Performs the submission of a transfer snapshot.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    async fn execute(&self, transfer: &TransferState) -> TransferOutcome;
}

/// Sleeps for a fixed latency, then fails with probability `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedExecutor {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);
    pub const DEFAULT_FAILURE_RATE: f64 = 0.15;

    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY, Self::DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl TransferExecutor for SimulatedExecutor {
    async fn execute(&self, _transfer: &TransferState) -> TransferOutcome {
        tokio::time::sleep(self.latency).await;
        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            TransferOutcome::service_unavailable()
        } else {
            TransferOutcome::completed_at(Utc::now())
        }
    }
}

/// Hands out queued outcomes in order; succeeds "now" once the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    outcomes: Mutex<VecDeque<TransferOutcome>>,
}

impl ScriptedExecutor {
    pub fn new(outcomes: impl IntoIterator<Item = TransferOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }
}

#[async_trait]
impl TransferExecutor for ScriptedExecutor {
    async fn execute(&self, _transfer: &TransferState) -> TransferOutcome {
        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.unwrap_or_else(|| TransferOutcome::completed_at(Utc::now()))
    }
}
