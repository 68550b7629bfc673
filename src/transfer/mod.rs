//! Transfer state machine.
//!
//! Holds the single in-progress transfer for a session and is the only
//! thing allowed to mutate it. Transitions:
//! `idle -> pending -> success | failed`, with `failed -> pending` on retry
//! and `reset` returning to the defaults from anywhere.

use std::sync::Arc;
use tracing::info;

use crate::Amount;
use crate::model::{Account, Beneficiary};

mod executor;
pub use executor::{
    SERVICE_UNAVAILABLE, SERVICE_UNAVAILABLE_MESSAGE, ScriptedExecutor, SimulatedExecutor,
    TransferExecutor, TransferOutcome, reference_number,
};

mod state;
pub use state::{TransferState, TransferStatus};

/// Owner of the transfer aggregate.
///
/// Setters do not validate and do not cascade: replacing the source account
/// keeps a beneficiary or amount chosen for the previous one.
pub struct TransferMachine {
    state: TransferState,
    executor: Arc<dyn TransferExecutor>,
}

/// Public API
impl TransferMachine {
    pub fn new(executor: Arc<dyn TransferExecutor>) -> Self {
        Self {
            state: TransferState::default(),
            executor,
        }
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    pub fn set_from_account(&mut self, account: Option<Account>) {
        info!(
            account = account.as_ref().map(|a| a.id.as_str()).unwrap_or("none"),
            "source account set"
        );
        self.state.from_account = account;
    }

    pub fn set_to_beneficiary(&mut self, beneficiary: Option<Beneficiary>) {
        info!(
            beneficiary = beneficiary.as_ref().map(|b| b.id.as_str()).unwrap_or("none"),
            "beneficiary set"
        );
        self.state.to_beneficiary = beneficiary;
    }

    pub fn set_amount(&mut self, amount: Amount) {
        self.state.amount = amount;
    }

    /// Length is capped by the review screen, not here.
    pub fn set_remark(&mut self, remark: impl Into<String>) {
        self.state.remark = remark.into();
    }

    /// Submit the current transfer and wait for its outcome.
    ///
    /// Always ends in `Success` or `Failed`. Callers must not start a second
    /// submission while one is pending; `&mut self` already rules that out
    /// within one owner.
    pub async fn submit(&mut self) -> TransferStatus {
        self.begin_submit();
        let snapshot = self.state.clone();
        let outcome = self.executor.execute(&snapshot).await;
        self.complete(outcome);
        self.state.status
    }

    /// Back to the initial defaults.
    pub fn reset(&mut self) {
        info!("transfer reset");
        self.state = TransferState::default();
    }
}

/// Private API
impl TransferMachine {
    fn begin_submit(&mut self) {
        info!(
            amount = %self.state.amount,
            currency = %self.state.currency,
            retry = self.state.status == TransferStatus::Failed,
            "transfer submitted"
        );
        self.state.status = TransferStatus::Pending;
        self.state.error_code = None;
        self.state.error_message = None;
        self.state.ref_no = None;
        self.state.completed_at = None;
    }

    fn complete(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Completed {
                ref_no,
                completed_at,
            } => {
                info!(ref_no = %ref_no, "transfer succeeded");
                self.state.status = TransferStatus::Success;
                self.state.ref_no = Some(ref_no);
                self.state.completed_at = Some(completed_at);
                self.state.error_code = None;
                self.state.error_message = None;
            }
            TransferOutcome::Rejected { code, message } => {
                info!(code = %code, "transfer failed");
                self.state.status = TransferStatus::Failed;
                self.state.error_code = Some(code);
                self.state.error_message = Some(message);
            }
        }
    }
}

impl Default for TransferMachine {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedExecutor::default()))
    }
}
