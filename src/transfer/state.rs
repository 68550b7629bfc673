use chrono::{DateTime, Utc};
use std::fmt;

use crate::Amount;
use crate::model::{Account, Beneficiary, DEFAULT_CURRENCY, INFT_FEE};

/// Lifecycle of one transfer attempt.
///
/// `Failed` is terminal for the attempt but may be retried, re-entering `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Success | TransferStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Idle => "idle",
            TransferStatus::Pending => "pending",
            TransferStatus::Success => "success",
            TransferStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The in-progress transfer aggregate.
///
/// When `status` is terminal exactly one of `ref_no + completed_at` or
/// `error_code + error_message` is set; otherwise all four are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferState {
    pub from_account: Option<Account>,
    pub to_beneficiary: Option<Beneficiary>,
    pub amount: Amount,
    pub currency: String,
    pub fee: Amount,
    pub remark: String,
    pub status: TransferStatus,
    pub ref_no: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for TransferState {
    fn default() -> Self {
        Self {
            from_account: None,
            to_beneficiary: None,
            amount: Amount::ZERO,
            currency: DEFAULT_CURRENCY.to_string(),
            fee: INFT_FEE,
            remark: String::new(),
            status: TransferStatus::Idle,
            ref_no: None,
            error_code: None,
            error_message: None,
            completed_at: None,
        }
    }
}

impl TransferState {
    /// Source, beneficiary and a positive amount are all present.
    pub fn is_ready_for_review(&self) -> bool {
        self.from_account.is_some() && self.to_beneficiary.is_some() && self.amount.is_positive()
    }

    /// Checks the terminal-field exclusivity rule.
    pub fn outcome_fields_consistent(&self) -> bool {
        let success_fields = self.ref_no.is_some() && self.completed_at.is_some();
        let failure_fields = self.error_code.is_some() && self.error_message.is_some();
        let any_set = self.ref_no.is_some()
            || self.completed_at.is_some()
            || self.error_code.is_some()
            || self.error_message.is_some();
        match self.status {
            TransferStatus::Success => {
                success_fields && self.error_code.is_none() && self.error_message.is_none()
            }
            TransferStatus::Failed => {
                failure_fields && self.ref_no.is_none() && self.completed_at.is_none()
            }
            TransferStatus::Idle | TransferStatus::Pending => !any_set,
        }
    }
}
