//! Selection and amount rules that gate the path to submission.
//!
//! The state machine setters never validate; screens consult these
//! checks before calling them.

use thiserror::Error;

use crate::Amount;
use crate::model::{Account, Beneficiary, MAX_AMOUNT, MIN_AMOUNT};

/// Why an amount cannot be transferred from the selected account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Minimum {0}")]
    BelowMinimum(Amount),
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Exceeds daily limit")]
    ExceedsDailyLimit,
    #[error("Maximum {0}")]
    ExceedsMaximum(Amount),
}

/// Why an account or beneficiary cannot be picked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("account {0} is {1} and cannot be used as a source")]
    AccountInactive(String, crate::model::AccountStatus),
    #[error("beneficiary {0} is the source account: cannot transfer to self")]
    SameAccount(String),
    #[error("no entry with id {0}")]
    NotFound(String),
}

/// Ceilings that apply to one source account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    pub balance: Amount,
    /// Unclamped, may be negative.
    pub daily_remaining: Amount,
    /// `min(MAX_AMOUNT, balance, max(0, daily_remaining))`.
    pub effective_max: Amount,
}

impl AmountLimits {
    pub fn for_account(account: &Account) -> Self {
        let balance = account.balance;
        let daily_remaining = account.daily_remaining();
        let effective_max = MAX_AMOUNT
            .min(balance)
            .min(daily_remaining.max(Amount::ZERO));
        Self {
            balance,
            daily_remaining,
            effective_max,
        }
    }

    /// The "transfer all" amount.
    pub fn transfer_all(&self) -> Amount {
        self.effective_max
    }

    /// Inline errors for an amount entry. Zero reports nothing.
    ///
    /// Above the effective maximum only the tightest explanation is
    /// reported: balance first, then the daily allowance, then the global cap.
    pub fn check(&self, amount: Amount) -> Vec<AmountError> {
        let mut errors = Vec::new();
        if !amount.is_positive() {
            return errors;
        }
        if amount < MIN_AMOUNT {
            errors.push(AmountError::BelowMinimum(MIN_AMOUNT));
        }
        if amount > self.effective_max {
            if amount > self.balance {
                errors.push(AmountError::InsufficientBalance);
            } else if amount > self.daily_remaining {
                errors.push(AmountError::ExceedsDailyLimit);
            } else {
                errors.push(AmountError::ExceedsMaximum(MAX_AMOUNT));
            }
        }
        errors
    }

    pub fn can_proceed(&self, amount: Amount) -> bool {
        amount >= MIN_AMOUNT && amount <= self.effective_max
    }
}

/// Only active accounts may be debited.
pub fn check_source(account: &Account) -> Result<(), SelectionError> {
    if account.is_active() {
        Ok(())
    } else {
        Err(SelectionError::AccountInactive(
            account.id.clone(),
            account.status,
        ))
    }
}

/// Treats a beneficiary as the source account when the last four digits match.
///
/// This compares masked numbers only, so two different accounts sharing a
/// suffix (even at different banks) are both blocked. Full account identity
/// is not available from masked fixtures.
pub fn is_same_account(source: &Account, beneficiary: &Beneficiary) -> bool {
    match (source.last4(), beneficiary.last4()) {
        (Some(from), Some(to)) => from == to,
        _ => false,
    }
}

pub fn check_destination(
    source: &Account,
    beneficiary: &Beneficiary,
) -> Result<(), SelectionError> {
    if is_same_account(source, beneficiary) {
        Err(SelectionError::SameAccount(beneficiary.id.clone()))
    } else {
        Ok(())
    }
}
