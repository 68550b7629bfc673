//! Core domain types for the INFT transfer flow.

use serde::Deserialize;
use std::fmt;

use crate::Amount;

/// Smallest amount accepted for one transfer.
pub const MIN_AMOUNT: Amount = Amount::from_units(1);

/// Largest amount accepted for one transfer, whatever the account limits.
pub const MAX_AMOUNT: Amount = Amount::from_units(50_000);

/// Daily debit limit assumed when an account carries none.
pub const DAILY_LIMIT_DEFAULT: Amount = Amount::from_units(50_000);

/// INFT transfers are free.
pub const INFT_FEE: Amount = Amount::ZERO;

pub const DEFAULT_CURRENCY: &str = "CNY";

/// Maximum remark length, in characters.
pub const REMARK_MAX_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Frozen,
    Suspended,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountStatus::Active => "Active",
            AccountStatus::Frozen => "Frozen",
            AccountStatus::Suspended => "Suspended",
        };
        f.write_str(label)
    }
}

/// One of the user's own accounts, a candidate source of funds.
///
/// Fixtures are read-only; nothing in the flow writes back `used_today`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    /// Masked, e.g. `**** 8821`.
    pub number: String,
    pub balance: Amount,
    pub currency: String,
    pub status: AccountStatus,
    pub daily_limit: Option<Amount>,
    pub used_today: Option<Amount>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// `daily_limit - used_today`; may be negative if the fixture is inconsistent.
    pub fn daily_remaining(&self) -> Amount {
        self.daily_limit.unwrap_or(DAILY_LIMIT_DEFAULT) - self.used_today.unwrap_or_default()
    }

    pub fn last4(&self) -> Option<String> {
        last4_digits(&self.number)
    }
}

/// A saved transfer recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Beneficiary {
    pub id: String,
    pub name: String,
    pub bank_name: String,
    pub bank_code: String,
    /// Masked, e.g. `6222 **** **** 1234`.
    pub account_number: String,
    pub kind: AccountKind,
    pub verified: bool,
}

impl Beneficiary {
    pub fn last4(&self) -> Option<String> {
        last4_digits(&self.account_number)
    }
}

/// Last four digits of a masked account number, ignoring everything that is not a digit.
fn last4_digits(number: &str) -> Option<String> {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].iter().collect())
}
