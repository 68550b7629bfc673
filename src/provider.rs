//! Mock account and beneficiary lists.
//!
//! Fixtures are csv tables compiled into the binary and parsed on every
//! load, after a simulated network delay.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::Amount;
use crate::model::{Account, AccountKind, AccountStatus, Beneficiary};

const ACCOUNTS_CSV: &str = include_str!("fixtures/accounts.csv");
const BENEFICIARIES_CSV: &str = include_str!("fixtures/beneficiaries.csv");

/// Errors that can occur when loading a list
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{table} line {line}: failed to parse row: {source}")]
    Parse {
        table: &'static str,
        line: usize,
        source: csv::Error,
    },

    #[error("{table} line {line}: negative balance {balance}")]
    NegativeBalance {
        table: &'static str,
        line: usize,
        balance: Amount,
    },
}

/// Read-only source of the lists shown by the from and to screens.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// `empty` simulates a user without accounts.
    async fn list_accounts(&self, empty: bool) -> Result<Vec<Account>, ProviderError>;

    async fn list_beneficiaries(&self) -> Result<Vec<Beneficiary>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    id: String,
    name: String,
    kind: AccountKind,
    number: String,
    balance: f64,
    currency: String,
    status: AccountStatus,
    daily_limit: Option<f64>,
    used_today: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BeneficiaryRow {
    id: String,
    name: String,
    bank_name: String,
    bank_code: String,
    account_number: String,
    kind: AccountKind,
    verified: Option<bool>,
}

/// Parse an accounts table
pub fn parse_accounts(data: &str) -> Result<Vec<Account>, ProviderError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    reader
        .into_deserialize::<AccountRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| ProviderError::Parse {
                table: "accounts",
                line,
                source,
            })?;
            let balance = Amount::from_float(row.balance);
            if balance < Amount::ZERO {
                return Err(ProviderError::NegativeBalance {
                    table: "accounts",
                    line,
                    balance,
                });
            }
            Ok(Account {
                id: row.id,
                name: row.name,
                kind: row.kind,
                number: row.number,
                balance,
                currency: row.currency,
                status: row.status,
                daily_limit: row.daily_limit.map(Amount::from_float),
                used_today: row.used_today.map(Amount::from_float),
            })
        })
        .collect()
}

/// Parse a beneficiaries table
pub fn parse_beneficiaries(data: &str) -> Result<Vec<Beneficiary>, ProviderError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    reader
        .into_deserialize::<BeneficiaryRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| ProviderError::Parse {
                table: "beneficiaries",
                line,
                source,
            })?;
            Ok(Beneficiary {
                id: row.id,
                name: row.name,
                bank_name: row.bank_name,
                bank_code: row.bank_code,
                account_number: row.account_number,
                kind: row.kind,
                verified: row.verified.unwrap_or(false),
            })
        })
        .collect()
}

/// Serves the bundled fixtures (or caller supplied tables).
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    accounts: String,
    beneficiaries: String,
    accounts_latency: Duration,
    beneficiaries_latency: Duration,
}

impl FixtureProvider {
    pub const ACCOUNTS_LATENCY: Duration = Duration::from_millis(600);
    pub const BENEFICIARIES_LATENCY: Duration = Duration::from_millis(400);

    pub fn new() -> Self {
        Self::with_tables(ACCOUNTS_CSV, BENEFICIARIES_CSV)
    }

    pub fn with_tables(accounts: impl Into<String>, beneficiaries: impl Into<String>) -> Self {
        Self {
            accounts: accounts.into(),
            beneficiaries: beneficiaries.into(),
            accounts_latency: Self::ACCOUNTS_LATENCY,
            beneficiaries_latency: Self::BENEFICIARIES_LATENCY,
        }
    }

    pub fn latency(mut self, accounts: Duration, beneficiaries: Duration) -> Self {
        self.accounts_latency = accounts;
        self.beneficiaries_latency = beneficiaries;
        self
    }
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for FixtureProvider {
    async fn list_accounts(&self, empty: bool) -> Result<Vec<Account>, ProviderError> {
        tokio::time::sleep(self.accounts_latency).await;
        if empty {
            debug!("accounts requested empty");
            return Ok(Vec::new());
        }
        let accounts = parse_accounts(&self.accounts)?;
        debug!(count = accounts.len(), "accounts loaded");
        Ok(accounts)
    }

    async fn list_beneficiaries(&self) -> Result<Vec<Beneficiary>, ProviderError> {
        tokio::time::sleep(self.beneficiaries_latency).await;
        let beneficiaries = parse_beneficiaries(&self.beneficiaries)?;
        debug!(count = beneficiaries.len(), "beneficiaries loaded");
        Ok(beneficiaries)
    }
}
