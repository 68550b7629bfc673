use tracing::warn;

use super::Listing;
use crate::model::{Account, AccountStatus};
use crate::provider::DataProvider;
use crate::transfer::TransferMachine;
use crate::validation::{SelectionError, check_source};

pub const LOAD_FAILED: &str = "Failed to load accounts. Please try again later.";

/// Source account picker.
#[derive(Debug, Clone, PartialEq)]
pub struct FromView {
    pub accounts: Listing<Account>,
    /// Loaded with `?from=empty`.
    pub empty_demo: bool,
}

/// One account line as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRow<'a> {
    pub account: &'a Account,
    pub selectable: bool,
    pub selected: bool,
    pub note: Option<&'static str>,
}

impl FromView {
    pub async fn load(provider: &dyn DataProvider, empty_demo: bool) -> Self {
        let accounts = match provider.list_accounts(empty_demo).await {
            Ok(accounts) => Listing::from_items(accounts),
            Err(e) => {
                warn!(reason = %e, "account list failed to load");
                Listing::Failed(LOAD_FAILED.to_string())
            }
        };
        Self {
            accounts,
            empty_demo,
        }
    }

    pub fn rows<'a>(&'a self, selected: Option<&Account>) -> Vec<AccountRow<'a>> {
        self.accounts
            .items()
            .iter()
            .map(|account| {
                let note = match account.status {
                    AccountStatus::Frozen => Some("Frozen"),
                    AccountStatus::Suspended => Some("Suspended"),
                    AccountStatus::Active if account.balance.is_zero() => {
                        Some("Insufficient balance")
                    }
                    AccountStatus::Active => None,
                };
                AccountRow {
                    account,
                    selectable: account.is_active(),
                    selected: selected.is_some_and(|s| s.id == account.id),
                    note,
                }
            })
            .collect()
    }

    /// Pick `id` as the source. Inactive accounts are refused.
    pub fn select(&self, id: &str, machine: &mut TransferMachine) -> Result<(), SelectionError> {
        let account = self
            .accounts
            .items()
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| SelectionError::NotFound(id.to_string()))?;
        check_source(account)?;
        machine.set_from_account(Some(account.clone()));
        Ok(())
    }
}
