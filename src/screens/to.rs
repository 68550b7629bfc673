use tracing::warn;

use super::Listing;
use crate::model::{Account, Beneficiary};
use crate::provider::DataProvider;
use crate::transfer::TransferMachine;
use crate::validation::{SelectionError, check_destination, is_same_account};

pub const LOAD_FAILED: &str = "Failed to load beneficiaries. Please try again later.";

/// Recipient picker. Only reachable with a source account selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ToView {
    pub beneficiaries: Listing<Beneficiary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeneficiaryRow<'a> {
    pub beneficiary: &'a Beneficiary,
    /// Same account as the source; shown disabled.
    pub same_account: bool,
    pub selected: bool,
}

impl ToView {
    pub async fn load(provider: &dyn DataProvider) -> Self {
        let beneficiaries = match provider.list_beneficiaries().await {
            Ok(list) => Listing::from_items(list),
            Err(e) => {
                warn!(reason = %e, "beneficiary list failed to load");
                Listing::Failed(LOAD_FAILED.to_string())
            }
        };
        Self { beneficiaries }
    }

    pub fn rows<'a>(
        &'a self,
        source: &Account,
        selected: Option<&Beneficiary>,
    ) -> Vec<BeneficiaryRow<'a>> {
        self.beneficiaries
            .items()
            .iter()
            .map(|beneficiary| BeneficiaryRow {
                beneficiary,
                same_account: is_same_account(source, beneficiary),
                selected: selected.is_some_and(|s| s.id == beneficiary.id),
            })
            .collect()
    }

    /// Pick `id` as the recipient. The source account itself is refused.
    pub fn select(&self, id: &str, machine: &mut TransferMachine) -> Result<(), SelectionError> {
        let beneficiary = self
            .beneficiaries
            .items()
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| SelectionError::NotFound(id.to_string()))?;
        if let Some(source) = machine.state().from_account.as_ref() {
            check_destination(source, beneficiary)?;
        }
        machine.set_to_beneficiary(Some(beneficiary.clone()));
        Ok(())
    }
}
