use crate::Amount;
use crate::amount::Fraction;
use crate::model::{Account, Beneficiary};
use crate::transfer::TransferMachine;
use crate::validation::{AmountError, AmountLimits};

/// Amount entry. Starts blank on every visit.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountView {
    pub input: String,
    /// Errors stay hidden until the field was edited or `next` was tried.
    pub touched: bool,
    pub limits: AmountLimits,
    pub currency: String,
    pub recipient: String,
    pub recipient_bank: String,
}

impl AmountView {
    pub fn new(source: &Account, beneficiary: &Beneficiary, currency: &str) -> Self {
        Self {
            input: String::new(),
            touched: false,
            limits: AmountLimits::for_account(source),
            currency: currency.to_string(),
            recipient: beneficiary.name.clone(),
            recipient_bank: beneficiary.bank_name.clone(),
        }
    }

    /// Replace the field contents, subject to keystroke sanitising.
    pub fn edit(&mut self, text: &str) {
        self.input = Amount::sanitize_input(&self.input, text);
        self.touched = true;
    }

    pub fn transfer_all(&mut self) {
        self.input = self
            .limits
            .transfer_all()
            .grouped(Fraction::Trimmed)
            .replace(',', "");
        self.touched = true;
    }

    pub fn amount(&self) -> Amount {
        Amount::parse_input(&self.input)
    }

    /// Errors to display inline.
    pub fn visible_errors(&self) -> Vec<AmountError> {
        if self.touched {
            self.limits.check(self.amount())
        } else {
            Vec::new()
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.limits.can_proceed(self.amount())
    }

    /// Commit the amount if it is acceptable. Marks the field touched either way.
    pub fn next(&mut self, machine: &mut TransferMachine) -> Result<Amount, Vec<AmountError>> {
        self.touched = true;
        let amount = self.amount();
        if !self.can_proceed() {
            return Err(self.limits.check(amount));
        }
        machine.set_amount(amount);
        Ok(amount)
    }
}
