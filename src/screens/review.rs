use crate::model::REMARK_MAX_LEN;
use crate::transfer::{TransferMachine, TransferState, TransferStatus};

/// Summary before submission, with the optional remark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    /// Local copy, committed on confirm.
    pub remark: String,
}

impl ReviewView {
    pub fn new(state: &TransferState) -> Self {
        Self {
            remark: state.remark.clone(),
        }
    }

    /// Keeps at most [`REMARK_MAX_LEN`] characters.
    pub fn edit_remark(&mut self, text: &str) {
        self.remark = text.chars().take(REMARK_MAX_LEN).collect();
    }

    /// Commit the remark and submit. The exclusive borrow of `machine`
    /// keeps a second confirm out until this one resolves.
    pub async fn confirm(&self, machine: &mut TransferMachine) -> TransferStatus {
        machine.set_remark(self.remark.clone());
        machine.submit().await
    }
}
