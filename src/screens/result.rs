use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::export::{Rgba, Snapshot};
use crate::transfer::{TransferState, TransferStatus};

pub const RECEIPT_PREFIX: &str = "INFT_Receipt";
pub const SCREEN_PREFIX: &str = "INFT_Screen";

/// Outcome of the last submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub success: bool,
    /// Completion time in the local zone, `—` when absent.
    pub completed: String,
}

impl ResultView {
    pub fn new(state: &TransferState) -> Self {
        Self {
            success: state.status == TransferStatus::Success,
            completed: state
                .completed_at
                .map(|at| format_time(&at.with_timezone(&Local)))
                .unwrap_or_else(|| "—".to_string()),
        }
    }

    fn badge(&self) -> Rgba {
        if self.success { Rgba::GREEN } else { Rgba::RED }
    }

    /// The receipt card: status badge and, on success, the detail rows.
    pub fn receipt(&self) -> Snapshot {
        Snapshot {
            width: Snapshot::WIDTH,
            nav_bar: false,
            badge: Some(self.badge()),
            rows: if self.success { 4 } else { 0 },
            buttons: 0,
        }
    }

    /// The whole screen, including the action buttons below the receipt.
    pub fn screen(&self) -> Snapshot {
        Snapshot {
            nav_bar: true,
            buttons: 4,
            ..self.receipt()
        }
    }
}

/// `MM/DD/YYYY, hh:mm:ss AM`
pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%m/%d/%Y, %I:%M:%S %p").to_string()
}
