//! Screen view models.
//!
//! Each screen keeps only its local input state; everything that outlives
//! the screen goes through the [`TransferMachine`](crate::transfer::TransferMachine)
//! it is handed.

mod amount;
mod from;
mod home;
mod result;
mod review;
mod to;

pub use amount::AmountView;
pub use from::{AccountRow, FromView};
pub use home::{HomeView, TransferKind, TransferOption};
pub use result::{RECEIPT_PREFIX, ResultView, SCREEN_PREFIX, format_time};
pub use review::ReviewView;
pub use to::{BeneficiaryRow, ToView};

use crate::flow::Screen;

/// Loaded list state shared by the pickers.
///
/// Views are built once their load has finished, so there is no loading state.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    /// Load failed; the message is shown with a retry prompt.
    Failed(String),
    /// Loaded, nothing to show. Distinct from `Failed`.
    Empty,
    Ready(Vec<T>),
}

impl<T> Listing<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Ready(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Listing::Failed(_))
    }
}

/// What is currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home(HomeView),
    From(FromView),
    To(ToView),
    Amount(AmountView),
    Review(ReviewView),
    Result(ResultView),
}

impl View {
    pub fn screen(&self) -> Screen {
        match self {
            View::Home(_) => Screen::Home,
            View::From(_) => Screen::From,
            View::To(_) => Screen::To,
            View::Amount(_) => Screen::Amount,
            View::Review(_) => Screen::Review,
            View::Result(_) => Screen::Result,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Home(_) => "Transfer",
            View::From(_) => "From Account",
            View::To(_) => "To",
            View::Amount(_) => "Amount",
            View::Review(_) => "Review",
            View::Result(view) if view.success => "Transfer complete",
            View::Result(_) => "Transfer result",
        }
    }

    /// The navigation bar's back button.
    pub fn shows_back(&self) -> bool {
        match self {
            View::Home(_) => false,
            View::Result(view) => !view.success,
            _ => true,
        }
    }

    /// Screens whose navigation bar offers a screenshot.
    pub fn allows_screenshot(&self) -> bool {
        !matches!(self, View::Result(_))
    }
}
