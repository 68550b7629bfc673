//! Routes of the wizard and the guards that keep screens from rendering
//! without their prerequisites.

use std::fmt;

use crate::transfer::TransferState;

/// Wizard screens in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Screen {
    Home,
    From,
    To,
    Amount,
    Review,
    Result,
}

impl Screen {
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Home => "/transfer",
            Screen::From => "/transfer/from",
            Screen::To => "/transfer/to",
            Screen::Amount => "/transfer/amount",
            Screen::Review => "/transfer/review",
            Screen::Result => "/transfer/result",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A parsed location: screen plus the one query flag the flow honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub screen: Screen,
    /// `?from=empty`: render the account list as if the user had none.
    pub empty_accounts: bool,
}

impl Route {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            empty_accounts: false,
        }
    }

    /// Unknown paths, `/` included, land on the home screen.
    pub fn parse(location: &str) -> Self {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, query),
            None => (location, ""),
        };
        let path = path.trim().trim_end_matches('/');

        let screen = match path {
            "/transfer/from" => Screen::From,
            "/transfer/to" => Screen::To,
            "/transfer/amount" => Screen::Amount,
            "/transfer/review" => Screen::Review,
            "/transfer/result" => Screen::Result,
            _ => Screen::Home,
        };

        let empty_accounts = screen == Screen::From
            && query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .any(|(key, value)| key == "from" && value == "empty");

        Self {
            screen,
            empty_accounts,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty_accounts {
            write!(f, "{}?from=empty", self.screen.path())
        } else {
            f.write_str(self.screen.path())
        }
    }
}

/// Where to send the user instead of `screen`, if its prerequisites are missing.
///
/// Every missing prerequisite restarts the flow at the account picker.
/// The result screen needs a finished submission.
pub fn redirect_for(screen: Screen, state: &TransferState) -> Option<Screen> {
    let satisfied = match screen {
        Screen::Home | Screen::From => true,
        Screen::To => state.from_account.is_some(),
        Screen::Amount => state.from_account.is_some() && state.to_beneficiary.is_some(),
        Screen::Review => state.is_ready_for_review(),
        Screen::Result => state.status.is_terminal(),
    };
    if satisfied { None } else { Some(Screen::From) }
}
