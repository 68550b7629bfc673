//! Screen flow.
//!
//! The wizard owns the [`TransferMachine`] and hands it to whichever screen
//! is active. Every navigation goes through the prerequisite guard, so a
//! screen is never built from partial state.

use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::config::Config;
use crate::export::{ExportError, ExportOptions, Snapshot, export_png, timestamped_filename};
use crate::flow::{Route, Screen, redirect_for};
use crate::provider::{DataProvider, FixtureProvider};
use crate::screens::{
    AmountView, FromView, HomeView, RECEIPT_PREFIX, ResultView, ReviewView, SCREEN_PREFIX,
    ToView, TransferKind, View,
};
use crate::transfer::{SimulatedExecutor, TransferMachine, TransferState};
use crate::validation::{AmountError, SelectionError};

/// Screenshot prefix used by every screen except the result screen.
const LAYOUT_SCREEN_PREFIX: &str = "Screen";
const RECEIPT_BACKGROUND: &str = "#ffffff";
const SCREEN_BACKGROUND: &str = "var(--ios-bg)";

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Go to a location, e.g. `/transfer/from?from=empty`.
    Open(String),
    Choose(TransferKind),
    /// Pick an account on `from` or a beneficiary on `to`, by id.
    Select(String),
    /// New contents of the amount field.
    Type(String),
    TransferAll,
    Next,
    Remark(String),
    Confirm,
    Back,
    /// Reload a failed list, or return to review after a failed submission.
    Retry,
    TransferAgain,
    /// "Back to transfer" on the result screen.
    Home,
    Export(ExportTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Receipt,
    Screen,
}

/// Why an action was refused. The session carries on regardless.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{action} is not available on {screen}")]
    Unavailable { action: &'static str, screen: Screen },

    #[error("{0:?} transfers are coming soon")]
    ComingSoon(TransferKind),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("amount {amount} cannot proceed{}", join_errors(.errors))]
    Amount {
        amount: Amount,
        errors: Vec<AmountError>,
    },

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

fn join_errors(errors: &[AmountError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!(": {}", joined.join("; "))
}

/// The transfer wizard.
pub struct Wizard {
    machine: TransferMachine,
    provider: Arc<dyn DataProvider>,
    export_dir: PathBuf,
    export_scale: u32,
    route: Route,
    view: View,
    history: Vec<Route>,
    notice: Option<String>,
}

/// Public API
impl Wizard {
    pub fn new(machine: TransferMachine, provider: Arc<dyn DataProvider>) -> Self {
        Self {
            machine,
            provider,
            export_dir: PathBuf::from("."),
            export_scale: 2,
            route: Route::new(Screen::Home),
            view: View::Home(HomeView::new()),
            history: Vec::new(),
            notice: None,
        }
    }

    /// Simulated executor and bundled fixtures, tuned by `config`.
    pub fn from_config(config: &Config) -> Self {
        let executor = SimulatedExecutor::new(config.submit_latency(), config.failure_rate);
        let provider = FixtureProvider::new()
            .latency(config.accounts_latency(), config.beneficiaries_latency());
        Self::new(TransferMachine::new(Arc::new(executor)), Arc::new(provider))
            .export_to(config.export_dir.clone(), config.export_scale)
    }

    pub fn export_to(mut self, dir: impl Into<PathBuf>, scale: u32) -> Self {
        self.export_dir = dir.into();
        self.export_scale = scale;
        self
    }

    pub fn state(&self) -> &TransferState {
        self.machine.state()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Transient message from the last action (alerts, export results, refusals).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Run actions until the stream ends, calling `after_each` once per action.
    pub async fn run<S, F>(&mut self, mut actions: S, mut after_each: F)
    where
        S: Stream<Item = Action> + Unpin,
        F: FnMut(&Wizard),
    {
        while let Some(action) = actions.next().await {
            // a refused action never ends the session
            let _ = self.dispatch(action).await;
            after_each(self);
        }
    }

    /// Apply one action.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), ActionError> {
        self.notice = None;
        let result = self.apply(action).await;
        if let Err(e) = &result {
            warn!(screen = %self.route.screen, reason = %e, "action refused");
            self.notice = Some(e.to_string());
        }
        result
    }
}

/// Private API
impl Wizard {
    fn unavailable(&self, action: &'static str) -> ActionError {
        ActionError::Unavailable {
            action,
            screen: self.route.screen,
        }
    }

    async fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::Open(location) => {
                self.navigate(Route::parse(&location)).await;
            }
            Action::Choose(kind) => {
                let View::Home(home) = &self.view else {
                    return Err(self.unavailable("choose"));
                };
                if !home.is_available(kind) {
                    return Err(ActionError::ComingSoon(kind));
                }
                self.navigate(Route::new(Screen::From)).await;
            }
            Action::Select(id) => match &self.view {
                View::From(view) => {
                    view.select(&id, &mut self.machine)?;
                    self.navigate(Route::new(Screen::To)).await;
                }
                View::To(view) => {
                    view.select(&id, &mut self.machine)?;
                    self.navigate(Route::new(Screen::Amount)).await;
                }
                _ => return Err(self.unavailable("select")),
            },
            Action::Type(text) => {
                let View::Amount(view) = &mut self.view else {
                    return Err(self.unavailable("type"));
                };
                view.edit(&text);
            }
            Action::TransferAll => {
                let View::Amount(view) = &mut self.view else {
                    return Err(self.unavailable("transfer all"));
                };
                view.transfer_all();
            }
            Action::Next => {
                let View::Amount(view) = &mut self.view else {
                    return Err(self.unavailable("next"));
                };
                let amount = view.amount();
                view.next(&mut self.machine)
                    .map_err(|errors| ActionError::Amount { amount, errors })?;
                self.navigate(Route::new(Screen::Review)).await;
            }
            Action::Remark(text) => {
                let View::Review(view) = &mut self.view else {
                    return Err(self.unavailable("remark"));
                };
                view.edit_remark(&text);
            }
            Action::Confirm => {
                let View::Review(view) = &self.view else {
                    return Err(self.unavailable("confirm"));
                };
                view.confirm(&mut self.machine).await;
                self.navigate(Route::new(Screen::Result)).await;
            }
            Action::Back => {
                if !self.view.shows_back() {
                    return Err(self.unavailable("back"));
                }
                let previous = self.history.pop().unwrap_or(Route::new(Screen::Home));
                // "Back to edit" on review always reopens the amount entry
                let previous = match self.view {
                    View::Review(_) => Route::new(Screen::Amount),
                    _ => previous,
                };
                self.enter(previous).await;
            }
            Action::Retry => match &self.view {
                View::From(view) if view.accounts.is_failed() => self.enter(self.route).await,
                View::To(view) if view.beneficiaries.is_failed() => self.enter(self.route).await,
                View::Result(view) if !view.success => {
                    self.navigate(Route::new(Screen::Review)).await;
                }
                _ => return Err(self.unavailable("retry")),
            },
            Action::TransferAgain => {
                if !matches!(&self.view, View::Result(view) if view.success) {
                    return Err(self.unavailable("transfer again"));
                }
                self.machine.reset();
                self.history = vec![Route::new(Screen::Home)];
                self.enter(Route::new(Screen::From)).await;
            }
            Action::Home => {
                if !matches!(self.view, View::Result(_)) {
                    return Err(self.unavailable("back to transfer"));
                }
                self.navigate(Route::new(Screen::Home)).await;
            }
            Action::Export(target) => {
                let Some((snapshot, prefix, background)) = self.export_source(target) else {
                    return Err(self.unavailable("export"));
                };
                let path = self.export(&snapshot, prefix, background)?;
                self.notice = Some(format!("Saved {}", path.display()));
            }
        }
        Ok(())
    }

    /// Enter `route`, remembering the current one for `back`.
    ///
    /// History never holds the screen being shown, and holds each screen at
    /// most once: landing on a remembered screen drops everything after it.
    async fn navigate(&mut self, route: Route) {
        let previous = self.route;
        self.enter(route).await;
        self.history.push(previous);
        let current = self.route.screen;
        if let Some(idx) = self.history.iter().position(|r| r.screen == current) {
            self.history.truncate(idx);
        }
    }

    /// Build the view for `route`, bouncing to the account picker when the
    /// transfer is missing what the screen needs.
    async fn enter(&mut self, route: Route) {
        let mut route = route;
        if let Some(target) = redirect_for(route.screen, self.machine.state()) {
            info!(requested = %route.screen, redirect = %target, "missing prerequisites");
            route = Route::new(target);
        }

        let view = match route.screen {
            Screen::From => Some(View::From(
                FromView::load(self.provider.as_ref(), route.empty_accounts).await,
            )),
            Screen::To => Some(View::To(ToView::load(self.provider.as_ref()).await)),
            screen => self.local_view(screen),
        };

        self.view = match view {
            Some(view) => view,
            None => {
                route = Route::new(Screen::From);
                View::From(FromView::load(self.provider.as_ref(), false).await)
            }
        };
        self.route = route;
    }

    /// Views that need no loading.
    fn local_view(&self, screen: Screen) -> Option<View> {
        let state = self.machine.state();
        match screen {
            Screen::Home => Some(View::Home(HomeView::new())),
            Screen::Amount => {
                let source = state.from_account.as_ref()?;
                let beneficiary = state.to_beneficiary.as_ref()?;
                Some(View::Amount(AmountView::new(
                    source,
                    beneficiary,
                    &state.currency,
                )))
            }
            Screen::Review => Some(View::Review(ReviewView::new(state))),
            Screen::Result => Some(View::Result(ResultView::new(state))),
            Screen::From | Screen::To => None,
        }
    }

    /// What to capture for `target` on the current screen, if anything.
    fn export_source(
        &self,
        target: ExportTarget,
    ) -> Option<(Snapshot, &'static str, &'static str)> {
        match (&self.view, target) {
            (View::Result(view), ExportTarget::Receipt) => {
                Some((view.receipt(), RECEIPT_PREFIX, RECEIPT_BACKGROUND))
            }
            (View::Result(view), ExportTarget::Screen) => {
                Some((view.screen(), SCREEN_PREFIX, SCREEN_BACKGROUND))
            }
            (view, ExportTarget::Screen) if view.allows_screenshot() => Some((
                self.layout_snapshot(),
                LAYOUT_SCREEN_PREFIX,
                SCREEN_BACKGROUND,
            )),
            _ => None,
        }
    }

    fn export(
        &self,
        snapshot: &Snapshot,
        prefix: &str,
        background: &str,
    ) -> Result<PathBuf, ExportError> {
        let options = ExportOptions {
            filename: timestamped_filename(prefix, Local::now().naive_local()),
            scale: self.export_scale,
            background: Some(background.to_string()),
        };
        export_png(snapshot, &options, &self.export_dir).inspect_err(|e| {
            warn!(reason = %e, "image export failed");
        })
    }

    fn layout_snapshot(&self) -> Snapshot {
        let state = self.machine.state();
        let rows = match &self.view {
            View::Home(home) => home.options.len(),
            View::From(view) => view.accounts.items().len().max(1),
            View::To(view) => view.beneficiaries.items().len().max(1),
            View::Amount(_) | View::Review(_) => 4,
            View::Result(_) => 0,
        };
        Snapshot {
            width: Snapshot::WIDTH,
            nav_bar: true,
            badge: None,
            rows: rows as u32,
            buttons: u32::from(state.from_account.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::Listing;
    use crate::transfer::{
        SERVICE_UNAVAILABLE, ScriptedExecutor, TransferOutcome, TransferStatus,
    };
    use std::time::Duration;
    use tempfile::TempDir;

    // test utils

    fn wizard(outcomes: Vec<TransferOutcome>) -> Wizard {
        let provider = FixtureProvider::new().latency(Duration::ZERO, Duration::ZERO);
        let machine = TransferMachine::new(Arc::new(ScriptedExecutor::new(outcomes)));
        Wizard::new(machine, Arc::new(provider))
    }

    async fn send(w: &mut Wizard, actions: Vec<Action>) {
        for action in actions {
            w.dispatch(action).await.unwrap();
        }
    }

    async fn at_review(w: &mut Wizard) {
        send(
            w,
            vec![
                Action::Choose(TransferKind::Inft),
                Action::Select("acc-2".into()),
                Action::Select("ben-1".into()),
                Action::Type("100".into()),
                Action::Next,
            ],
        )
        .await;
        assert_eq!(w.route().screen, Screen::Review);
    }

    #[tokio::test]
    async fn starts_at_home() {
        let w = wizard(vec![]);
        assert_eq!(w.route(), Route::new(Screen::Home));
        assert!(matches!(w.view(), View::Home(_)));
        assert_eq!(w.state(), &TransferState::default());
    }

    #[tokio::test]
    async fn full_happy_path() {
        let mut w = wizard(vec![]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Remark("lunch".into()), Action::Confirm]).await;

        assert_eq!(w.route().screen, Screen::Result);
        assert_eq!(w.state().status, TransferStatus::Success);
        assert_eq!(w.state().remark, "lunch");
        assert!(w.state().ref_no.as_deref().unwrap().starts_with("INFT"));
        let View::Result(view) = w.view() else {
            panic!("expected result view");
        };
        assert!(view.success);
    }

    #[tokio::test]
    async fn failure_then_retry_succeeds() {
        let mut w = wizard(vec![TransferOutcome::service_unavailable()]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm]).await;
        assert_eq!(w.state().status, TransferStatus::Failed);
        assert_eq!(w.state().error_code.as_deref(), Some(SERVICE_UNAVAILABLE));

        send(&mut w, vec![Action::Retry]).await;
        assert_eq!(w.route().screen, Screen::Review);
        send(&mut w, vec![Action::Confirm]).await;
        assert_eq!(w.state().status, TransferStatus::Success);
        assert!(w.state().outcome_fields_consistent());
    }

    #[tokio::test]
    async fn transfer_again_resets() {
        let mut w = wizard(vec![]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm, Action::TransferAgain]).await;
        assert_eq!(w.route().screen, Screen::From);
        assert_eq!(w.state(), &TransferState::default());
    }

    #[tokio::test]
    async fn transfer_again_only_after_success() {
        let mut w = wizard(vec![TransferOutcome::service_unavailable()]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm]).await;
        let err = w.dispatch(Action::TransferAgain).await.unwrap_err();
        assert!(matches!(err, ActionError::Unavailable { .. }));
        assert_eq!(w.state().status, TransferStatus::Failed);
    }

    #[tokio::test]
    async fn deep_links_without_state_bounce_to_from() {
        for path in [
            "/transfer/to",
            "/transfer/amount",
            "/transfer/review",
            "/transfer/result",
        ] {
            let mut w = wizard(vec![]);
            send(&mut w, vec![Action::Open(path.into())]).await;
            assert_eq!(w.route().screen, Screen::From, "{path}");
            assert!(matches!(w.view(), View::From(_)));
        }
    }

    #[tokio::test]
    async fn review_without_beneficiary_bounces_to_from() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-1".into()),
                Action::Open("/transfer/review".into()),
            ],
        )
        .await;
        assert_eq!(w.route().screen, Screen::From);
    }

    #[tokio::test]
    async fn unknown_location_goes_home() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Open("/somewhere/else".into())]).await;
        assert_eq!(w.route().screen, Screen::Home);
    }

    #[tokio::test]
    async fn empty_flag_shows_empty_state() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Open("/transfer/from?from=empty".into())]).await;
        let View::From(view) = w.view() else {
            panic!("expected from view");
        };
        assert_eq!(view.accounts, Listing::Empty);
        assert!(view.empty_demo);
        assert!(matches!(
            w.dispatch(Action::Retry).await,
            Err(ActionError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn failed_list_can_be_retried() {
        let provider = FixtureProvider::with_tables("broken\nrow", "")
            .latency(Duration::ZERO, Duration::ZERO);
        let machine = TransferMachine::new(Arc::new(ScriptedExecutor::default()));
        let mut w = Wizard::new(machine, Arc::new(provider));
        send(&mut w, vec![Action::Open("/transfer/from".into())]).await;

        let View::From(view) = w.view() else {
            panic!("expected from view");
        };
        assert!(view.accounts.is_failed());
        send(&mut w, vec![Action::Retry]).await;
        assert_eq!(w.route().screen, Screen::From);
    }

    #[tokio::test]
    async fn inactive_source_is_refused_and_stays() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Open("/transfer/from".into())]).await;
        let err = w.dispatch(Action::Select("acc-7".into())).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::Selection(SelectionError::AccountInactive(..))
        ));
        assert_eq!(w.route().screen, Screen::From);
        assert!(w.notice().is_some());
        assert!(w.state().from_account.is_none());
    }

    #[tokio::test]
    async fn self_transfer_is_refused() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-1".into()),
            ],
        )
        .await;
        let err = w.dispatch(Action::Select("ben-self".into())).await.unwrap_err();
        assert!(matches!(
            err,
            ActionError::Selection(SelectionError::SameAccount(_))
        ));
        assert_eq!(w.route().screen, Screen::To);
    }

    #[tokio::test]
    async fn over_balance_amount_blocks_next() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-2".into()),
                Action::Select("ben-2".into()),
                Action::Type("9000".into()),
            ],
        )
        .await;
        let err = w.dispatch(Action::Next).await.unwrap_err();
        match err {
            ActionError::Amount { errors, .. } => {
                assert_eq!(errors, vec![AmountError::InsufficientBalance]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(w.route().screen, Screen::Amount);
        assert_eq!(w.state().amount, Amount::ZERO);
    }

    #[tokio::test]
    async fn transfer_all_then_next() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-2".into()),
                Action::Select("ben-2".into()),
                Action::TransferAll,
                Action::Next,
            ],
        )
        .await;
        assert_eq!(w.state().amount, Amount::from_units(8920));
        assert_eq!(w.route().screen, Screen::Review);
    }

    #[tokio::test]
    async fn back_follows_history() {
        let mut w = wizard(vec![]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Back]).await;
        assert_eq!(w.route().screen, Screen::Amount);
        send(&mut w, vec![Action::Back]).await;
        assert_eq!(w.route().screen, Screen::To);
        send(&mut w, vec![Action::Back, Action::Back]).await;
        assert_eq!(w.route().screen, Screen::Home);
        assert!(w.dispatch(Action::Back).await.is_err());
    }

    #[tokio::test]
    async fn changing_source_keeps_beneficiary() {
        let mut w = wizard(vec![]);
        at_review(&mut w).await;
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-4".into()),
            ],
        )
        .await;
        assert_eq!(w.state().from_account.as_ref().unwrap().id, "acc-4");
        assert_eq!(w.state().to_beneficiary.as_ref().unwrap().id, "ben-1");
        assert_eq!(w.state().amount, Amount::from_units(100));
    }

    #[tokio::test]
    async fn standard_transfer_is_coming_soon() {
        let mut w = wizard(vec![]);
        let err = w.dispatch(Action::Choose(TransferKind::Standard)).await.unwrap_err();
        assert!(matches!(err, ActionError::ComingSoon(TransferKind::Standard)));
        assert_eq!(w.route().screen, Screen::Home);
    }

    #[tokio::test]
    async fn exports_receipt_and_screens() {
        let dir = TempDir::new().unwrap();
        let mut w = wizard(vec![]).export_to(dir.path(), 1);

        send(&mut w, vec![Action::Export(ExportTarget::Screen)]).await;
        assert!(w.notice().unwrap().contains("Screen_"));

        at_review(&mut w).await;
        send(
            &mut w,
            vec![Action::Confirm, Action::Export(ExportTarget::Receipt)],
        )
        .await;
        assert!(w.notice().unwrap().contains("INFT_Receipt_"));
        send(&mut w, vec![Action::Export(ExportTarget::Screen)]).await;
        assert!(w.notice().unwrap().contains("INFT_Screen_"));

        let pngs = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "png")
            })
            .count();
        assert!(pngs >= 2);
    }

    #[tokio::test]
    async fn export_failure_leaves_transfer_alone() {
        let dir = TempDir::new().unwrap();
        let mut w = wizard(vec![]).export_to(dir.path().join("missing"), 1);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm]).await;
        let before = w.state().clone();

        let err = w.dispatch(Action::Export(ExportTarget::Receipt)).await.unwrap_err();
        assert!(matches!(err, ActionError::Export(ExportError::Io(_))));
        assert!(w.notice().unwrap().starts_with("export failed"));
        assert_eq!(w.state(), &before);
        assert_eq!(w.route().screen, Screen::Result);
    }

    #[tokio::test]
    async fn receipt_only_on_result() {
        let mut w = wizard(vec![]);
        let err = w.dispatch(Action::Export(ExportTarget::Receipt)).await.unwrap_err();
        assert!(matches!(err, ActionError::Unavailable { action: "export", .. }));
    }

    #[tokio::test]
    async fn back_from_review_after_retry_edits_amount() {
        let mut w = wizard(vec![TransferOutcome::service_unavailable()]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm, Action::Retry, Action::Back]).await;
        assert_eq!(w.route().screen, Screen::Amount);
        let View::Amount(view) = w.view() else {
            panic!("expected amount view");
        };
        assert!(view.input.is_empty());
    }

    #[tokio::test]
    async fn result_before_submission_bounces_to_from() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-1".into()),
                Action::Open("/transfer/result".into()),
            ],
        )
        .await;
        assert_eq!(w.state().status, TransferStatus::Idle);
        assert_eq!(w.route().screen, Screen::From);
        assert!(matches!(w.view(), View::From(_)));

        send(
            &mut w,
            vec![
                Action::Select("acc-2".into()),
                Action::Select("ben-1".into()),
                Action::Type("100".into()),
                Action::Next,
                Action::Open("/transfer/result".into()),
            ],
        )
        .await;
        assert!(w.state().is_ready_for_review());
        assert_eq!(w.route().screen, Screen::From);
    }

    #[tokio::test]
    async fn second_confirm_does_not_resubmit() {
        let mut w = wizard(vec![TransferOutcome::service_unavailable()]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm]).await;
        let err = w.dispatch(Action::Confirm).await.unwrap_err();
        assert!(matches!(err, ActionError::Unavailable { action: "confirm", .. }));
        assert_eq!(w.state().status, TransferStatus::Failed);
    }

    #[tokio::test]
    async fn history_stays_bounded() {
        let mut w = wizard(vec![]);
        for _ in 0..50 {
            send(
                &mut w,
                vec![
                    Action::Open("/transfer/from".into()),
                    Action::Open("/transfer/review".into()),
                    Action::Open("/transfer".into()),
                ],
            )
            .await;
        }
        assert!(w.history.len() <= 5, "{:?}", w.history);
        assert_eq!(w.route().screen, Screen::Home);
        assert!(w.history.is_empty());
    }

    #[tokio::test]
    async fn back_after_transfer_again_goes_home() {
        let mut w = wizard(vec![]);
        at_review(&mut w).await;
        send(&mut w, vec![Action::Confirm, Action::TransferAgain, Action::Back]).await;
        assert_eq!(w.route().screen, Screen::Home);
    }

    #[tokio::test]
    async fn run_processes_stream_and_skips_refusals() {
        let mut w = wizard(vec![]);
        let actions = vec![
            Action::Next,
            Action::Choose(TransferKind::Inft),
            Action::Select("acc-8".into()),
            Action::Select("acc-1".into()),
        ];
        let mut seen = 0;
        w.run(tokio_stream::iter(actions), |_| seen += 1).await;
        assert_eq!(seen, 4);
        assert_eq!(w.route().screen, Screen::To);
    }
}
