//! Plain-text rendering of the current screen.

use std::fmt::Write;

use crate::Amount;
use crate::amount::Fraction;
use crate::model::INFT_FEE;
use crate::screens::{
    AmountView, FromView, HomeView, Listing, ResultView, ReviewView, ToView, View,
};
use crate::transfer::TransferState;
use crate::validation::AmountError;
use crate::wizard::Wizard;

/// The current screen as text, ending with a blank line.
pub fn render(wizard: &Wizard) -> String {
    let view = wizard.view();
    let state = wizard.state();
    let mut out = String::new();

    let back = if view.shows_back() { "‹ " } else { "" };
    let shot = if view.allows_screenshot() { "  [screenshot]" } else { "" };
    let _ = writeln!(out, "== {back}{}{shot} ({})", view.title(), wizard.route());

    match view {
        View::Home(home) => home_lines(&mut out, home),
        View::From(from) => from_lines(&mut out, from, state),
        View::To(to) => to_lines(&mut out, to, state),
        View::Amount(amount) => amount_lines(&mut out, amount),
        View::Review(review) => review_lines(&mut out, review, state),
        View::Result(result) => result_lines(&mut out, result, state),
    }

    if let Some(notice) = wizard.notice() {
        let _ = writeln!(out, "! {notice}");
    }
    out.push('\n');
    out
}

/// Inline message for an amount error, in the transfer currency.
pub fn amount_error_message(error: &AmountError, currency: &str) -> String {
    match error {
        AmountError::BelowMinimum(min) => {
            format!("Minimum {} {currency}", min.grouped(Fraction::Trimmed))
        }
        AmountError::ExceedsMaximum(max) => {
            format!("Maximum {} {currency}", max.grouped(Fraction::Trimmed))
        }
        other => other.to_string(),
    }
}

fn home_lines(out: &mut String, home: &HomeView) {
    for option in &home.options {
        let badge = if option.available { "" } else { "  (coming soon)" };
        let _ = writeln!(out, "  {} · {}{badge}", option.title, option.detail);
    }
}

fn listing_status<T>(out: &mut String, listing: &Listing<T>, empty: &str) {
    match listing {
        Listing::Failed(message) => {
            let _ = writeln!(out, "  {message}");
            let _ = writeln!(out, "  [Retry]");
        }
        Listing::Empty => {
            let _ = writeln!(out, "  {empty}");
        }
        Listing::Ready(_) => {}
    }
}

fn from_lines(out: &mut String, from: &FromView, state: &TransferState) {
    listing_status(out, &from.accounts, "No accounts");
    for row in from.rows(state.from_account.as_ref()) {
        let account = row.account;
        let marker = match (row.selected, row.selectable) {
            (true, _) => "✓",
            (false, true) => "›",
            (false, false) => " ",
        };
        let note = row.note.map(|n| format!("  [{n}]")).unwrap_or_default();
        let _ = writeln!(
            out,
            "{marker} {} {}  {}{note}",
            account.name,
            account.number,
            account.balance.with_currency(&account.currency),
        );
    }
}

fn to_lines(out: &mut String, to: &ToView, state: &TransferState) {
    listing_status(out, &to.beneficiaries, "No beneficiaries");
    let Some(source) = state.from_account.as_ref() else {
        return;
    };
    for row in to.rows(source, state.to_beneficiary.as_ref()) {
        let beneficiary = row.beneficiary;
        let marker = match (row.selected, row.same_account) {
            (true, _) => "✓",
            (false, false) => "›",
            (false, true) => " ",
        };
        let mut tags = String::new();
        if beneficiary.verified {
            tags.push_str("  [Verified]");
        }
        if row.same_account {
            tags.push_str("  [Cannot transfer to self]");
        }
        let _ = writeln!(
            out,
            "{marker} {} · {} {}{tags}",
            beneficiary.name, beneficiary.bank_name, beneficiary.account_number,
        );
    }
}

fn amount_lines(out: &mut String, view: &AmountView) {
    let currency = &view.currency;
    let _ = writeln!(out, "  To {} · {}", view.recipient, view.recipient_bank);
    let _ = writeln!(out, "  Amount: {} {currency}", view.input);
    for error in view.visible_errors() {
        let _ = writeln!(out, "  x {}", amount_error_message(&error, currency));
    }
    let _ = writeln!(
        out,
        "  Available balance: {}",
        view.limits.balance.with_currency(currency)
    );
    let _ = writeln!(
        out,
        "  Daily limit remaining: {}",
        view.limits
            .daily_remaining
            .max(Amount::ZERO)
            .with_currency(currency)
    );
    let _ = writeln!(
        out,
        "  Fee: {} (INFT free)",
        INFT_FEE.grouped(Fraction::Trimmed)
    );
    let next = if view.can_proceed() { "[Next]" } else { "[Next] (disabled)" };
    let _ = writeln!(out, "  {next}");
}

fn review_lines(out: &mut String, view: &ReviewView, state: &TransferState) {
    let currency = &state.currency;
    if let Some(account) = &state.from_account {
        let _ = writeln!(out, "  From: {} {}", account.name, account.number);
    }
    if let Some(beneficiary) = &state.to_beneficiary {
        let _ = writeln!(
            out,
            "  To: {} · {} {}",
            beneficiary.name, beneficiary.bank_name, beneficiary.account_number
        );
    }
    let _ = writeln!(out, "  Amount: {}", state.amount.with_currency(currency));
    let _ = writeln!(out, "  Fee: {}", state.fee.with_currency(currency));
    let _ = writeln!(out, "  Remark: {}", view.remark);
    let _ = writeln!(out, "  [Confirm]");
}

fn result_lines(out: &mut String, view: &ResultView, state: &TransferState) {
    if view.success {
        let _ = writeln!(out, "  Transfer successful");
        let _ = writeln!(
            out,
            "  Amount: {}",
            state.amount.with_currency(&state.currency)
        );
        if let Some(beneficiary) = &state.to_beneficiary {
            let _ = writeln!(out, "  To: {}", beneficiary.name);
        }
        if let Some(ref_no) = &state.ref_no {
            let _ = writeln!(out, "  Reference: {ref_no}");
        }
        let _ = writeln!(out, "  Completed: {}", view.completed);
        let _ = writeln!(out, "  [Transfer again] [Back to transfer]");
    } else {
        let _ = writeln!(out, "  Transfer failed");
        if let Some(message) = &state.error_message {
            let _ = writeln!(out, "  {message}");
        }
        let _ = writeln!(out, "  [Retry] [Back to transfer]");
    }
    let _ = writeln!(out, "  [Save receipt] [Save screen]");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MAX_AMOUNT, MIN_AMOUNT};
    use crate::provider::FixtureProvider;
    use crate::screens::TransferKind;
    use crate::transfer::{ScriptedExecutor, TransferMachine, TransferOutcome};
    use crate::wizard::Action;
    use std::sync::Arc;
    use std::time::Duration;

    fn wizard(outcomes: Vec<TransferOutcome>) -> Wizard {
        let provider = FixtureProvider::new().latency(Duration::ZERO, Duration::ZERO);
        let machine = TransferMachine::new(Arc::new(ScriptedExecutor::new(outcomes)));
        Wizard::new(machine, Arc::new(provider))
    }

    async fn send(w: &mut Wizard, actions: Vec<Action>) {
        for action in actions {
            let _ = w.dispatch(action).await;
        }
    }

    #[test]
    fn bound_messages_carry_currency() {
        assert_eq!(
            amount_error_message(&AmountError::BelowMinimum(MIN_AMOUNT), "CNY"),
            "Minimum 1 CNY"
        );
        assert_eq!(
            amount_error_message(&AmountError::ExceedsMaximum(MAX_AMOUNT), "CNY"),
            "Maximum 50,000 CNY"
        );
        assert_eq!(
            amount_error_message(&AmountError::InsufficientBalance, "CNY"),
            "Insufficient balance"
        );
    }

    #[tokio::test]
    async fn home_lists_both_kinds() {
        let text = render(&wizard(vec![]));
        assert!(text.starts_with("== Transfer"));
        assert!(text.contains("INFT · No fee · Real-time"));
        assert!(text.contains("Standard transfer · 1–3 business days  (coming soon)"));
    }

    #[tokio::test]
    async fn from_screen_marks_inactive_accounts() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Choose(TransferKind::Inft)]).await;
        let text = render(&w);
        assert!(text.contains("== ‹ From Account"));
        assert!(text.contains("[Frozen]"));
        assert!(text.contains("[Suspended]"));
        assert!(text.contains("CN¥8,920.00"));
    }

    #[tokio::test]
    async fn empty_demo_renders_empty_state() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Open("/transfer/from?from=empty".into())]).await;
        assert!(render(&w).contains("No accounts"));
    }

    #[tokio::test]
    async fn amount_screen_shows_errors_once_touched() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-2".into()),
                Action::Select("ben-2".into()),
            ],
        )
        .await;
        let text = render(&w);
        assert!(text.contains("Fee: 0 (INFT free)"));
        assert!(!text.contains("Insufficient balance"));

        send(&mut w, vec![Action::Type("9000".into())]).await;
        let text = render(&w);
        assert!(text.contains("x Insufficient balance"));
        assert!(text.contains("[Next] (disabled)"));
    }

    #[tokio::test]
    async fn self_beneficiary_is_tagged() {
        let mut w = wizard(vec![]);
        send(
            &mut w,
            vec![
                Action::Open("/transfer/from".into()),
                Action::Select("acc-1".into()),
            ],
        )
        .await;
        assert!(render(&w).contains("[Cannot transfer to self]"));
    }

    #[tokio::test]
    async fn result_screens() {
        let mut w = wizard(vec![TransferOutcome::service_unavailable()]);
        send(
            &mut w,
            vec![
                Action::Choose(TransferKind::Inft),
                Action::Select("acc-2".into()),
                Action::Select("ben-1".into()),
                Action::Type("100".into()),
                Action::Next,
                Action::Confirm,
            ],
        )
        .await;
        let text = render(&w);
        assert!(text.contains("Transfer failed"));
        assert!(text.contains("temporarily unavailable"));

        send(&mut w, vec![Action::Retry, Action::Confirm]).await;
        let text = render(&w);
        assert!(text.contains("Transfer successful"));
        assert!(text.contains("Reference: INFT"));
        assert!(text.contains(&Amount::from_units(100).with_currency("CNY")));
    }

    #[tokio::test]
    async fn refusals_show_as_notice() {
        let mut w = wizard(vec![]);
        send(&mut w, vec![Action::Choose(TransferKind::Standard)]).await;
        assert!(render(&w).contains("! Standard transfers are coming soon"));
    }
}
