use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use inft_transfer::command::parse_script;
use inft_transfer::provider::{FixtureProvider, parse_accounts};
use inft_transfer::transfer::{ScriptedExecutor, TransferMachine};
use inft_transfer::validation::AmountLimits;
use inft_transfer::{Amount, Wizard};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const ACCOUNTS: &str = include_str!("../src/fixtures/accounts.csv");

const SCRIPT: &str = "inft\nselect acc-2\nselect ben-1\ntype 1,000.5\nnext\n\
                      remark rent\nconfirm\nagain\n";

/// Amounts typed one keystroke at a time, e.g. `1`, `12`, `12.`, `12.3`.
fn keystrokes(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let typed = format!("{}.{:02}", i * 37 % 120_000, i % 100);
            let cut = 1 + i % typed.len();
            typed[..cut].to_string()
        })
        .collect()
}

fn bench_amount_checks(c: &mut Criterion) {
    let accounts = parse_accounts(ACCOUNTS).unwrap();
    let mut group = c.benchmark_group("amount_checks");

    for count in [1_000usize, 10_000, 100_000] {
        let inputs = keystrokes(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &inputs, |b, inputs| {
            b.iter(|| {
                let mut accepted = 0usize;
                for (account, input) in accounts.iter().cycle().zip(inputs) {
                    let limits = AmountLimits::for_account(account);
                    let amount = Amount::parse_input(input);
                    black_box(limits.check(amount));
                    accepted += usize::from(limits.can_proceed(amount));
                }
                accepted
            });
        });
    }

    group.finish();
}

fn bench_wizard_runs(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("wizard");

    for transfers in [1usize, 10, 100] {
        let script = SCRIPT.repeat(transfers);
        group.bench_with_input(
            BenchmarkId::from_parameter(transfers),
            &script,
            |b, script| {
                let script: &str = script;
                b.to_async(&runtime).iter(|| async move {
                    let provider = FixtureProvider::new().latency(Duration::ZERO, Duration::ZERO);
                    let machine = TransferMachine::new(Arc::new(ScriptedExecutor::default()));
                    let mut wizard = Wizard::new(machine, Arc::new(provider));
                    let actions = parse_script(script).filter_map(Result::ok);
                    wizard.run(tokio_stream::iter(actions), |_| {}).await;
                    black_box(wizard.state().status)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_amount_checks, bench_wizard_runs);
criterion_main!(benches);
