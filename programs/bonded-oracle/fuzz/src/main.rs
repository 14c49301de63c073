//! Fuzz test runner for the bonded oracle
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)

use bonded_oracle_fuzz::*;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use std::time::Instant;

fn main() {
    println!("=== Bonded Oracle Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running auction and claim fuzz tests...");
    let (p, f) = run_auction_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running forged tip fuzz tests...");
    let (p, f) = run_forged_tip_fuzz(100);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn generate<S: Strategy>(
    strategy: S,
    runner: &mut proptest::test_runner::TestRunner,
) -> Option<S::Value> {
    strategy.new_tree(runner).ok().map(|tree| tree.current())
}

fn run_auction_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let Some(input) = generate(any::<AuctionInput>(), &mut runner) else {
            continue;
        };

        let result = match simulate_auction(
            input.bounty,
            input.step_delay,
            &input.bids,
            input.verdict,
        ) {
            Ok((mut oracle, final_at)) => oracle.claim(input.chunk_size, final_at),
            Err(result) => result,
        };

        if result.is_invariant_violation() {
            println!("  [FAIL] Iteration {}: {:?}", i, result);
            failed += 1;
        } else {
            passed += 1;
        }
    }

    println!("  auction: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_forged_tip_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = (1u64..1_000_000_000u64, arb_forgery(), arb_answer());

    for i in 0..iterations {
        let Some((victim_bond, forgery, verdict)) = generate(&strategy, &mut runner) else {
            continue;
        };

        let result = simulate_forged_tip(victim_bond, forgery, verdict);
        if result.is_success() {
            passed += 1;
        } else {
            println!("  [FAIL] Iteration {}: {:?}", i, result);
            failed += 1;
        }
    }

    println!("  forged_tip: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_edge_case_tests() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut record = |name: &str, ok: bool| {
        if ok {
            passed += 1;
        } else {
            println!("  [FAIL] {}", name);
            failed += 1;
        }
    };

    // Bond doubling overflow
    {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        oracle.question.bond = u64::MAX / 2 + 1;
        let result = oracle.answer(participant(0), [1u8; 32], u64::MAX, 10);
        record("bond overflow", result.is_error_named("ArithmeticOverflow"));
    }

    // Zero bounty still settles
    {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        let answered = oracle.answer(participant(0), [1u8; 32], 1, 10);
        let claimed = oracle.claim(1, 130);
        record(
            "zero bounty",
            answered.is_success() && claimed.is_success() && oracle.paid_to(&participant(0)) == 1,
        );
    }

    // Verdict nobody agreed with goes to the arbitrator
    {
        let mut oracle = SimulatedOracle::new(1_000, 120, 1);
        let ok = oracle.answer(participant(0), [1u8; 32], 1, 10).is_success()
            && oracle.answer(participant(1), [2u8; 32], 2, 11).is_success()
            && oracle.request_arbitration(12).is_success()
            && oracle.report_verdict([3u8; 32], 13).is_success()
            && oracle.claim(8, 13).is_success();
        record(
            "unanimous loss",
            ok && oracle.paid_to(&ARBITRATOR) == 1_003,
        );
    }

    // Smallest step delay keeps a one-second reveal window
    {
        let mut oracle = SimulatedOracle::new(0, 1, 1);
        let committed = oracle.commit(participant(0), [1u8; 32], 5, 1, 0, 10);
        let deadline = oracle.commitments.first().map(|c| c.reveal_deadline);
        record("minimal reveal window", committed.is_success() && deadline == Some(11));
    }

    println!("  edge_cases: {} passed, {} failed", passed, failed);
    (passed, failed)
}
