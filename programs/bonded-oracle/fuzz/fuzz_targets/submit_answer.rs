//! Fuzz target for submit_answer
//!
//! Tests:
//! - an answer is accepted exactly when the question is open, the caller's
//!   view of the bond is current and the bond at least doubles it
//! - accepted answers extend the history chain and never lower the bond
//! - rejected answers leave the question untouched
//!
//! Run with: cargo test --release -p bonded-oracle-fuzz submit_answer

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_submit_answer(input in any::<SubmitAnswerInput>()) {
        let mut oracle = SimulatedOracle::new(1_000, 120, input.min_bond);
        oracle.question.opening_ts = input.opening_ts;
        oracle.question.bond = input.current_bond;

        let who = participant(0);
        let result = oracle.answer_seen(
            who,
            input.answer,
            input.max_previous_bond,
            input.bond,
            input.now,
        );

        prop_assert!(!result.is_invariant_violation(),
            "Invariant violation: {:?}\nInput: {:?}", result, input);

        let required = input
            .current_bond
            .checked_mul(2)
            .map(|doubled| doubled.max(input.min_bond.max(1)));
        let should_accept = input.now >= input.opening_ts
            && input.max_previous_bond == input.current_bond
            && required.is_some_and(|r| input.bond >= r);

        prop_assert_eq!(result.is_success(), should_accept,
            "acceptance mismatch: {:?}\nInput: {:?}", result, input);

        if result.is_success() {
            prop_assert_eq!(oracle.question.bond, input.bond);
            prop_assert_eq!(oracle.question.best_answer(), input.answer);
            prop_assert_eq!(oracle.question.finalization_ts, input.now + 120);
        }
    }

    /// A run of minimum raises doubles the bond every time
    #[test]
    fn fuzz_bond_doubling(
        answers in prop::collection::vec(arb_answer(), 1..30),
        min_bond in 1u64..1_000u64,
    ) {
        let mut oracle = SimulatedOracle::new(0, 120, min_bond);
        let mut expected = min_bond;

        for (i, answer) in answers.iter().enumerate() {
            let now = 10 + i as i64;
            let bond = oracle.next_bond();
            prop_assert_eq!(bond, expected);

            let result = oracle.answer(participant(i as u8 % 6), *answer, bond, now);
            prop_assert!(result.is_success(), "answer {} rejected: {:?}", i, result);
            expected = bond * 2;
        }

        prop_assert_eq!(check_history_chain(&oracle.question, &oracle.entries),
            ChainInvariantResult::Valid);
        prop_assert_eq!(check_kind_binding(&oracle.entries), ChainInvariantResult::Valid);
    }

    /// Once the step delay passes with no new answer, nothing more is accepted
    #[test]
    fn fuzz_answer_after_finality(step_delay in arb_step_delay(), late_by in 0i64..10_000) {
        let mut oracle = SimulatedOracle::new(0, step_delay, 1);
        prop_assert!(oracle.answer(participant(0), [1u8; 32], 1, 100).is_success());

        let now = 100 + i64::from(step_delay) + late_by;
        let result = oracle.answer(participant(1), [2u8; 32], 2, now);
        prop_assert!(result.is_error_named("NotOpen"), "{:?}", result);
        prop_assert_eq!(oracle.question.bond, 1);
    }

    /// A lagging view of the bond is rejected even when the new bond is large enough
    #[test]
    fn fuzz_stale_view_rejected(bond in 1u64..1_000_000, stale in 0u64..1_000_000) {
        prop_assume!(stale != bond);
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        prop_assert!(oracle.answer(participant(0), [1u8; 32], bond, 10).is_success());

        let result = oracle.answer_seen(participant(1), [2u8; 32], stale, bond * 4, 11);
        prop_assert!(result.is_error_named("StaleBond"), "{:?}", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_before_opening_rejected() {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        oracle.question.opening_ts = 50;
        assert!(oracle.answer(participant(0), [1u8; 32], 1, 49).is_error_named("NotOpen"));
        assert!(oracle.answer(participant(0), [1u8; 32], 1, 50).is_success());
    }

    #[test]
    fn test_overflowing_bond_rejected() {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        oracle.question.bond = u64::MAX / 2 + 1;
        let result = oracle.answer(participant(0), [1u8; 32], u64::MAX, 10);
        assert!(result.is_error_named("ArithmeticOverflow"), "{result:?}");
    }
}
