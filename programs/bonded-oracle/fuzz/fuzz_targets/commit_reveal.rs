//! Fuzz target for submit_commitment and reveal_answer
//!
//! Tests:
//! - the reveal window is the hint (or default) capped at step_delay / 8
//! - a sealed answer hides its value until revealed
//! - reveals fail in order: finalized, deadline passed, hash mismatch
//! - a reveal only moves the best answer while its commitment is on top
//!
//! Run with: cargo test --release -p bonded-oracle-fuzz commit_reveal

use crate::*;
use bonded_oracle::state::EMPTY_ANSWER;
use bonded_oracle::utils::hashing;
use proptest::prelude::*;

const COMMIT_AT: i64 = 10;
const OUTBID_ANSWER: [u8; 32] = [0x11; 32];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_commit_reveal(input in any::<CommitRevealInput>()) {
        let mut oracle = SimulatedOracle::new(1_000, input.step_delay, 1);
        let committed = oracle.commit(
            participant(0),
            input.answer,
            input.nonce,
            input.bond,
            input.reveal_window_hint,
            COMMIT_AT,
        );
        prop_assert!(committed.is_success(),
            "commit rejected: {:?}\nInput: {:?}", committed, input);
        prop_assert_eq!(oracle.question.best_answer(), EMPTY_ANSWER);

        let deadline = oracle.commitments[0].reveal_deadline;
        let window = deadline - COMMIT_AT;
        let cap = i64::from((input.step_delay / 8).max(1));
        prop_assert!(window >= 1 && window <= cap, "window {} outside 1..={}", window, cap);

        if input.outbid_before_reveal {
            let bond = oracle.next_bond();
            let outbid = oracle.answer(participant(1), OUTBID_ANSWER, bond, COMMIT_AT);
            prop_assert!(outbid.is_success());
        }
        let finalization_ts = oracle.question.finalization_ts;

        let now = COMMIT_AT + i64::from(input.reveal_delay);
        let result = oracle.reveal(0, input.revealed_answer, input.revealed_nonce, now);
        prop_assert!(!result.is_invariant_violation(), "{:?}", result);

        let matches = input.revealed_answer == input.answer && input.revealed_nonce == input.nonce;
        if now >= finalization_ts {
            prop_assert!(result.is_error_named("AlreadyFinalized"), "{:?}", result);
        } else if now >= deadline {
            prop_assert!(result.is_error_named("DeadlineExpired"), "{:?}", result);
        } else if !matches {
            prop_assert!(result.is_error_named("HashMismatch"), "{:?}", result);
        } else {
            prop_assert!(result.is_success(), "{:?}", result);
            prop_assert!(oracle.commitments[0].is_revealed);
            prop_assert_eq!(oracle.commitments[0].effective_answer(), input.answer);

            if input.outbid_before_reveal {
                prop_assert_eq!(oracle.question.best_answer(), OUTBID_ANSWER);
                prop_assert_eq!(oracle.question.finalization_ts, finalization_ts);
            } else {
                prop_assert_eq!(oracle.question.best_answer(), input.answer);
                prop_assert_eq!(oracle.question.finalization_ts, now + i64::from(input.step_delay));
            }

            let again = oracle.reveal(0, input.answer, input.nonce, now);
            prop_assert!(again.is_error_named("AlreadyRevealed"), "{:?}", again);
        }

        if !result.is_success() {
            prop_assert!(!oracle.commitments[0].is_revealed);
        }
    }

    /// The reveal must repeat the committed bond
    #[test]
    fn fuzz_commitment_id_binds_bond(bond in 1u64..1_000_000, other in 1u64..1_000_000) {
        prop_assume!(bond != other);
        let answer_hash = hashing::answer_hash(&[3u8; 32], 7);
        prop_assert_ne!(
            hashing::commitment_id(&QUESTION_ID, &answer_hash, bond),
            hashing::commitment_id(&QUESTION_ID, &answer_hash, other)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_applies_without_hint() {
        let mut oracle = SimulatedOracle::new(0, 86_400, 1);
        assert!(oracle.commit(participant(0), [1u8; 32], 5, 1, 0, COMMIT_AT).is_success());
        assert_eq!(
            oracle.commitments[0].reveal_deadline,
            COMMIT_AT + i64::from(DEFAULT_REVEAL_WINDOW)
        );
    }

    #[test]
    fn test_reveal_during_arbitration_keeps_clock_stopped() {
        let mut oracle = SimulatedOracle::new(0, 800, 1);
        assert!(oracle.commit(participant(0), [1u8; 32], 5, 1, 0, COMMIT_AT).is_success());
        assert!(oracle.request_arbitration(COMMIT_AT + 1).is_success());

        assert!(oracle.reveal(0, [1u8; 32], 5, COMMIT_AT + 2).is_success());
        assert_eq!(oracle.question.best_answer(), [1u8; 32]);
        assert_eq!(oracle.question.finalization_ts, 0);
        assert!(oracle.question.is_pending_arbitration);
    }
}
