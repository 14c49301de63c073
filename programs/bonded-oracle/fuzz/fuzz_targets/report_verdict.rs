//! Fuzz target for request_arbitration and report_verdict
//!
//! Tests:
//! - a verdict only lands on the real history tip; any falsified field of
//!   the restated tip is rejected without touching the question
//! - an accepted verdict appends a zero-bond entry and finalizes at once
//! - an unrevealed tip commitment blocks the verdict until its window closes
//! - only the arbitrator or its proxy passes the signer check
//!
//! Run with: cargo test --release -p bonded-oracle-fuzz report_verdict

use crate::*;
use anchor_lang::prelude::Pubkey;
use bonded_oracle::instructions::arbitration_helpers::authorize_arbitrator;
use bonded_oracle::state::{ArbitratorProfile, EntryKind};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_forged_tip(
        victim_bond in 1u64..1_000_000_000,
        forgery in arb_forgery(),
        verdict in arb_answer(),
    ) {
        let result = simulate_forged_tip(victim_bond, forgery, verdict);
        prop_assert!(result.is_success(), "{:?}", result);
    }

    #[test]
    fn fuzz_verdict_after_auction(input in any::<AuctionInput>(), verdict in arb_answer()) {
        let auction =
            simulate_auction(input.bounty, input.step_delay, &input.bids, Some(verdict));
        let (oracle, final_at) = match auction {
            Ok(done) => done,
            Err(result) => {
                prop_assert!(!result.is_invariant_violation(), "{:?}\nInput: {:?}", result, input);
                return Ok(());
            }
        };

        let last = oracle.entries.last().copied();
        prop_assert_eq!(last.map(|e| e.kind), Some(EntryKind::Verdict));
        prop_assert_eq!(last.map(|e| e.bond), Some(0));
        prop_assert_eq!(last.map(|e| e.answerer), Some(ARBITRATOR));

        let bonded = &oracle.entries[oracle.entries.len() - 2];
        prop_assert_eq!(oracle.question.bond, bonded.bond);
        prop_assert_eq!(oracle.question.best_answer(), verdict);
        prop_assert_eq!(oracle.question.finalization_ts, final_at);
        prop_assert_eq!(check_kind_binding(&oracle.entries), ChainInvariantResult::Valid);
    }

    #[test]
    fn fuzz_verdict_waits_for_reveal(step_delay in arb_step_delay(), hint in 0u32..20_000) {
        let mut oracle = SimulatedOracle::new(100, step_delay, 1);
        prop_assert!(oracle.answer(participant(0), [1u8; 32], 1, 10).is_success());
        prop_assert!(oracle.commit(participant(1), [2u8; 32], 3, 2, hint, 10).is_success());
        prop_assert!(oracle.request_arbitration(10).is_success());

        let deadline = oracle.commitments[0].reveal_deadline;
        let early = oracle.report_verdict([1u8; 32], deadline - 1);
        prop_assert!(early.is_error_named("RevealWindowOpen"), "{:?}", early);
        prop_assert!(oracle.question.is_pending_arbitration);

        let on_time = oracle.report_verdict([1u8; 32], deadline);
        prop_assert!(on_time.is_success(), "{:?}", on_time);
        prop_assert!(oracle.question.is_finalized(deadline));
    }

    #[test]
    fn fuzz_arbitrator_authorization(signer in arb_id(), proxy in proptest::option::of(arb_id())) {
        let oracle = SimulatedOracle::new(0, 120, 1);
        let signer = Pubkey::new_from_array(signer);
        let profile = ArbitratorProfile {
            arbitrator: ARBITRATOR,
            proxy: proxy.map(Pubkey::new_from_array),
            ..Default::default()
        };

        let allowed = signer == ARBITRATOR || profile.proxy == Some(signer);
        let result = authorize_arbitrator(&oracle.question, Some(&profile), &signer);
        prop_assert_eq!(result.is_ok(), allowed);

        // a profile owned by the signer itself grants nothing
        let own = ArbitratorProfile {
            arbitrator: signer,
            proxy: Some(signer),
            ..Default::default()
        };
        let result = authorize_arbitrator(&oracle.question, Some(&own), &signer);
        prop_assert_eq!(result.is_ok(), signer == ARBITRATOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_answer_rejected() {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        assert!(oracle.request_arbitration(10).is_error_named("NoAnswer"));
    }

    #[test]
    fn test_verdict_without_request_rejected() {
        let mut oracle = SimulatedOracle::new(0, 120, 1);
        assert!(oracle.answer(participant(0), [1u8; 32], 1, 10).is_success());
        let result = oracle.report_verdict([1u8; 32], 11);
        assert!(result.is_error_named("NotPendingArbitration"), "{result:?}");
    }
}
