//! Fuzz target for claim_winnings
//!
//! Tests:
//! - a full replay pays out exactly the bounty plus every bond, only to
//!   submitters that appear in the history
//! - chunked and single-shot replays credit every payee the same amount
//! - a settled question cannot be claimed again
//! - a tampered chain is rejected and leaves the claim progress untouched
//!
//! Run with: cargo test --release -p bonded-oracle-fuzz claim_winnings

use crate::*;
use anchor_lang::prelude::Pubkey;
use bonded_oracle::instructions::constants::MAX_CLAIM_ENTRIES;
use bonded_oracle::instructions::settlement_helpers::{settle_chunk, HistoryChunk};
use proptest::prelude::*;

/// Tampered field of a replayed entry
#[derive(Debug, Clone, Copy)]
enum Tamper {
    Address,
    Bond,
    Answer,
    Hash,
}

fn arb_tamper() -> impl Strategy<Value = Tamper> {
    prop_oneof![
        Just(Tamper::Address),
        Just(Tamper::Bond),
        Just(Tamper::Answer),
        Just(Tamper::Hash),
    ]
}

fn auction(input: &AuctionInput) -> Option<(SimulatedOracle, i64)> {
    simulate_auction(input.bounty, input.step_delay, &input.bids, input.verdict).ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_claim_conservation(input in any::<AuctionInput>()) {
        let auction = simulate_auction(input.bounty, input.step_delay, &input.bids, input.verdict);
        let (mut oracle, final_at) = match auction {
            Ok(done) => done,
            Err(result) => {
                prop_assert!(!result.is_invariant_violation(), "{:?}\nInput: {:?}", result, input);
                return Ok(());
            }
        };

        let result = oracle.claim(input.chunk_size, final_at);
        prop_assert!(result.is_success(), "{:?}\nInput: {:?}", result, input);
        prop_assert!(oracle.question.claim.settled);

        let again = oracle.claim(input.chunk_size, final_at);
        prop_assert!(again.is_error_named("AlreadyClaimed"), "{:?}", again);
    }

    #[test]
    fn fuzz_chunked_matches_single(input in any::<AuctionInput>()) {
        let Some((oracle, final_at)) = auction(&input) else {
            return Ok(());
        };

        let mut chunked = oracle.clone();
        let mut single = oracle;
        prop_assert!(chunked.claim(input.chunk_size, final_at).is_success());
        prop_assert!(single.claim(MAX_CLAIM_ENTRIES, final_at).is_success());

        let mut payees: Vec<Pubkey> = single.entries.iter().map(|e| e.answerer).collect();
        payees.sort();
        payees.dedup();
        for payee in payees {
            prop_assert_eq!(chunked.paid_to(&payee), single.paid_to(&payee),
                "payee {} differs\nInput: {:?}", payee, input);
        }
    }

    /// Without a verdict the newest bidder holds the final answer and takes the bounty
    #[test]
    fn fuzz_unchallenged_tip_takes_bounty(mut input in any::<AuctionInput>()) {
        input.verdict = None;
        let Some((mut oracle, final_at)) = auction(&input) else {
            return Ok(());
        };
        let tip = oracle.entries.last().map(|e| (e.answerer, e.bond));
        prop_assert!(oracle.claim(input.chunk_size, final_at).is_success());

        if let Some((who, bond)) = tip {
            prop_assert!(oracle.paid_to(&who) >= input.bounty + bond);
        }
    }

    #[test]
    fn fuzz_tampered_chain_rejected(
        input in any::<AuctionInput>(),
        tamper in arb_tamper(),
        pick in any::<prop::sample::Index>(),
    ) {
        let Some((oracle, final_at)) = auction(&input) else {
            return Ok(());
        };
        let mut question = oracle.question.clone();

        let mut hashes: Vec<[u8; 32]> = oracle.entries.iter().rev().map(|e| e.after).collect();
        let mut addresses: Vec<Pubkey> = oracle.entries.iter().rev().map(|e| e.answerer).collect();
        let mut bonds: Vec<u64> = oracle.entries.iter().rev().map(|e| e.bond).collect();
        let mut ids: Vec<[u8; 32]> = oracle.entries.iter().rev().map(|e| e.id).collect();
        prop_assume!(hashes.len() <= MAX_CLAIM_ENTRIES);

        let i = pick.index(hashes.len());
        match tamper {
            Tamper::Address => addresses[i] = participant(200),
            Tamper::Bond => bonds[i] = bonds[i].wrapping_add(1),
            Tamper::Answer => ids[i][0] ^= 0xFF,
            Tamper::Hash => hashes[i][0] ^= 0xFF,
        }

        let chunk = HistoryChunk {
            hash_chain: &hashes,
            address_chain: &addresses,
            bond_chain: &bonds,
            answer_chain: &ids,
        };
        let result = settle_chunk(&mut question, &chunk, &oracle.commitments, final_at);
        prop_assert!(result.is_err(), "tampered {:?} at {} accepted", tamper, i);
        prop_assert_eq!(&question.claim, &oracle.question.claim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_before_finality_rejected() {
        let mut oracle = SimulatedOracle::new(100, 120, 1);
        assert!(oracle.answer(participant(0), [1u8; 32], 1, 10).is_success());
        assert!(oracle.claim(4, 129).is_error_named("NotFinalized"));
        assert!(oracle.claim(4, 130).is_success());
        assert_eq!(oracle.paid_to(&participant(0)), 101);
    }

    #[test]
    fn test_unrevealed_top_commitment_wins_as_empty_answer() {
        // an empty answer is correct when the top commitment is never revealed
        let mut oracle = SimulatedOracle::new(100, 120, 1);
        assert!(oracle.answer(participant(0), [0u8; 32], 1, 10).is_success());
        assert!(oracle.commit(participant(1), [5u8; 32], 9, 2, 0, 11).is_success());

        assert!(oracle.claim(MAX_CLAIM_ENTRIES, 131).is_success());
        assert_eq!(oracle.paid_to(&participant(1)), 100 + 2);
        assert_eq!(oracle.paid_to(&participant(0)), 1);
    }
}
