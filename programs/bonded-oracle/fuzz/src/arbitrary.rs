//! Arbitrary input generators for fuzz testing
//!
//! Answers are drawn from a small pool so that histories contain both
//! agreeing and conflicting entries.

use proptest::prelude::*;

use crate::scenarios::{SimulatedBid, TipForgery};

/// Arbitrary 32-byte value (ids, hashes)
pub fn arb_id() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Answer from a pool of four, including the empty answer
pub fn arb_answer() -> impl Strategy<Value = [u8; 32]> {
    prop_oneof![
        Just([0u8; 32]),
        Just([0xABu8; 32]),
        Just([0xCDu8; 32]),
        Just([0xEFu8; 32]),
    ]
}

/// Participant index; a handful so the same key answers more than once
pub fn arb_participant() -> impl Strategy<Value = u8> {
    0u8..6u8
}

/// Arbitrary bond with edge cases
pub fn arb_bond() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        Just(1u64),
        Just(u64::MAX),
        Just(u64::MAX / 2),
        Just(u64::MAX / 2 + 1),
        1u64..1_000u64,
        1_000u64..1_000_000_000u64,
    ]
}

/// Lamports above the minimum bond for a bid
pub fn arb_bond_extra() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), Just(1u64), 0u64..1_000_000u64]
}

/// Arbitrary bounty
pub fn arb_bounty() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), Just(1u64), 1_000u64..1_000_000_000u64]
}

/// Step delay in seconds, around the reveal window ratio
pub fn arb_step_delay() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(2u32),
        Just(8u32),
        Just(9u32),
        Just(86_400u32),
        2u32..10_000u32,
    ]
}

/// Arbitrary timestamp (seconds since Unix epoch)
pub fn arb_timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![
        Just(0i64),
        Just(1_000_000_000i64),
        1_700_000_000i64..1_800_000_000i64,
        Just(i64::MAX / 2),
    ]
}

pub fn arb_forgery() -> impl Strategy<Value = TipForgery> {
    prop_oneof![
        Just(TipForgery::Answerer),
        Just(TipForgery::Bond),
        Just(TipForgery::Id),
        Just(TipForgery::PreviousHash),
    ]
}

pub fn arb_bid() -> impl Strategy<Value = SimulatedBid> {
    (
        arb_participant(),
        arb_answer(),
        arb_bond_extra(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(who, answer, extra, sealed, reveal)| SimulatedBid {
            who,
            answer,
            extra,
            sealed,
            reveal,
        })
}

/// Input for submit_answer fuzz testing
#[derive(Debug, Clone)]
pub struct SubmitAnswerInput {
    pub min_bond: u64,
    pub current_bond: u64,
    pub max_previous_bond: u64,
    pub bond: u64,
    pub answer: [u8; 32],
    pub opening_ts: i64,
    pub now: i64,
}

impl Arbitrary for SubmitAnswerInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_bond(),
            arb_bond(),
            arb_bond(),
            arb_bond(),
            arb_answer(),
            arb_timestamp(),
            arb_timestamp(),
        )
            .prop_map(
                |(min_bond, current_bond, max_previous_bond, bond, answer, opening_ts, now)| {
                    SubmitAnswerInput {
                        min_bond,
                        current_bond,
                        max_previous_bond,
                        bond,
                        answer,
                        opening_ts,
                        now,
                    }
                },
            )
            .boxed()
    }
}

/// Input for commit/reveal fuzz testing
#[derive(Debug, Clone)]
pub struct CommitRevealInput {
    pub answer: [u8; 32],
    pub nonce: u64,
    pub revealed_answer: [u8; 32],
    pub revealed_nonce: u64,
    pub bond: u64,
    pub step_delay: u32,
    pub reveal_window_hint: u32,
    /// Seconds between commit and reveal
    pub reveal_delay: u32,
    pub outbid_before_reveal: bool,
}

impl Arbitrary for CommitRevealInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_answer(),
            any::<u64>(),
            arb_answer(),
            prop_oneof![Just(None::<u64>), any::<u64>().prop_map(Some)],
            1u64..1_000_000u64,
            arb_step_delay(),
            prop_oneof![Just(0u32), 1u32..20_000u32],
            0u32..2_000u32,
            any::<bool>(),
        )
            .prop_map(
                |(
                    answer,
                    nonce,
                    revealed_answer,
                    wrong_nonce,
                    bond,
                    step_delay,
                    reveal_window_hint,
                    reveal_delay,
                    outbid_before_reveal,
                )| {
                    CommitRevealInput {
                        answer,
                        nonce,
                        revealed_answer,
                        revealed_nonce: wrong_nonce.unwrap_or(nonce),
                        bond,
                        step_delay,
                        reveal_window_hint,
                        reveal_delay,
                        outbid_before_reveal,
                    }
                },
            )
            .boxed()
    }
}

/// Input for auction, verdict and claim fuzz testing
#[derive(Debug, Clone)]
pub struct AuctionInput {
    pub bounty: u64,
    pub step_delay: u32,
    pub bids: Vec<SimulatedBid>,
    pub verdict: Option<[u8; 32]>,
    pub chunk_size: usize,
}

impl Arbitrary for AuctionInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_bounty(),
            arb_step_delay(),
            prop::collection::vec(arb_bid(), 1..12),
            proptest::option::of(arb_answer()),
            1usize..=8usize,
        )
            .prop_map(|(bounty, step_delay, bids, verdict, chunk_size)| AuctionInput {
                bounty,
                step_delay,
                bids,
                verdict,
                chunk_size,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_step_delay_never_zero(step_delay in arb_step_delay()) {
            prop_assert!(step_delay >= 2);
        }

        #[test]
        fn test_auction_input_generates(input in any::<AuctionInput>()) {
            prop_assert!(!input.bids.is_empty());
            prop_assert!(input.chunk_size >= 1);
        }
    }
}
