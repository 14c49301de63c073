//! Fuzz testing scenarios that drive the oracle's instruction logic
//!
//! These scenarios call the program's own helpers on in-memory accounts,
//! keeping an indexer-style copy of the answer history alongside, so
//! properties can be checked without the Solana runtime.

use anchor_lang::prelude::Pubkey;
use bonded_oracle::instructions::answer_helpers::{
    apply_answer, apply_commitment, apply_reveal, CommitmentParams,
};
use bonded_oracle::instructions::arbitration_helpers::{
    apply_arbitration_request, apply_verdict, HistoryTip,
};
use bonded_oracle::instructions::constants::MAX_CLAIM_ENTRIES;
use bonded_oracle::instructions::settlement_helpers::{settle_chunk, HistoryChunk, Payout};
use bonded_oracle::state::{Commitment, EntryKind, Question};
use bonded_oracle::utils::hashing;

use crate::invariants::*;

pub const ARBITRATOR: Pubkey = Pubkey::new_from_array([1u8; 32]);
pub const QUESTION_ID: [u8; 32] = [42u8; 32];
pub const DEFAULT_REVEAL_WINDOW: u32 = 3_600;

/// Participant key for a fuzzer-chosen index. Never collides with `ARBITRATOR`.
pub fn participant(index: u8) -> Pubkey {
    Pubkey::new_from_array([index.saturating_add(10); 32])
}

/// One appended history entry, as an indexer would record it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub before: [u8; 32],
    pub after: [u8; 32],
    pub id: [u8; 32],
    pub bond: u64,
    pub answerer: Pubkey,
    pub kind: EntryKind,
}

/// Result of a simulated instruction execution
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }

    /// True if this is an error whose message names `name`
    pub fn is_error_named(&self, name: &str) -> bool {
        matches!(self, SimulationResult::Error(msg) if msg.contains(name))
    }
}

fn rejected(e: anchor_lang::error::Error) -> SimulationResult {
    SimulationResult::Error(e.to_string())
}

fn violation(what: impl std::fmt::Debug) -> SimulationResult {
    SimulationResult::InvariantViolation(format!("{what:?}"))
}

/// A single question plus the off-chain view of its history
#[derive(Debug, Clone)]
pub struct SimulatedOracle {
    pub question: Question,
    /// Oldest first
    pub entries: Vec<HistoryEntry>,
    pub commitments: Vec<Commitment>,
    /// Every payout credited by claims so far
    pub payouts: Vec<Payout>,
}

impl SimulatedOracle {
    pub fn new(bounty: u64, step_delay: u32, min_bond: u64) -> Self {
        let question = Question {
            question_id: QUESTION_ID,
            arbitrator: ARBITRATOR,
            step_delay,
            min_bond,
            bounty,
            history_hash: hashing::history_seed(&QUESTION_ID),
            ..Default::default()
        };
        Self {
            question,
            entries: Vec::new(),
            commitments: Vec::new(),
            payouts: Vec::new(),
        }
    }

    /// Smallest bond the next answer may post
    pub fn next_bond(&self) -> u64 {
        self.question
            .bond
            .saturating_mul(2)
            .max(self.question.min_bond.max(1))
    }

    pub fn bonds(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.bond).collect()
    }

    pub fn paid_to(&self, who: &Pubkey) -> u64 {
        self.payouts
            .iter()
            .filter(|p| p.payee == *who)
            .map(|p| p.amount)
            .sum()
    }

    pub fn total_paid(&self) -> u64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    fn push(
        &mut self,
        before: [u8; 32],
        after: [u8; 32],
        id: [u8; 32],
        bond: u64,
        answerer: Pubkey,
        kind: EntryKind,
    ) {
        self.entries.push(HistoryEntry {
            before,
            after,
            id,
            bond,
            answerer,
            kind,
        });
    }

    fn check_bonded_entry(&self, previous: u64, bond: u64) -> Option<SimulationResult> {
        let escalation = check_bond_escalation(previous, bond, self.question.min_bond);
        if escalation != BondInvariantResult::Valid {
            return Some(violation(escalation));
        }
        let monotonic = check_bond_monotonic(previous, self.question.bond);
        if monotonic != BondInvariantResult::Valid {
            return Some(violation(monotonic));
        }
        let chain = check_history_chain(&self.question, &self.entries);
        if chain != ChainInvariantResult::Valid {
            return Some(violation(chain));
        }
        None
    }

    /// Plaintext answer outbidding the current bond as seen by the caller
    pub fn answer(
        &mut self,
        who: Pubkey,
        answer: [u8; 32],
        bond: u64,
        now: i64,
    ) -> SimulationResult {
        let seen = self.question.bond;
        self.answer_seen(who, answer, seen, bond, now)
    }

    /// Plaintext answer with an explicit `max_previous_bond`
    pub fn answer_seen(
        &mut self,
        who: Pubkey,
        answer: [u8; 32],
        max_previous_bond: u64,
        bond: u64,
        now: i64,
    ) -> SimulationResult {
        let before = self.question.history_hash;
        let previous = self.question.bond;

        match apply_answer(&mut self.question, answer, max_previous_bond, bond, &who, now) {
            Ok(after) => {
                self.push(before, after, answer, bond, who, EntryKind::Answer);
                self.check_bonded_entry(previous, bond)
                    .unwrap_or(SimulationResult::Success)
            }
            Err(e) => {
                if self.question.history_hash != before || self.question.bond != previous {
                    return violation("rejected answer changed the question");
                }
                rejected(e)
            }
        }
    }

    /// Sealed answer. The commitment is kept for later reveal and replay.
    pub fn commit(
        &mut self,
        who: Pubkey,
        answer: [u8; 32],
        nonce: u64,
        bond: u64,
        hint: u32,
        now: i64,
    ) -> SimulationResult {
        let before = self.question.history_hash;
        let previous = self.question.bond;
        let answer_hash = hashing::answer_hash(&answer, nonce);
        let params = CommitmentParams {
            commitment_id: hashing::commitment_id(&QUESTION_ID, &answer_hash, bond),
            answer_hash,
            max_previous_bond: previous,
            bond,
            reveal_window_hint: hint,
        };
        let mut commitment = Commitment::default();

        match apply_commitment(
            &mut self.question,
            Pubkey::default(),
            &mut commitment,
            &params,
            &who,
            DEFAULT_REVEAL_WINDOW,
            now,
        ) {
            Ok(after) => {
                self.push(before, after, params.commitment_id, bond, who, EntryKind::Commitment);
                self.commitments.push(commitment);
                self.check_bonded_entry(previous, bond)
                    .unwrap_or(SimulationResult::Success)
            }
            Err(e) => rejected(e),
        }
    }

    /// Reveals the `index`th commitment
    pub fn reveal(
        &mut self,
        index: usize,
        answer: [u8; 32],
        nonce: u64,
        now: i64,
    ) -> SimulationResult {
        let history = self.question.history_hash;
        let Some(commitment) = self.commitments.get_mut(index) else {
            return SimulationResult::Error("UnknownCommitment".to_string());
        };
        let bond = commitment.bond;

        let result = apply_reveal(&mut self.question, commitment, answer, nonce, bond, now);
        if self.question.history_hash != history {
            return violation("reveal changed the history hash");
        }
        match result {
            Ok(_) => SimulationResult::Success,
            Err(e) => rejected(e),
        }
    }

    pub fn request_arbitration(&mut self, now: i64) -> SimulationResult {
        let bond = self.question.bond;
        match apply_arbitration_request(&mut self.question, bond, now) {
            Ok(()) => SimulationResult::Success,
            Err(e) => rejected(e),
        }
    }

    /// The real history tip, as an honest arbitrator restates it
    pub fn tip(&self) -> Option<HistoryTip> {
        self.entries.last().map(|e| HistoryTip {
            last_history_hash: e.before,
            last_answer_or_commitment_id: e.id,
            last_bond: e.bond,
            last_answerer: e.answerer,
        })
    }

    pub fn report_verdict(&mut self, verdict: [u8; 32], now: i64) -> SimulationResult {
        match self.tip() {
            Some(tip) => self.report_verdict_with_tip(&tip, verdict, now),
            None => SimulationResult::Error("NoAnswer".to_string()),
        }
    }

    /// Reports a verdict restating the tip as `tip`, honest or not
    pub fn report_verdict_with_tip(
        &mut self,
        tip: &HistoryTip,
        verdict: [u8; 32],
        now: i64,
    ) -> SimulationResult {
        let before = self.question.history_hash;
        let finalization_ts = self.question.finalization_ts;
        let tip_commitment = self
            .commitments
            .iter()
            .find(|c| c.commitment_id == tip.last_answer_or_commitment_id);

        match apply_verdict(&mut self.question, tip, tip_commitment, verdict, &ARBITRATOR, now) {
            Ok(after) => {
                self.push(before, after, verdict, 0, ARBITRATOR, EntryKind::Verdict);
                let chain = check_history_chain(&self.question, &self.entries);
                if chain != ChainInvariantResult::Valid {
                    return violation(chain);
                }
                SimulationResult::Success
            }
            Err(e) => {
                if self.question.history_hash != before
                    || self.question.finalization_ts != finalization_ts
                {
                    return violation("rejected verdict changed the question");
                }
                rejected(e)
            }
        }
    }

    /// Replays the whole history newest-first in chunks of `chunk_size`.
    pub fn claim(&mut self, chunk_size: usize, now: i64) -> SimulationResult {
        let chunk_size = chunk_size.clamp(1, MAX_CLAIM_ENTRIES);
        let hashes: Vec<[u8; 32]> = self.entries.iter().rev().map(|e| e.after).collect();
        let addresses: Vec<Pubkey> = self.entries.iter().rev().map(|e| e.answerer).collect();
        let bonds: Vec<u64> = self.entries.iter().rev().map(|e| e.bond).collect();
        let ids: Vec<[u8; 32]> = self.entries.iter().rev().map(|e| e.id).collect();
        let n = addresses.len();

        let mut start = 0;
        while start < n {
            let end = (start + chunk_size).min(n);
            let hash_end = if end < n { end + 1 } else { end };
            let chunk = HistoryChunk {
                hash_chain: &hashes[start..hash_end],
                address_chain: &addresses[start..end],
                bond_chain: &bonds[start..end],
                answer_chain: &ids[start..end],
            };

            let settlement =
                match settle_chunk(&mut self.question, &chunk, &self.commitments, now) {
                    Ok(s) => s,
                    Err(e) => return rejected(e),
                };
            self.payouts.extend(settlement.payouts.iter().copied());

            if settlement.settled != (end == n) {
                return violation(format!(
                    "settled={} after entry {end} of {n}",
                    settlement.settled
                ));
            }
            start = end;
        }

        if n == 0 {
            return SimulationResult::Error("NoAnswer".to_string());
        }

        let conservation =
            check_payout_conservation(self.question.bounty, &self.bonds(), self.total_paid());
        if conservation != PayoutInvariantResult::Valid {
            return violation(conservation);
        }
        let payees = check_payees_in_history(&self.payouts, &self.entries);
        if payees != PayoutInvariantResult::Valid {
            return violation(payees);
        }
        if self.question.claim.total_paid != self.total_paid() {
            return violation("claim progress disagrees with credited payouts");
        }
        SimulationResult::Success
    }
}

// ============================================================================
// Auction Scenario
// ============================================================================

/// One bid in a simulated auction
#[derive(Debug, Clone, Copy)]
pub struct SimulatedBid {
    pub who: u8,
    pub answer: [u8; 32],
    /// Lamports above the minimum bond
    pub extra: u64,
    pub sealed: bool,
    pub reveal: bool,
}

/// Runs the bids one second apart, arbitrates if `verdict` is set, and
/// returns the oracle together with the time the question is final.
pub fn simulate_auction(
    bounty: u64,
    step_delay: u32,
    bids: &[SimulatedBid],
    verdict: Option<[u8; 32]>,
) -> Result<(SimulatedOracle, i64), SimulationResult> {
    let mut oracle = SimulatedOracle::new(bounty, step_delay, 1);
    let mut now = 10i64;

    for (i, bid) in bids.iter().enumerate() {
        now += 1;
        let who = participant(bid.who);
        let bond = oracle.next_bond().saturating_add(bid.extra);
        let nonce = i as u64;

        let result = if bid.sealed {
            let result = oracle.commit(who, bid.answer, nonce, bond, 0, now);
            if result.is_success() && bid.reveal {
                let index = oracle.commitments.len() - 1;
                let revealed = oracle.reveal(index, bid.answer, nonce, now);
                if !revealed.is_success() {
                    return Err(revealed);
                }
            }
            result
        } else {
            oracle.answer(who, bid.answer, bond, now)
        };
        if !result.is_success() {
            return Err(result);
        }
    }

    let final_at = match verdict {
        Some(answer) => {
            let requested = oracle.request_arbitration(now);
            if !requested.is_success() {
                return Err(requested);
            }
            // past every reveal window
            now += i64::from(step_delay);
            let reported = oracle.report_verdict(answer, now);
            if !reported.is_success() {
                return Err(reported);
            }
            now
        }
        None => oracle.question.finalization_ts,
    };

    let finality = check_finality(&oracle.question, final_at);
    if finality != FinalityInvariantResult::Valid || !oracle.question.is_finalized(final_at) {
        return Err(violation(finality));
    }
    Ok((oracle, final_at))
}

// ============================================================================
// Forged Tip Scenario
// ============================================================================

/// Field of the real tip an attacker falsifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipForgery {
    Answerer,
    Bond,
    Id,
    PreviousHash,
}

/// A victim answers, a second participant commits on top and never
/// reveals, then arbitration restates the tip with one field falsified.
/// The verdict must be rejected and the honest verdict must still pay the
/// attacker nothing.
pub fn simulate_forged_tip(
    victim_bond: u64,
    forgery: TipForgery,
    verdict: [u8; 32],
) -> SimulationResult {
    let victim = participant(3);
    let committer = participant(4);
    let attacker = participant(5);

    let mut oracle = SimulatedOracle::new(1_000, 120, 1);
    let bond = victim_bond.max(1);
    let answered = oracle.answer(victim, verdict, bond, 10);
    if !answered.is_success() {
        return answered;
    }
    let committed = oracle.commit(committer, [7u8; 32], 99, bond.saturating_mul(2), 0, 11);
    if !committed.is_success() {
        return committed;
    }
    let requested = oracle.request_arbitration(12);
    if !requested.is_success() {
        return requested;
    }

    let Some(real) = oracle.tip() else {
        return violation("no tip after two entries");
    };
    let mut forged = real;
    match forgery {
        TipForgery::Answerer => forged.last_answerer = attacker,
        TipForgery::Bond => forged.last_bond = real.last_bond.wrapping_add(1),
        TipForgery::Id => forged.last_answer_or_commitment_id = [0xEE; 32],
        TipForgery::PreviousHash => forged.last_history_hash = [0xEE; 32],
    }

    // reveal window is long closed by now
    let now = 12 + i64::from(DEFAULT_REVEAL_WINDOW);
    let result = oracle.report_verdict_with_tip(&forged, verdict, now);
    if !result.is_error_named("HistoryHashMismatch") {
        return violation(format!("forged tip ({forgery:?}) was not rejected: {result:?}"));
    }

    let honest = oracle.report_verdict(verdict, now);
    if !honest.is_success() {
        return honest;
    }
    let claimed = oracle.claim(MAX_CLAIM_ENTRIES, now);
    if !claimed.is_success() {
        return claimed;
    }

    let attacker_paid = check_not_paid(&oracle.payouts, &attacker);
    if attacker_paid != PayoutInvariantResult::Valid {
        return violation(attacker_paid);
    }
    SimulationResult::Success
}
