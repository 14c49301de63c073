//! Payout replay and balance ledger helpers.
//!
//! Used by `claim_winnings` and `withdraw`.
//!
//! A claim replays the answer history newest-first, authenticating every
//! link against the single hash stored on the question. Long histories can
//! be replayed in chunks; the question's `ClaimProgress` carries the cursor,
//! the winning-lineage tip and the bonds still waiting for an older correct
//! entry between chunks.
//!
//! Payout rule:
//! - bonded entries whose effective answer equals the final answer form the
//!   winning lineage and get their own bond back
//! - the newest lineage entry also receives the bounty
//! - a wrong bond goes to the nearest older lineage entry, or to the lineage
//!   tip when no older entry is correct
//! - with no correct bonded entry, the newest entry's submitter (the
//!   arbitrator who reported the verdict) receives bounty and bonds

use indexmap::IndexMap;

use crate::errors::OracleError;
use crate::instructions::constants::MAX_CLAIM_ENTRIES;
use crate::state::{ClaimProgress, Commitment, EntryKind, Question, UserBalance};
use crate::utils::hashing;
use anchor_lang::prelude::*;

/// One chunk of history, newest first.
///
/// `hash_chain[i]` is the history hash right after entry `i`. When the chunk
/// stops short of genesis, `hash_chain` carries one extra element: the hash
/// before the oldest supplied entry.
#[derive(Clone, Copy, Debug)]
pub struct HistoryChunk<'a> {
    pub hash_chain: &'a [[u8; 32]],
    pub address_chain: &'a [Pubkey],
    pub bond_chain: &'a [u64],
    pub answer_chain: &'a [[u8; 32]],
}

impl HistoryChunk<'_> {
    pub fn len(&self) -> usize {
        self.address_chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.address_chain.is_empty()
    }

    fn validate_shape(&self) -> Result<()> {
        let n = self.len();
        require!(
            n > 0 && n <= MAX_CLAIM_ENTRIES,
            OracleError::InvalidParameters
        );
        require!(
            self.bond_chain.len() == n && self.answer_chain.len() == n,
            OracleError::InvalidParameters
        );
        require!(
            self.hash_chain.len() == n || self.hash_chain.len() == n + 1,
            OracleError::InvalidParameters
        );
        Ok(())
    }
}

/// Lamports owed to one participant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub payee: Pubkey,
    pub amount: u64,
}

/// Outcome of one replayed chunk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkSettlement {
    /// Payouts merged per payee, in order of first appearance
    pub payouts: Vec<Payout>,
    /// Ids of the commitment records this chunk replayed
    pub consumed_commitments: Vec<[u8; 32]>,
    pub settled: bool,
}

impl ChunkSettlement {
    pub fn total(&self) -> Result<u64> {
        self.payouts.iter().try_fold(0u64, |acc, p| {
            acc.checked_add(p.amount)
                .ok_or_else(|| OracleError::ArithmeticOverflow.into())
        })
    }
}

#[derive(Default)]
struct PayoutLedger(IndexMap<Pubkey, u64>);

impl PayoutLedger {
    fn credit(&mut self, payee: Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let entry = self.0.entry(payee).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(OracleError::ArithmeticOverflow)?;
        Ok(())
    }

    fn into_payouts(self) -> Vec<Payout> {
        self.0
            .into_iter()
            .map(|(payee, amount)| Payout { payee, amount })
            .collect()
    }
}

fn find_commitment<'c>(
    commitments: &'c [Commitment],
    id: &[u8; 32],
) -> Result<&'c Commitment> {
    commitments
        .iter()
        .find(|c| c.commitment_id == *id)
        .ok_or_else(|| OracleError::UnknownCommitment.into())
}

/// Replays one chunk of a finalized question's history.
///
/// The question's claim progress is only written when the whole chunk
/// verifies, so a failed chunk leaves the question untouched.
///
/// # Errors
/// * `AlreadyClaimed` once the replay has reached genesis
/// * `NotFinalized` before the question is final
/// * `InvalidParameters` on mismatched chain lengths
/// * `HistoryHashMismatch` if the chunk does not continue from the cursor
///   or a link does not verify
/// * `UnknownCommitment` if a commitment entry has no matching record
pub fn settle_chunk(
    question: &mut Question,
    chunk: &HistoryChunk<'_>,
    commitments: &[Commitment],
    now: i64,
) -> Result<ChunkSettlement> {
    require!(!question.claim.settled, OracleError::AlreadyClaimed);
    require!(question.is_finalized(now), OracleError::NotFinalized);
    chunk.validate_shape()?;

    let mut progress = if question.claim.started {
        question.claim.clone()
    } else {
        ClaimProgress {
            started: true,
            cursor: question.history_hash,
            ..Default::default()
        }
    };
    require!(
        chunk.hash_chain[0] == progress.cursor,
        OracleError::HistoryHashMismatch
    );

    let seed = hashing::history_seed(&question.question_id);
    let final_answer = question.best_answer();
    let mut ledger = PayoutLedger::default();
    let mut consumed_commitments = Vec::new();

    for i in 0..chunk.len() {
        let before = chunk.hash_chain.get(i + 1).unwrap_or(&seed);
        let payee = chunk.address_chain[i];
        let bond = chunk.bond_chain[i];
        let id = &chunk.answer_chain[i];

        let kind = hashing::verify_link(
            &chunk.hash_chain[i],
            before,
            id,
            bond,
            &payee,
            &EntryKind::ALL,
        )?;

        if progress.fallback_payee.is_none() {
            progress.fallback_payee = Some(payee);
        }

        let effective = match kind {
            EntryKind::Verdict => continue,
            EntryKind::Answer => *id,
            EntryKind::Commitment => {
                consumed_commitments.push(*id);
                find_commitment(commitments, id)?.effective_answer()
            }
        };

        if effective == final_answer {
            if progress.lineage_tip.is_none() {
                progress.lineage_tip = Some(payee);
                ledger.credit(payee, question.bounty)?;
            }
            let owed = bond
                .checked_add(progress.forfeit_pool)
                .ok_or(OracleError::ArithmeticOverflow)?;
            ledger.credit(payee, owed)?;
            progress.forfeit_pool = 0;
        } else {
            progress.forfeit_pool = progress
                .forfeit_pool
                .checked_add(bond)
                .ok_or(OracleError::ArithmeticOverflow)?;
        }
    }

    let reached_genesis = chunk
        .hash_chain
        .get(chunk.len())
        .map_or(true, |h| *h == seed);

    if reached_genesis {
        match (progress.lineage_tip, progress.fallback_payee) {
            (Some(tip), _) => ledger.credit(tip, progress.forfeit_pool)?,
            (None, Some(fallback)) => {
                let owed = question
                    .bounty
                    .checked_add(progress.forfeit_pool)
                    .ok_or(OracleError::ArithmeticOverflow)?;
                ledger.credit(fallback, owed)?;
            }
            (None, None) => return err!(OracleError::HistoryHashMismatch),
        }
        progress.forfeit_pool = 0;
        progress.settled = true;
        progress.cursor = seed;
    } else {
        progress.cursor = chunk.hash_chain[chunk.len()];
    }

    let settlement = ChunkSettlement {
        payouts: ledger.into_payouts(),
        consumed_commitments,
        settled: progress.settled,
    };
    progress.total_paid = progress
        .total_paid
        .checked_add(settlement.total()?)
        .ok_or(OracleError::ArithmeticOverflow)?;
    question.claim = progress;
    Ok(settlement)
}

/// Claims a freshly allocated balance account for `owner`.
pub fn init_balance_if_needed(balance: &mut UserBalance, owner: Pubkey, bump: u8) {
    if balance.owner == Pubkey::default() {
        balance.owner = owner;
        balance.bump = bump;
    }
}

/// Records lamports credited to a balance.
pub fn credit_balance(balance: &mut UserBalance, amount: u64) -> Result<()> {
    balance.amount = balance
        .amount
        .checked_add(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    balance.total_credited = balance
        .total_credited
        .checked_add(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(())
}

/// Records a withdrawal and returns the amount taken. `amount == 0`
/// withdraws everything.
pub fn debit_balance(balance: &mut UserBalance, amount: u64) -> Result<u64> {
    let amount = if amount == 0 { balance.amount } else { amount };
    require!(amount > 0, OracleError::InsufficientBalance);
    balance.amount = balance
        .amount
        .checked_sub(amount)
        .ok_or(OracleError::InsufficientBalance)?;
    balance.total_withdrawn = balance
        .total_withdrawn
        .checked_add(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::answer_helpers::{
        apply_answer, apply_commitment, apply_reveal, CommitmentParams,
    };
    use crate::instructions::arbitration_helpers::{
        apply_arbitration_request, apply_verdict, HistoryTip,
    };
    use crate::state::EMPTY_ANSWER;

    const ARBITRATOR: Pubkey = Pubkey::new_from_array([1u8; 32]);
    const X: Pubkey = Pubkey::new_from_array([9u8; 32]);
    const A: Pubkey = Pubkey::new_from_array([10u8; 32]);
    const B: Pubkey = Pubkey::new_from_array([11u8; 32]);
    const V: [u8; 32] = [0xAB; 32];
    const W: [u8; 32] = [0xCD; 32];

    fn err(e: OracleError) -> anchor_lang::error::Error {
        anchor_lang::error::Error::from(e)
    }

    /// Off-chain view of a history, newest first, as an indexer would keep it
    #[derive(Default)]
    struct History {
        hashes: Vec<[u8; 32]>,
        addresses: Vec<Pubkey>,
        bonds: Vec<u64>,
        answers: Vec<[u8; 32]>,
    }

    impl History {
        fn push(&mut self, after: [u8; 32], who: Pubkey, bond: u64, id: [u8; 32]) {
            self.hashes.insert(0, after);
            self.addresses.insert(0, who);
            self.bonds.insert(0, bond);
            self.answers.insert(0, id);
        }

        fn full(&self) -> HistoryChunk<'_> {
            self.range(0, self.addresses.len())
        }

        /// Entries `start..end`, plus the hash before `end - 1` when short of genesis
        fn range(&self, start: usize, end: usize) -> HistoryChunk<'_> {
            let hash_end = if end < self.hashes.len() { end + 1 } else { end };
            HistoryChunk {
                hash_chain: &self.hashes[start..hash_end],
                address_chain: &self.addresses[start..end],
                bond_chain: &self.bonds[start..end],
                answer_chain: &self.answers[start..end],
            }
        }
    }

    fn new_question() -> Question {
        let question_id = [42u8; 32];
        Question {
            question_id,
            arbitrator: ARBITRATOR,
            step_delay: 120,
            min_bond: 1,
            bounty: 1_000,
            history_hash: hashing::history_seed(&question_id),
            ..Default::default()
        }
    }

    fn answer(q: &mut Question, h: &mut History, who: Pubkey, ans: [u8; 32], bond: u64, now: i64) {
        let prev = q.bond;
        let after = apply_answer(q, ans, prev, bond, &who, now).unwrap();
        h.push(after, who, bond, ans);
    }

    fn commit(
        q: &mut Question,
        h: &mut History,
        who: Pubkey,
        ans: [u8; 32],
        bond: u64,
        now: i64,
    ) -> Commitment {
        let answer_hash = hashing::answer_hash(&ans, 1234);
        let params = CommitmentParams {
            commitment_id: hashing::commitment_id(&q.question_id, &answer_hash, bond),
            answer_hash,
            max_previous_bond: q.bond,
            bond,
            reveal_window_hint: 0,
        };
        let mut c = Commitment::default();
        let after =
            apply_commitment(q, Pubkey::default(), &mut c, &params, &who, 3_600, now).unwrap();
        h.push(after, who, bond, params.commitment_id);
        c
    }

    fn paid(s: &ChunkSettlement, who: Pubkey) -> u64 {
        s.payouts.iter().find(|p| p.payee == who).map_or(0, |p| p.amount)
    }

    /// X answers W (4), A answers V (8), B commits V (16) and reveals,
    /// arbitration confirms B's entry as the tip with verdict `verdict_answer`.
    fn disputed(verdict_answer: [u8; 32]) -> (Question, History, Vec<Commitment>) {
        let mut q = new_question();
        let mut h = History::default();
        answer(&mut q, &mut h, X, W, 4, 10);
        answer(&mut q, &mut h, A, V, 8, 11);
        let mut c = commit(&mut q, &mut h, B, V, 16, 12);
        apply_reveal(&mut q, &mut c, V, 1234, 16, 13).unwrap();

        // the tip entry is B's commitment even after the reveal
        let tip = HistoryTip {
            last_history_hash: h.hashes[1],
            last_answer_or_commitment_id: h.answers[0],
            last_bond: 16,
            last_answerer: B,
        };
        apply_arbitration_request(&mut q, 16, 14).unwrap();
        let after = apply_verdict(&mut q, &tip, Some(&c), verdict_answer, &ARBITRATOR, 15).unwrap();
        h.push(after, ARBITRATOR, 0, verdict_answer);
        (q, h, vec![c])
    }

    mod payout_rule {
        use super::*;

        #[test]
        fn test_verdict_confirming_lineage() {
            let (mut q, h, commitments) = disputed(V);
            let s = settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap();

            assert!(s.settled);
            assert_eq!(paid(&s, B), 1_000 + 16 + 4);
            assert_eq!(paid(&s, A), 8);
            assert_eq!(paid(&s, X), 0);
            assert_eq!(paid(&s, ARBITRATOR), 0);
            assert_eq!(s.total().unwrap(), 1_000 + 4 + 8 + 16);
            assert_eq!(q.claim.total_paid, 1_028);
            assert_eq!(s.consumed_commitments, vec![commitments[0].commitment_id]);
        }

        #[test]
        fn test_verdict_for_oldest_answer() {
            let (mut q, h, commitments) = disputed(W);
            let s = settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap();

            // B and A were wrong; their bonds flow down to X
            assert_eq!(paid(&s, X), 1_000 + 4 + 8 + 16);
            assert_eq!(paid(&s, A), 0);
            assert_eq!(paid(&s, B), 0);
        }

        #[test]
        fn test_nobody_correct_pays_arbitrator() {
            let (mut q, h, commitments) = disputed([0x77; 32]);
            let s = settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap();

            assert_eq!(s.payouts, vec![Payout { payee: ARBITRATOR, amount: 1_028 }]);
        }

        #[test]
        fn test_wrong_bond_goes_to_nearest_older_correct() {
            let mut q = new_question();
            let mut h = History::default();
            answer(&mut q, &mut h, X, V, 1, 10);
            answer(&mut q, &mut h, A, W, 2, 11);
            answer(&mut q, &mut h, B, V, 4, 12);
            answer(&mut q, &mut h, A, W, 8, 13);
            answer(&mut q, &mut h, B, V, 16, 14);

            let s = settle_chunk(&mut q, &h.full(), &[], 14 + 120).unwrap();
            // B: bounty + 16 + (8 wrong, 4 own) ; X: own 1 + A's 2
            assert_eq!(paid(&s, B), 1_000 + 16 + 4 + 8);
            assert_eq!(paid(&s, X), 1 + 2);
            assert_eq!(paid(&s, A), 0);
            assert_eq!(s.payouts[0].payee, B);
        }

        #[test]
        fn test_unanswered_timeout_settles_to_sole_answerer() {
            let mut q = new_question();
            let mut h = History::default();
            answer(&mut q, &mut h, A, V, 8, 10);

            assert_eq!(
                settle_chunk(&mut q, &h.full(), &[], 129).unwrap_err(),
                err(OracleError::NotFinalized)
            );
            let s = settle_chunk(&mut q, &h.full(), &[], 130).unwrap();
            assert_eq!(s.payouts, vec![Payout { payee: A, amount: 1_008 }]);
        }

        #[test]
        fn test_unrevealed_commitment_counts_as_empty() {
            // attacker answers, victim commits and never reveals, verdict is empty
            let attacker = X;
            let victim = B;
            let mut q = new_question();
            let mut h = History::default();
            answer(&mut q, &mut h, attacker, V, 8, 10);
            let c = commit(&mut q, &mut h, victim, W, 16, 11);

            let tip = HistoryTip {
                last_history_hash: h.hashes[1],
                last_answer_or_commitment_id: h.answers[0],
                last_bond: 16,
                last_answerer: attacker,
            };
            apply_arbitration_request(&mut q, 16, 30).unwrap();
            assert_eq!(
                apply_verdict(&mut q, &tip, Some(&c), EMPTY_ANSWER, &ARBITRATOR, 30).unwrap_err(),
                err(OracleError::HistoryHashMismatch)
            );

            verdict_after_reveal_window(&mut q, &mut h, &c);
            let s = settle_chunk(&mut q, &h.full(), &[c], 30).unwrap();
            assert_eq!(paid(&s, victim), 1_000 + 16 + 8);
            assert_eq!(paid(&s, attacker), 0);
        }

        fn verdict_after_reveal_window(q: &mut Question, h: &mut History, c: &Commitment) {
            let tip = HistoryTip {
                last_history_hash: h.hashes[1],
                last_answer_or_commitment_id: h.answers[0],
                last_bond: 16,
                last_answerer: c.answerer,
            };
            let after = apply_verdict(q, &tip, Some(c), EMPTY_ANSWER, &ARBITRATOR, 30).unwrap();
            h.push(after, ARBITRATOR, 0, EMPTY_ANSWER);
        }

        #[test]
        fn test_missing_commitment_record() {
            let (mut q, h, _) = disputed(V);
            assert_eq!(
                settle_chunk(&mut q, &h.full(), &[], 15).unwrap_err(),
                err(OracleError::UnknownCommitment)
            );
            assert!(!q.claim.started);
        }
    }

    mod chain_checks {
        use super::*;

        #[test]
        fn test_claim_is_idempotent() {
            let (mut q, h, commitments) = disputed(V);
            settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap();
            assert_eq!(
                settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap_err(),
                err(OracleError::AlreadyClaimed)
            );
        }

        #[test]
        fn test_tampered_chain_rejected() {
            let (mut q, mut h, commitments) = disputed(V);
            h.addresses[2] = B;
            assert_eq!(
                settle_chunk(&mut q, &h.full(), &commitments, 15).unwrap_err(),
                err(OracleError::HistoryHashMismatch)
            );
        }

        #[test]
        fn test_stale_tip_rejected() {
            let (mut q, h, commitments) = disputed(V);
            let chunk = h.range(1, h.addresses.len());
            assert_eq!(
                settle_chunk(&mut q, &chunk, &commitments, 15).unwrap_err(),
                err(OracleError::HistoryHashMismatch)
            );
        }

        #[test]
        fn test_length_mismatch_rejected() {
            let (mut q, h, commitments) = disputed(V);
            let mut chunk = h.full();
            chunk.bond_chain = &h.bonds[1..];
            assert_eq!(
                settle_chunk(&mut q, &chunk, &commitments, 15).unwrap_err(),
                err(OracleError::InvalidParameters)
            );
        }

        #[test]
        fn test_chunked_claim_matches_single_claim() {
            let (mut whole, h, commitments) = disputed(W);
            let single = settle_chunk(&mut whole, &h.full(), &commitments, 15).unwrap();

            let (mut q, h, commitments) = disputed(W);
            let first = settle_chunk(&mut q, &h.range(0, 2), &commitments, 15).unwrap();
            assert!(!first.settled);
            assert_eq!(q.claim.cursor, h.hashes[2]);
            assert_eq!(q.claim.forfeit_pool, 16);

            // replaying the same chunk does not pay twice
            assert_eq!(
                settle_chunk(&mut q, &h.range(0, 2), &commitments, 15).unwrap_err(),
                err(OracleError::HistoryHashMismatch)
            );

            let second = settle_chunk(&mut q, &h.range(2, 4), &commitments, 15).unwrap();
            assert!(second.settled);
            assert_eq!(
                first.total().unwrap() + second.total().unwrap(),
                single.total().unwrap()
            );
            assert_eq!(paid(&second, X), paid(&single, X));
            assert_eq!(q.claim.total_paid, whole.claim.total_paid);
        }
    }

    mod balances {
        use super::*;

        #[test]
        fn test_credit_and_withdraw() {
            let mut b = UserBalance::default();
            credit_balance(&mut b, 100).unwrap();
            assert_eq!(debit_balance(&mut b, 40).unwrap(), 40);
            assert_eq!(b.amount, 60);
            assert_eq!(debit_balance(&mut b, 0).unwrap(), 60);
            assert_eq!(b.amount, 0);
            assert_eq!(b.total_credited, 100);
            assert_eq!(b.total_withdrawn, 100);
        }

        #[test]
        fn test_overdraw_rejected() {
            let mut b = UserBalance::default();
            credit_balance(&mut b, 10).unwrap();
            assert_eq!(
                debit_balance(&mut b, 11).unwrap_err(),
                err(OracleError::InsufficientBalance)
            );
            debit_balance(&mut b, 0).unwrap();
            assert_eq!(
                debit_balance(&mut b, 0).unwrap_err(),
                err(OracleError::InsufficientBalance)
            );
        }
    }
}
