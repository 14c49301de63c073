//! Bonding auction and commit-reveal helpers.
//!
//! Used by `submit_answer`, `submit_commitment`, `reveal_answer` and
//! `final_answer_if_matches`.

use crate::errors::OracleError;
use crate::instructions::constants::{BOND_MULTIPLIER, MIN_FIRST_BOND, REVEAL_WINDOW_RATIO};
use crate::state::{Commitment, EntryKind, Question};
use crate::utils::hashing;
use anchor_lang::prelude::*;

/// Rejects answers before opening, after finalization, and during arbitration.
pub fn require_open(question: &Question, now: i64) -> Result<()> {
    require!(now >= question.opening_ts, OracleError::NotOpen);
    require!(!question.is_pending_arbitration, OracleError::NotOpen);
    require!(!question.is_finalized(now), OracleError::NotOpen);
    Ok(())
}

/// Smallest bond the next answer may post.
pub fn required_bond(question: &Question) -> Result<u64> {
    let doubled = question
        .bond
        .checked_mul(BOND_MULTIPLIER)
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(doubled.max(question.min_bond.max(MIN_FIRST_BOND)))
}

/// Checks the caller's view of the auction and the offered bond.
///
/// # Errors
/// * `StaleBond` if `max_previous_bond` is not the current bond
/// * `InsufficientBond` if `bond` is below [`required_bond`]
pub fn check_bond(question: &Question, max_previous_bond: u64, bond: u64) -> Result<()> {
    require!(
        max_previous_bond == question.bond,
        OracleError::StaleBond
    );
    require!(
        bond >= required_bond(question)?,
        OracleError::InsufficientBond
    );
    Ok(())
}

/// Appends an entry to the history chain and returns the new tip.
/// The recorded bond only moves for bonded entries.
pub fn record_entry(
    question: &mut Question,
    answer_or_commitment_id: &[u8; 32],
    bond: u64,
    answerer: &Pubkey,
    kind: EntryKind,
) -> [u8; 32] {
    question.history_hash = hashing::history_link(
        &question.history_hash,
        answer_or_commitment_id,
        bond,
        answerer,
        kind,
    );
    if bond > 0 {
        question.bond = bond;
    }
    question.history_hash
}

fn restart_timer(question: &mut Question, now: i64) -> Result<()> {
    question.finalization_ts = now
        .checked_add(i64::from(question.step_delay))
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(())
}

/// Plaintext answer. Returns the new history hash.
pub fn apply_answer(
    question: &mut Question,
    answer: [u8; 32],
    max_previous_bond: u64,
    bond: u64,
    answerer: &Pubkey,
    now: i64,
) -> Result<[u8; 32]> {
    require_open(question, now)?;
    check_bond(question, max_previous_bond, bond)?;

    let history_hash = record_entry(question, &answer, bond, answerer, EntryKind::Answer);
    question.best_answer_id = answer;
    question.best_is_commitment = false;
    restart_timer(question, now)?;
    Ok(history_hash)
}

/// Reveal window for a new commitment: the hint (or the configured default
/// when the hint is zero), capped at `step_delay / REVEAL_WINDOW_RATIO` and
/// never below one second.
pub fn reveal_window(step_delay: u32, hint: u32, default_window: u32) -> u32 {
    let requested = if hint == 0 { default_window } else { hint };
    let cap = (step_delay / REVEAL_WINDOW_RATIO).max(1);
    requested.min(cap).max(1)
}

/// Inputs of a sealed answer
#[derive(Clone, Copy, Debug)]
pub struct CommitmentParams {
    /// Id the caller derived for the commitment PDA
    pub commitment_id: [u8; 32],
    pub answer_hash: [u8; 32],
    pub max_previous_bond: u64,
    pub bond: u64,
    pub reveal_window_hint: u32,
}

/// Sealed answer. Populates `commitment` and returns the new history hash.
///
/// # Errors
/// * `InvalidParameters` if `commitment_id` is not derived from the question,
///   answer hash and bond
/// * `AlreadyExists` if the commitment account is already populated
pub fn apply_commitment(
    question: &mut Question,
    question_key: Pubkey,
    commitment: &mut Commitment,
    params: &CommitmentParams,
    answerer: &Pubkey,
    default_window: u32,
    now: i64,
) -> Result<[u8; 32]> {
    require_open(question, now)?;
    check_bond(question, params.max_previous_bond, params.bond)?;

    let commitment_id =
        hashing::commitment_id(&question.question_id, &params.answer_hash, params.bond);
    require!(
        commitment_id == params.commitment_id,
        OracleError::InvalidParameters
    );
    require!(!commitment.is_initialized(), OracleError::AlreadyExists);

    let window = reveal_window(question.step_delay, params.reveal_window_hint, default_window);
    commitment.commitment_id = commitment_id;
    commitment.question = question_key;
    commitment.answer_hash = params.answer_hash;
    commitment.bond = params.bond;
    commitment.answerer = *answerer;
    commitment.reveal_deadline = now
        .checked_add(i64::from(window))
        .ok_or(OracleError::ArithmeticOverflow)?;
    commitment.is_revealed = false;
    commitment.revealed_answer = [0u8; 32];

    let history_hash = record_entry(
        question,
        &commitment_id,
        params.bond,
        answerer,
        EntryKind::Commitment,
    );
    question.best_answer_id = commitment_id;
    question.best_is_commitment = true;
    restart_timer(question, now)?;
    Ok(history_hash)
}

/// Opens a commitment. Returns whether the revealed answer became the
/// question's best answer.
///
/// # Errors
/// * `AlreadyRevealed` on a second reveal
/// * `AlreadyFinalized` once the question is final
/// * `DeadlineExpired` if `now >= reveal_deadline`
/// * `HashMismatch` if the answer, nonce or bond do not match the commitment
pub fn apply_reveal(
    question: &mut Question,
    commitment: &mut Commitment,
    answer: [u8; 32],
    nonce: u64,
    bond: u64,
    now: i64,
) -> Result<bool> {
    require!(!commitment.is_revealed, OracleError::AlreadyRevealed);
    require!(!question.is_finalized(now), OracleError::AlreadyFinalized);
    require!(
        now < commitment.reveal_deadline,
        OracleError::DeadlineExpired
    );
    require!(
        hashing::answer_hash(&answer, nonce) == commitment.answer_hash
            && bond == commitment.bond,
        OracleError::HashMismatch
    );

    commitment.is_revealed = true;
    commitment.revealed_answer = answer;

    let is_best = question.best_is_commitment
        && question.best_answer_id == commitment.commitment_id
        && question.bond == commitment.bond;
    if is_best {
        question.best_answer_id = answer;
        question.best_is_commitment = false;
        // A pending arbitration keeps the clock stopped
        if !question.is_pending_arbitration {
            restart_timer(question, now)?;
        }
    }
    Ok(is_best)
}

/// Reads a commitment account; `None` when it holds no commitment.
pub fn try_load_commitment(info: &AccountInfo<'_>) -> Result<Option<Commitment>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    let commitment = Commitment::try_deserialize(&mut &data[..])?;
    Ok(Some(commitment))
}

/// Reads the commitment posted on `question_key`.
///
/// # Errors
/// * `UnknownCommitment` if the account holds no commitment for that question
pub fn load_commitment(info: &AccountInfo<'_>, question_key: &Pubkey) -> Result<Commitment> {
    try_load_commitment(info)?
        .filter(|c| c.question == *question_key)
        .ok_or_else(|| OracleError::UnknownCommitment.into())
}

/// Writes a commitment back into its account.
pub fn store_commitment(info: &AccountInfo<'_>, commitment: &Commitment) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    commitment.try_serialize(&mut writer)?;
    Ok(())
}

/// Expectations a consumer places on a question before trusting its answer
#[derive(Clone, Copy, Debug)]
pub struct AnswerExpectations {
    pub content_hash: [u8; 32],
    pub arbitrator: Pubkey,
    pub min_step_delay: u32,
    pub min_bond: u64,
}

/// Final answer, provided the question is final and was asked the way the
/// consumer expects.
///
/// # Errors
/// * `NotFinalized` before finality
/// * `InvalidParameters` if content, arbitrator, step delay or bond fall short
pub fn final_answer_if_matches(
    question: &Question,
    expected: &AnswerExpectations,
    now: i64,
) -> Result<[u8; 32]> {
    require!(question.is_finalized(now), OracleError::NotFinalized);
    require!(
        question.content_hash == expected.content_hash,
        OracleError::InvalidParameters
    );
    require_keys_eq!(
        question.arbitrator,
        expected.arbitrator,
        OracleError::InvalidParameters
    );
    require!(
        question.step_delay >= expected.min_step_delay,
        OracleError::InvalidParameters
    );
    require!(
        question.bond >= expected.min_bond,
        OracleError::InvalidParameters
    );
    Ok(question.best_answer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EMPTY_ANSWER;

    const A: Pubkey = Pubkey::new_from_array([10u8; 32]);
    const B: Pubkey = Pubkey::new_from_array([11u8; 32]);
    const QUESTION_KEY: Pubkey = Pubkey::new_from_array([12u8; 32]);

    fn err(e: OracleError) -> anchor_lang::error::Error {
        anchor_lang::error::Error::from(e)
    }

    fn question() -> Question {
        let question_id = [42u8; 32];
        Question {
            question_id,
            step_delay: 120,
            opening_ts: 100,
            min_bond: 1,
            history_hash: hashing::history_seed(&question_id),
            ..Default::default()
        }
    }

    fn sealed(
        q: &Question,
        answer: [u8; 32],
        nonce: u64,
        bond: u64,
        prev: u64,
    ) -> CommitmentParams {
        let answer_hash = hashing::answer_hash(&answer, nonce);
        CommitmentParams {
            commitment_id: hashing::commitment_id(&q.question_id, &answer_hash, bond),
            answer_hash,
            max_previous_bond: prev,
            bond,
            reveal_window_hint: 0,
        }
    }

    mod auction {
        use super::*;

        #[test]
        fn test_not_open_before_opening_ts() {
            let mut q = question();
            assert_eq!(
                apply_answer(&mut q, [1u8; 32], 0, 1, &A, 99).unwrap_err(),
                err(OracleError::NotOpen)
            );
            assert!(apply_answer(&mut q, [1u8; 32], 0, 1, &A, 100).is_ok());
        }

        #[test]
        fn test_answer_updates_chain_and_timer() {
            let mut q = question();
            let seed = q.history_hash;
            let tip = apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();

            assert_eq!(
                tip,
                hashing::history_link(&seed, &[1u8; 32], 4, &A, EntryKind::Answer)
            );
            assert_eq!(q.history_hash, tip);
            assert_eq!(q.bond, 4);
            assert_eq!(q.best_answer_id, [1u8; 32]);
            assert_eq!(q.finalization_ts, 220);
        }

        #[test]
        fn test_doubling_boundary() {
            let mut q = question();
            apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();

            assert_eq!(
                apply_answer(&mut q, [2u8; 32], 4, 7, &B, 101).unwrap_err(),
                err(OracleError::InsufficientBond)
            );
            assert!(apply_answer(&mut q, [2u8; 32], 4, 8, &B, 101).is_ok());
        }

        #[test]
        fn test_stale_bond_rejected() {
            let mut q = question();
            apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();
            let before = q.history_hash;

            assert_eq!(
                apply_answer(&mut q, [2u8; 32], 2, 8, &B, 101).unwrap_err(),
                err(OracleError::StaleBond)
            );
            assert_eq!(
                apply_answer(&mut q, [2u8; 32], 8, 16, &B, 101).unwrap_err(),
                err(OracleError::StaleBond)
            );
            assert_eq!(q.history_hash, before);
        }

        #[test]
        fn test_first_bond_respects_question_min_bond() {
            let mut q = question();
            q.min_bond = 50;
            assert_eq!(
                apply_answer(&mut q, [1u8; 32], 0, 49, &A, 100).unwrap_err(),
                err(OracleError::InsufficientBond)
            );
            assert!(apply_answer(&mut q, [1u8; 32], 0, 50, &A, 100).is_ok());
        }

        #[test]
        fn test_zero_bond_never_accepted() {
            let mut q = question();
            q.min_bond = 0;
            assert_eq!(required_bond(&q).unwrap(), 1);
            assert!(apply_answer(&mut q, [1u8; 32], 0, 0, &A, 100).is_err());
        }

        #[test]
        fn test_closed_after_finalization_and_during_arbitration() {
            let mut q = question();
            apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();
            assert_eq!(
                apply_answer(&mut q, [2u8; 32], 4, 8, &B, 220).unwrap_err(),
                err(OracleError::NotOpen)
            );

            let mut q = question();
            q.is_pending_arbitration = true;
            assert_eq!(
                apply_answer(&mut q, [2u8; 32], 0, 8, &B, 150).unwrap_err(),
                err(OracleError::NotOpen)
            );
        }

        #[test]
        fn test_bond_overflow_reported() {
            let mut q = question();
            q.bond = u64::MAX / 2 + 1;
            assert_eq!(
                required_bond(&q).unwrap_err(),
                err(OracleError::ArithmeticOverflow)
            );
        }
    }

    mod commit_reveal {
        use super::*;

        #[test]
        fn test_reveal_window_bounds() {
            assert_eq!(reveal_window(120, 0, 3_600), 15);
            assert_eq!(reveal_window(120, 5, 3_600), 5);
            assert_eq!(reveal_window(1, 0, 3_600), 1);
            assert_eq!(reveal_window(86_400, 0, 3_600), 3_600);
            assert_eq!(reveal_window(86_400, 0, 0), 1);
        }

        #[test]
        fn test_commitment_becomes_best_until_revealed() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1234, 16, 0);
            let mut c = Commitment::default();
            apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100).unwrap();

            assert!(q.best_is_commitment);
            assert_eq!(q.best_answer_id, params.commitment_id);
            assert_eq!(q.best_answer(), EMPTY_ANSWER);
            assert_eq!(c.reveal_deadline, 115);
            assert_eq!(c.question, QUESTION_KEY);

            let became_best = apply_reveal(&mut q, &mut c, [7u8; 32], 1234, 16, 110).unwrap();
            assert!(became_best);
            assert!(!q.best_is_commitment);
            assert_eq!(q.best_answer_id, [7u8; 32]);
            assert_eq!(q.finalization_ts, 230);
            assert_eq!(c.effective_answer(), [7u8; 32]);
        }

        #[test]
        fn test_commitment_id_must_match() {
            let mut q = question();
            let mut params = sealed(&q, [7u8; 32], 1234, 16, 0);
            params.commitment_id = [0xAA; 32];
            let mut c = Commitment::default();
            assert_eq!(
                apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100)
                    .unwrap_err(),
                err(OracleError::InvalidParameters)
            );
        }

        #[test]
        fn test_existing_commitment_rejected() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1234, 16, 0);
            let mut c = Commitment {
                commitment_id: params.commitment_id,
                ..Default::default()
            };
            assert_eq!(
                apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100)
                    .unwrap_err(),
                err(OracleError::AlreadyExists)
            );
        }

        #[test]
        fn test_reveal_rejections() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1234, 16, 0);
            let mut c = Commitment::default();
            apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100).unwrap();

            assert_eq!(
                apply_reveal(&mut q, &mut c, [8u8; 32], 1234, 16, 101).unwrap_err(),
                err(OracleError::HashMismatch)
            );
            assert_eq!(
                apply_reveal(&mut q, &mut c, [7u8; 32], 1235, 16, 101).unwrap_err(),
                err(OracleError::HashMismatch)
            );
            assert_eq!(
                apply_reveal(&mut q, &mut c, [7u8; 32], 1234, 8, 101).unwrap_err(),
                err(OracleError::HashMismatch)
            );
            assert_eq!(
                apply_reveal(&mut q, &mut c, [7u8; 32], 1234, 16, 115).unwrap_err(),
                err(OracleError::DeadlineExpired)
            );

            apply_reveal(&mut q, &mut c, [7u8; 32], 1234, 16, 114).unwrap();
            assert_eq!(
                apply_reveal(&mut q, &mut c, [7u8; 32], 1234, 16, 114).unwrap_err(),
                err(OracleError::AlreadyRevealed)
            );
        }

        #[test]
        fn test_outbid_commitment_reveal_keeps_best() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1, 16, 0);
            let mut c = Commitment::default();
            apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100).unwrap();
            apply_answer(&mut q, [9u8; 32], 16, 32, &A, 101).unwrap();

            let became_best = apply_reveal(&mut q, &mut c, [7u8; 32], 1, 16, 102).unwrap();
            assert!(!became_best);
            assert_eq!(q.best_answer_id, [9u8; 32]);
            assert_eq!(q.finalization_ts, 221);
        }

        #[test]
        fn test_reveal_during_arbitration_keeps_clock_stopped() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1, 16, 0);
            let mut c = Commitment::default();
            apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100).unwrap();
            q.is_pending_arbitration = true;
            q.finalization_ts = 0;

            assert!(apply_reveal(&mut q, &mut c, [7u8; 32], 1, 16, 105).unwrap());
            assert_eq!(q.best_answer_id, [7u8; 32]);
            assert_eq!(q.finalization_ts, 0);
        }

        #[test]
        fn test_reveal_after_finalization_rejected() {
            let mut q = question();
            let params = sealed(&q, [7u8; 32], 1, 16, 0);
            let mut c = Commitment::default();
            apply_commitment(&mut q, QUESTION_KEY, &mut c, &params, &B, 3_600, 100).unwrap();
            c.reveal_deadline = i64::MAX;

            assert_eq!(
                apply_reveal(&mut q, &mut c, [7u8; 32], 1, 16, 220).unwrap_err(),
                err(OracleError::AlreadyFinalized)
            );
        }
    }

    mod final_answer {
        use super::*;

        fn expectations(q: &Question) -> AnswerExpectations {
            AnswerExpectations {
                content_hash: q.content_hash,
                arbitrator: q.arbitrator,
                min_step_delay: q.step_delay,
                min_bond: q.bond,
            }
        }

        #[test]
        fn test_final_answer_requires_finality() {
            let mut q = question();
            apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();
            let expected = expectations(&q);

            assert_eq!(
                final_answer_if_matches(&q, &expected, 219).unwrap_err(),
                err(OracleError::NotFinalized)
            );
            assert_eq!(
                final_answer_if_matches(&q, &expected, 220).unwrap(),
                [1u8; 32]
            );
        }

        #[test]
        fn test_final_answer_mismatched_expectations() {
            let mut q = question();
            apply_answer(&mut q, [1u8; 32], 0, 4, &A, 100).unwrap();

            let mut expected = expectations(&q);
            expected.min_bond = 5;
            assert!(final_answer_if_matches(&q, &expected, 220).is_err());

            let mut expected = expectations(&q);
            expected.min_step_delay = 121;
            assert!(final_answer_if_matches(&q, &expected, 220).is_err());

            let mut expected = expectations(&q);
            expected.arbitrator = B;
            assert!(final_answer_if_matches(&q, &expected, 220).is_err());

            let mut expected = expectations(&q);
            expected.content_hash = [1u8; 32];
            assert!(final_answer_if_matches(&q, &expected, 220).is_err());
        }
    }
}
