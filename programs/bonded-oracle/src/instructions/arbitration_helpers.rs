//! Arbitration helpers.
//!
//! Used by `request_arbitration`, `cancel_arbitration` and `report_verdict`.
//! The verdict path re-authenticates the history tip the arbitrator names;
//! a tip that does not reproduce the stored history hash is rejected, so a
//! verdict can never re-attribute a bond to someone who did not post it.

use crate::errors::OracleError;
use crate::instructions::answer_helpers::record_entry;
use crate::state::{ArbitratorProfile, Commitment, EntryKind, Question};
use crate::utils::hashing;
use anchor_lang::prelude::*;

/// Signer must be the question's arbitrator or the proxy its profile names.
pub fn authorize_arbitrator(
    question: &Question,
    profile: Option<&ArbitratorProfile>,
    signer: &Pubkey,
) -> Result<()> {
    if question.arbitrator == *signer {
        return Ok(());
    }
    let authorized = profile
        .filter(|p| p.arbitrator == question.arbitrator)
        .is_some_and(|p| p.authorizes(signer));
    require!(authorized, OracleError::Unauthorized);
    Ok(())
}

/// Freezes the question for arbitration.
pub fn apply_arbitration_request(
    question: &mut Question,
    max_previous_bond: u64,
    now: i64,
) -> Result<()> {
    require!(!question.is_finalized(now), OracleError::NotOpen);
    require!(
        !question.is_pending_arbitration,
        OracleError::AlreadyPending
    );
    require!(question.bond > 0, OracleError::NoAnswer);
    require!(
        max_previous_bond == question.bond,
        OracleError::StaleBond
    );

    question.is_pending_arbitration = true;
    question.finalization_ts = 0;
    Ok(())
}

/// Withdraws a pending arbitration and restarts the answer timer.
/// Returns the new finalization time.
pub fn apply_arbitration_cancel(question: &mut Question, now: i64) -> Result<i64> {
    require!(
        question.is_pending_arbitration,
        OracleError::NotPendingArbitration
    );

    question.is_pending_arbitration = false;
    question.finalization_ts = now
        .checked_add(i64::from(question.step_delay))
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(question.finalization_ts)
}

/// The history tip as restated by the arbitrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryTip {
    /// History hash before the tip entry
    pub last_history_hash: [u8; 32],
    pub last_answer_or_commitment_id: [u8; 32],
    pub last_bond: u64,
    pub last_answerer: Pubkey,
}

/// Authenticates `tip` against the stored history hash and returns its kind.
///
/// # Errors
/// * `HistoryHashMismatch` unless the tip is a bonded entry that reproduces
///   `question.history_hash` and carries the current bond
pub fn verify_tip(question: &Question, tip: &HistoryTip) -> Result<EntryKind> {
    require!(
        tip.last_bond == question.bond,
        OracleError::HistoryHashMismatch
    );
    hashing::verify_link(
        &question.history_hash,
        &tip.last_history_hash,
        &tip.last_answer_or_commitment_id,
        tip.last_bond,
        &tip.last_answerer,
        &[EntryKind::Answer, EntryKind::Commitment],
    )
}

/// Appends the arbitrator's verdict and finalizes the question.
/// Returns the new history hash.
///
/// # Errors
/// * `NotPendingArbitration` unless arbitration was requested
/// * `HistoryHashMismatch` if the restated tip is not the real one
/// * `UnknownCommitment` if the tip is a commitment and its record is missing
/// * `RevealWindowOpen` if that commitment can still be revealed
pub fn apply_verdict(
    question: &mut Question,
    tip: &HistoryTip,
    tip_commitment: Option<&Commitment>,
    verdict_answer: [u8; 32],
    reporter: &Pubkey,
    now: i64,
) -> Result<[u8; 32]> {
    require!(
        question.is_pending_arbitration,
        OracleError::NotPendingArbitration
    );

    if verify_tip(question, tip)? == EntryKind::Commitment {
        let commitment = tip_commitment
            .filter(|c| c.commitment_id == tip.last_answer_or_commitment_id)
            .ok_or(OracleError::UnknownCommitment)?;
        require!(
            commitment.is_revealed || now >= commitment.reveal_deadline,
            OracleError::RevealWindowOpen
        );
    }

    let history_hash = record_entry(question, &verdict_answer, 0, reporter, EntryKind::Verdict);
    question.best_answer_id = verdict_answer;
    question.best_is_commitment = false;
    question.is_pending_arbitration = false;
    question.finalization_ts = now;
    Ok(history_hash)
}
