//! Question creation and bounty helpers.
//!
//! Used by `ask_question` and `fund_bounty`. Everything here is a plain
//! function over account structs so the rules can be exercised without a
//! runtime.

use crate::errors::OracleError;
use crate::instructions::constants::MAX_QUESTION_CONTENT_LEN;
use crate::state::{ArbitratorProfile, OracleConfig, Question, EMPTY_ANSWER};
use crate::utils::hashing;
use crate::utils::validation::validate_content;
use anchor_lang::prelude::*;

/// Caller-supplied fields of a new question
#[derive(Clone, Debug)]
pub struct QuestionParams<'a> {
    pub template_id: u64,
    pub content: &'a str,
    pub arbitrator: Pubkey,
    pub step_delay: u32,
    pub opening_ts: i64,
    pub nonce: u64,
    pub bounty: u64,
}

/// Result of validating a new question
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionTerms {
    pub content_hash: [u8; 32],
    pub question_id: [u8; 32],
    /// Bounty left after the arbitrator fee
    pub bounty: u64,
    pub arbitrator_fee: u64,
}

/// Arbitrator fee for a question, zero when the arbitrator has no profile
pub fn arbitrator_fee(profile: Option<&ArbitratorProfile>) -> u64 {
    profile.map_or(0, |p| p.question_fee)
}

/// Reads the arbitrator profile PDA; `None` while the arbitrator has none.
pub fn load_arbitrator_profile(info: &AccountInfo<'_>) -> Result<Option<ArbitratorProfile>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    let profile = ArbitratorProfile::try_deserialize(&mut &data[..])?;
    Ok(Some(profile))
}

/// Validates question parameters and derives the question id.
///
/// # Errors
/// * `InvalidTemplate` if the template id was never registered
/// * `InvalidParameters` on a bad step delay, bad content, or a bounty that
///   does not cover the arbitrator fee plus `config.min_bounty`
pub fn validate_question(
    config: &OracleConfig,
    params: &QuestionParams<'_>,
    asker: &Pubkey,
    fee: u64,
) -> Result<QuestionTerms> {
    require!(
        params.template_id < config.next_template_id,
        OracleError::InvalidTemplate
    );
    require!(
        params.step_delay > 0 && params.step_delay <= config.max_step_delay,
        OracleError::InvalidParameters
    );
    require!(
        validate_content(params.content, MAX_QUESTION_CONTENT_LEN),
        OracleError::InvalidParameters
    );

    let bounty = params
        .bounty
        .checked_sub(fee)
        .ok_or(OracleError::InvalidParameters)?;
    require!(bounty >= config.min_bounty, OracleError::InvalidParameters);

    let content_hash = hashing::content_hash(params.template_id, params.opening_ts, params.content);
    let question_id = hashing::question_id(
        &content_hash,
        &params.arbitrator,
        params.step_delay,
        asker,
        params.nonce,
    );

    Ok(QuestionTerms {
        content_hash,
        question_id,
        bounty,
        arbitrator_fee: fee,
    })
}

/// Populates a freshly allocated question account.
pub fn init_question(
    question: &mut Question,
    config: &OracleConfig,
    params: &QuestionParams<'_>,
    terms: &QuestionTerms,
    asker: Pubkey,
    bump: u8,
) -> Result<()> {
    require!(!question.is_initialized(), OracleError::AlreadyExists);

    question.question_id = terms.question_id;
    question.content_hash = terms.content_hash;
    question.arbitrator = params.arbitrator;
    question.asker = asker;
    question.template_id = params.template_id;
    question.opening_ts = params.opening_ts;
    question.step_delay = params.step_delay;
    question.finalization_ts = 0;
    question.is_pending_arbitration = false;
    question.bounty = terms.bounty;
    question.best_answer_id = EMPTY_ANSWER;
    question.best_is_commitment = false;
    question.history_hash = hashing::history_seed(&terms.question_id);
    question.bond = 0;
    question.min_bond = config.min_bond;
    question.claim = Default::default();
    question.bump = bump;
    Ok(())
}

/// Adds `amount` to an unfinalized question's bounty.
pub fn apply_bounty_funding(question: &mut Question, amount: u64, now: i64) -> Result<()> {
    require!(amount > 0, OracleError::InvalidParameters);
    require!(!question.is_finalized(now), OracleError::AlreadyFinalized);

    question.bounty = question
        .bounty
        .checked_add(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    Ok(())
}
