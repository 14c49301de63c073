#![allow(unexpected_cfgs)]
//! Bonded Oracle
//!
//! A question-and-answer oracle secured by escalating bonds. Anyone may
//! answer a question by posting at least double the current bond; the last
//! unchallenged answer becomes final after the question's step delay. Sealed
//! (commit-reveal) answers and an external arbitrator cover front-running and
//! disputes. Every answer is folded into a per-question hash chain, and
//! payouts are settled by replaying that chain against the stored hash.

use anchor_lang::prelude::*;

declare_id!("HCeBE7ZTP6pmetgP9aFxWT5YqCxYvCLLn2Z9Gith5afr");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

#[program]
pub mod bonded_oracle {
    use super::*;

    /// Create the global oracle configuration.
    ///
    /// # Arguments
    /// * `min_bond` - Floor for the first bond on new questions
    /// * `min_bounty` - Minimum bounty left after the arbitrator fee
    /// * `max_step_delay` - Longest allowed step delay in seconds
    /// * `default_reveal_window` - Reveal window used when a commitment passes no hint
    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        min_bond: u64,
        min_bounty: u64,
        max_step_delay: u32,
        default_reveal_window: u32,
    ) -> Result<()> {
        instructions::initialize_config::handler(
            ctx,
            min_bond,
            min_bounty,
            max_step_delay,
            default_reveal_window,
        )
    }

    /// Update oracle parameters. Only the config authority can call this.
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        min_bond: Option<u64>,
        min_bounty: Option<u64>,
        max_step_delay: Option<u32>,
        default_reveal_window: Option<u32>,
    ) -> Result<()> {
        instructions::update_config::handler(
            ctx,
            min_bond,
            min_bounty,
            max_step_delay,
            default_reveal_window,
        )
    }

    /// Register a question template under the next sequential id.
    pub fn create_template(ctx: Context<CreateTemplate>, content: String) -> Result<()> {
        instructions::create_template::handler(ctx, content)
    }

    /// Publish the caller's question fee and optional proxy as an arbitrator.
    pub fn configure_arbitrator(
        ctx: Context<ConfigureArbitrator>,
        question_fee: u64,
        proxy: Option<Pubkey>,
    ) -> Result<()> {
        instructions::configure_arbitrator::handler(ctx, question_fee, proxy)
    }

    /// Ask a question and escrow its bounty.
    ///
    /// # Arguments
    /// * `question_id` - keccak(content_hash, arbitrator, step_delay, asker, nonce),
    ///   derived by the caller for the question PDA
    /// * `template_id` - Registered template the content fills in
    /// * `content` - Question text
    /// * `arbitrator` - Key allowed to settle disputes
    /// * `step_delay` - Seconds an unchallenged answer needs to become final
    /// * `opening_ts` - Answers are rejected before this time
    /// * `nonce` - Lets one asker repeat a question
    /// * `bounty` - Lamports paid to the winning answerer
    #[allow(clippy::too_many_arguments)]
    pub fn ask_question(
        ctx: Context<AskQuestion>,
        question_id: [u8; 32],
        template_id: u64,
        content: String,
        arbitrator: Pubkey,
        step_delay: u32,
        opening_ts: i64,
        nonce: u64,
        bounty: u64,
    ) -> Result<()> {
        instructions::ask_question::handler(
            ctx,
            question_id,
            template_id,
            content,
            arbitrator,
            step_delay,
            opening_ts,
            nonce,
            bounty,
        )
    }

    /// Add lamports to the bounty of a question that is not yet final.
    pub fn fund_bounty(ctx: Context<FundBounty>, amount: u64) -> Result<()> {
        instructions::fund_bounty::handler(ctx, amount)
    }

    /// Post a plaintext answer.
    ///
    /// # Arguments
    /// * `answer` - 32-byte answer value
    /// * `max_previous_bond` - The bond being outbid, as seen by the caller
    /// * `bond` - Lamports backing this answer, at least double the current bond
    pub fn submit_answer(
        ctx: Context<SubmitAnswer>,
        answer: [u8; 32],
        max_previous_bond: u64,
        bond: u64,
    ) -> Result<()> {
        instructions::submit_answer::handler(ctx, answer, max_previous_bond, bond)
    }

    /// Post a sealed answer, revealed later with `reveal_answer`.
    ///
    /// # Arguments
    /// * `commitment_id` - keccak(question_id, answer_hash, bond)
    /// * `answer_hash` - keccak(answer, nonce)
    /// * `max_previous_bond` - The bond being outbid, as seen by the caller
    /// * `reveal_window_hint` - Requested reveal window in seconds (0 = default)
    /// * `bond` - Lamports backing this answer
    pub fn submit_commitment(
        ctx: Context<SubmitCommitment>,
        commitment_id: [u8; 32],
        answer_hash: [u8; 32],
        max_previous_bond: u64,
        reveal_window_hint: u32,
        bond: u64,
    ) -> Result<()> {
        instructions::submit_commitment::handler(
            ctx,
            commitment_id,
            answer_hash,
            max_previous_bond,
            reveal_window_hint,
            bond,
        )
    }

    /// Reveal a sealed answer before its deadline.
    pub fn reveal_answer(
        ctx: Context<RevealAnswer>,
        commitment_id: [u8; 32],
        answer: [u8; 32],
        nonce: u64,
        bond: u64,
    ) -> Result<()> {
        instructions::reveal_answer::handler(ctx, commitment_id, answer, nonce, bond)
    }

    /// Freeze a question for arbitration. Arbitrator or its proxy only.
    pub fn request_arbitration(
        ctx: Context<RequestArbitration>,
        max_previous_bond: u64,
    ) -> Result<()> {
        instructions::request_arbitration::handler(ctx, max_previous_bond)
    }

    /// Withdraw a pending arbitration and restart the answer timer.
    pub fn cancel_arbitration(ctx: Context<CancelArbitration>) -> Result<()> {
        instructions::cancel_arbitration::handler(ctx)
    }

    /// Append the arbitrator's verdict and finalize the question.
    ///
    /// # Arguments
    /// * `last_history_hash` - History hash before the current tip entry
    /// * `last_answer_or_commitment_id` - Tip entry's answer or commitment id
    /// * `last_bond` - Tip entry's bond
    /// * `last_answerer` - Tip entry's submitter
    /// * `verdict_answer` - The arbitrator's answer
    pub fn report_verdict(
        ctx: Context<ReportVerdict>,
        last_history_hash: [u8; 32],
        last_answer_or_commitment_id: [u8; 32],
        last_bond: u64,
        last_answerer: Pubkey,
        verdict_answer: [u8; 32],
    ) -> Result<()> {
        instructions::report_verdict::handler(
            ctx,
            last_history_hash,
            last_answer_or_commitment_id,
            last_bond,
            last_answerer,
            verdict_answer,
        )
    }

    /// Replay (a chunk of) a finalized question's history, newest first, and
    /// credit bonds and bounty to the payees' balances.
    ///
    /// # Arguments
    /// * `hash_chain` - History hash after each entry, plus the hash before the
    ///   oldest entry when the chunk stops short of genesis
    /// * `address_chain` - Submitter of each entry
    /// * `bond_chain` - Bond of each entry
    /// * `answer_chain` - Answer or commitment id of each entry
    pub fn claim_winnings(
        ctx: Context<ClaimWinnings>,
        hash_chain: Vec<[u8; 32]>,
        address_chain: Vec<Pubkey>,
        bond_chain: Vec<u64>,
        answer_chain: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::claim_winnings::handler(
            ctx,
            hash_chain,
            address_chain,
            bond_chain,
            answer_chain,
        )
    }

    /// Withdraw credited lamports (0 = everything).
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Return the final answer if the question is final and matches the
    /// caller's expectations.
    pub fn final_answer_if_matches(
        ctx: Context<FinalAnswer>,
        content_hash: [u8; 32],
        arbitrator: Pubkey,
        min_step_delay: u32,
        min_bond: u64,
    ) -> Result<[u8; 32]> {
        instructions::final_answer::handler(ctx, content_hash, arbitrator, min_step_delay, min_bond)
    }
}
