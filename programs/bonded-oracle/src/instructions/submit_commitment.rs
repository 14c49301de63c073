//! Post a sealed answer with a bond

use crate::events::AnswerSubmitted;
use crate::instructions::answer_helpers::{apply_commitment, CommitmentParams};
use crate::instructions::settlement_helpers::init_balance_if_needed;
use crate::state::{Commitment, OracleConfig, Question, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(commitment_id: [u8; 32])]
pub struct SubmitCommitment<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(
        mut,
        seeds = [b"question", question.question_id.as_ref()],
        bump = question.bump
    )]
    pub question: Account<'info, Question>,

    #[account(
        init_if_needed,
        payer = answerer,
        space = Commitment::SIZE,
        seeds = [b"commitment", commitment_id.as_ref()],
        bump
    )]
    pub commitment: Account<'info, Commitment>,

    #[account(
        init_if_needed,
        payer = answerer,
        space = UserBalance::SIZE,
        seeds = [b"balance", answerer.key().as_ref()],
        bump
    )]
    pub balance: Account<'info, UserBalance>,

    #[account(mut)]
    pub answerer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<SubmitCommitment>,
    commitment_id: [u8; 32],
    answer_hash: [u8; 32],
    max_previous_bond: u64,
    reveal_window_hint: u32,
    bond: u64,
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let answerer = ctx.accounts.answerer.key();
    let question_key = ctx.accounts.question.key();
    let now = Clock::get()?.unix_timestamp;
    let params = CommitmentParams {
        commitment_id,
        answer_hash,
        max_previous_bond,
        bond,
        reveal_window_hint,
    };

    let history_hash = apply_commitment(
        &mut ctx.accounts.question,
        question_key,
        &mut ctx.accounts.commitment,
        &params,
        &answerer,
        ctx.accounts.config.default_reveal_window,
        now,
    )?;
    ctx.accounts.commitment.bump = ctx.bumps.commitment;
    init_balance_if_needed(&mut ctx.accounts.balance, answerer, ctx.bumps.balance);

    anchor_lang::system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.answerer.to_account_info(),
                to: ctx.accounts.question.to_account_info(),
            },
        ),
        bond,
    )?;

    emit!(AnswerSubmitted {
        question_id: ctx.accounts.question.question_id,
        answer: commitment_id,
        history_hash,
        answerer,
        bond,
        is_commitment: true,
        timestamp: now,
    });

    Ok(())
}
