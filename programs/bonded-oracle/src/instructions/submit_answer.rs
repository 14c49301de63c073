//! Post a plaintext answer with a bond

use crate::events::AnswerSubmitted;
use crate::instructions::answer_helpers::apply_answer;
use crate::instructions::settlement_helpers::init_balance_if_needed;
use crate::state::{OracleConfig, Question, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SubmitAnswer<'info> {
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

    /// Where this answerer's winnings will be credited
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
    ctx: Context<SubmitAnswer>,
    answer: [u8; 32],
    max_previous_bond: u64,
    bond: u64,
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let answerer = ctx.accounts.answerer.key();
    let now = Clock::get()?.unix_timestamp;
    let history_hash = apply_answer(
        &mut ctx.accounts.question,
        answer,
        max_previous_bond,
        bond,
        &answerer,
        now,
    )?;
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
        answer,
        history_hash,
        answerer,
        bond,
        is_commitment: false,
        timestamp: now,
    });

    Ok(())
}
