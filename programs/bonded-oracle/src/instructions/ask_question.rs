//! Ask a new question and escrow its bounty

use crate::errors::OracleError;
use crate::events::QuestionAsked;
use crate::instructions::lamport_transfer::transfer_lamports;
use crate::instructions::question_helpers::{
    arbitrator_fee, init_question, load_arbitrator_profile, validate_question, QuestionParams,
};
use crate::instructions::settlement_helpers::credit_balance;
use crate::state::{OracleConfig, Question, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(question_id: [u8; 32], template_id: u64, content: String, arbitrator: Pubkey)]
pub struct AskQuestion<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(
        init_if_needed,
        payer = asker,
        space = Question::SIZE,
        seeds = [b"question", question_id.as_ref()],
        bump
    )]
    pub question: Account<'info, Question>,

    /// CHECK: arbitrator profile PDA, read only when it holds a profile.
    /// Always required so the question fee cannot be skipped.
    #[account(
        seeds = [b"arbitrator", arbitrator.as_ref()],
        bump
    )]
    pub arbitrator_profile: UncheckedAccount<'info>,

    /// Required when the arbitrator charges a question fee
    #[account(
        mut,
        seeds = [b"balance", arbitrator.as_ref()],
        bump
    )]
    pub arbitrator_balance: Option<Account<'info, UserBalance>>,

    #[account(mut)]
    pub asker: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[allow(clippy::too_many_arguments)]
pub fn handler(
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
    check_version_compatible(&ctx.accounts.config)?;

    let asker = ctx.accounts.asker.key();
    let profile = load_arbitrator_profile(&ctx.accounts.arbitrator_profile)?;
    let fee = arbitrator_fee(profile.as_ref());

    let params = QuestionParams {
        template_id,
        content: &content,
        arbitrator,
        step_delay,
        opening_ts,
        nonce,
        bounty,
    };
    let terms = validate_question(&ctx.accounts.config, &params, &asker, fee)?;
    require!(
        terms.question_id == question_id,
        OracleError::InvalidParameters
    );

    init_question(
        &mut ctx.accounts.question,
        &ctx.accounts.config,
        &params,
        &terms,
        asker,
        ctx.bumps.question,
    )?;

    if bounty > 0 {
        anchor_lang::system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                anchor_lang::system_program::Transfer {
                    from: ctx.accounts.asker.to_account_info(),
                    to: ctx.accounts.question.to_account_info(),
                },
            ),
            bounty,
        )?;
    }

    if fee > 0 {
        let balance = ctx
            .accounts
            .arbitrator_balance
            .as_mut()
            .ok_or(OracleError::MissingBalanceAccount)?;
        transfer_lamports(
            &ctx.accounts.question.to_account_info(),
            &balance.to_account_info(),
            fee,
        )?;
        credit_balance(balance, fee)?;
    }

    let config = &mut ctx.accounts.config;
    config.total_questions = config
        .total_questions
        .checked_add(1)
        .ok_or(OracleError::ArithmeticOverflow)?;

    emit!(QuestionAsked {
        question_id,
        asker,
        template_id,
        content,
        content_hash: terms.content_hash,
        arbitrator,
        step_delay,
        opening_ts,
        nonce,
        bounty: terms.bounty,
        arbitrator_fee: fee,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
