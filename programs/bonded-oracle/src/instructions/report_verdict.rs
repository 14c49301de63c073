//! Report the arbitrator's verdict
//!
//! The arbitrator restates the current history tip. It must reproduce the
//! stored history hash, which pins the tip's answerer and bond to what was
//! actually posted.

use crate::events::VerdictReported;
use crate::instructions::answer_helpers::try_load_commitment;
use crate::instructions::arbitration_helpers::{apply_verdict, authorize_arbitrator, HistoryTip};
use crate::instructions::settlement_helpers::init_balance_if_needed;
use crate::state::{ArbitratorProfile, OracleConfig, Question, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(last_history_hash: [u8; 32], last_answer_or_commitment_id: [u8; 32])]
pub struct ReportVerdict<'info> {
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
        seeds = [b"arbitrator", question.arbitrator.as_ref()],
        bump
    )]
    pub arbitrator_profile: Option<Account<'info, ArbitratorProfile>>,

    /// CHECK: commitment PDA of the tip; required when the tip is a commitment
    #[account(
        seeds = [b"commitment", last_answer_or_commitment_id.as_ref()],
        bump
    )]
    pub tip_commitment: Option<UncheckedAccount<'info>>,

    /// Receives the payout when no bonded answer matches the verdict
    #[account(
        init_if_needed,
        payer = reporter,
        space = UserBalance::SIZE,
        seeds = [b"balance", reporter.key().as_ref()],
        bump
    )]
    pub balance: Account<'info, UserBalance>,

    #[account(mut)]
    pub reporter: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<ReportVerdict>,
    last_history_hash: [u8; 32],
    last_answer_or_commitment_id: [u8; 32],
    last_bond: u64,
    last_answerer: Pubkey,
    verdict_answer: [u8; 32],
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let reporter = ctx.accounts.reporter.key();
    authorize_arbitrator(
        &ctx.accounts.question,
        ctx.accounts.arbitrator_profile.as_deref(),
        &reporter,
    )?;

    let question_key = ctx.accounts.question.key();
    let tip_commitment = match ctx.accounts.tip_commitment.as_ref() {
        Some(info) => try_load_commitment(info)?.filter(|c| c.question == question_key),
        None => None,
    };

    let tip = HistoryTip {
        last_history_hash,
        last_answer_or_commitment_id,
        last_bond,
        last_answerer,
    };
    let now = Clock::get()?.unix_timestamp;
    let history_hash = apply_verdict(
        &mut ctx.accounts.question,
        &tip,
        tip_commitment.as_ref(),
        verdict_answer,
        &reporter,
        now,
    )?;
    init_balance_if_needed(&mut ctx.accounts.balance, reporter, ctx.bumps.balance);

    emit!(VerdictReported {
        question_id: ctx.accounts.question.question_id,
        answer: verdict_answer,
        history_hash,
        reported_by: reporter,
        timestamp: now,
    });

    Ok(())
}
