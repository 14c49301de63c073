//! Withdraw a pending arbitration and reopen the question

use crate::events::ArbitrationCancelled;
use crate::instructions::arbitration_helpers::{apply_arbitration_cancel, authorize_arbitrator};
use crate::state::{ArbitratorProfile, OracleConfig, Question};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CancelArbitration<'info> {
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

    pub arbitrator: Signer<'info>,
}

pub fn handler(ctx: Context<CancelArbitration>) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let signer = ctx.accounts.arbitrator.key();
    authorize_arbitrator(
        &ctx.accounts.question,
        ctx.accounts.arbitrator_profile.as_deref(),
        &signer,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let question = &mut ctx.accounts.question;
    let finalization_ts = apply_arbitration_cancel(question, now)?;

    emit!(ArbitrationCancelled {
        question_id: question.question_id,
        cancelled_by: signer,
        finalization_ts,
        timestamp: now,
    });

    Ok(())
}
