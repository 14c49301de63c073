//! Freeze a question for arbitration

use crate::events::ArbitrationRequested;
use crate::instructions::arbitration_helpers::{apply_arbitration_request, authorize_arbitrator};
use crate::state::{ArbitratorProfile, OracleConfig, Question};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct RequestArbitration<'info> {
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

    /// Needed only when a proxy signs
    #[account(
        seeds = [b"arbitrator", question.arbitrator.as_ref()],
        bump
    )]
    pub arbitrator_profile: Option<Account<'info, ArbitratorProfile>>,

    pub requester: Signer<'info>,
}

pub fn handler(ctx: Context<RequestArbitration>, max_previous_bond: u64) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let requester = ctx.accounts.requester.key();
    authorize_arbitrator(
        &ctx.accounts.question,
        ctx.accounts.arbitrator_profile.as_deref(),
        &requester,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let question = &mut ctx.accounts.question;
    apply_arbitration_request(question, max_previous_bond, now)?;

    emit!(ArbitrationRequested {
        question_id: question.question_id,
        requested_by: requester,
        bond: question.bond,
        timestamp: now,
    });

    Ok(())
}
