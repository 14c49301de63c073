//! Top up an open question's bounty

use crate::events::BountyFunded;
use crate::instructions::question_helpers::apply_bounty_funding;
use crate::state::{OracleConfig, Question};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FundBounty<'info> {
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

    #[account(mut)]
    pub funder: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<FundBounty>, amount: u64) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let now = Clock::get()?.unix_timestamp;
    apply_bounty_funding(&mut ctx.accounts.question, amount, now)?;

    anchor_lang::system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.funder.to_account_info(),
                to: ctx.accounts.question.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(BountyFunded {
        question_id: ctx.accounts.question.question_id,
        funder: ctx.accounts.funder.key(),
        amount,
        bounty: ctx.accounts.question.bounty,
        timestamp: now,
    });

    Ok(())
}
