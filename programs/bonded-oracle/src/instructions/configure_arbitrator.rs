//! Publish an arbitrator's question fee and proxy

use crate::events::ArbitratorConfigured;
use crate::instructions::settlement_helpers::init_balance_if_needed;
use crate::state::{ArbitratorProfile, OracleConfig, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ConfigureArbitrator<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(
        init_if_needed,
        payer = arbitrator,
        space = ArbitratorProfile::SIZE,
        seeds = [b"arbitrator", arbitrator.key().as_ref()],
        bump
    )]
    pub profile: Account<'info, ArbitratorProfile>,

    /// Receives question fees
    #[account(
        init_if_needed,
        payer = arbitrator,
        space = UserBalance::SIZE,
        seeds = [b"balance", arbitrator.key().as_ref()],
        bump
    )]
    pub balance: Account<'info, UserBalance>,

    #[account(mut)]
    pub arbitrator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<ConfigureArbitrator>,
    question_fee: u64,
    proxy: Option<Pubkey>,
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let arbitrator = ctx.accounts.arbitrator.key();
    let now = Clock::get()?.unix_timestamp;

    init_balance_if_needed(&mut ctx.accounts.balance, arbitrator, ctx.bumps.balance);

    let profile = &mut ctx.accounts.profile;
    profile.arbitrator = arbitrator;
    profile.question_fee = question_fee;
    // Naming yourself as proxy is the same as having none
    profile.proxy = proxy.filter(|p| *p != arbitrator);
    profile.updated_at = now;
    profile.bump = ctx.bumps.profile;

    emit!(ArbitratorConfigured {
        arbitrator,
        question_fee,
        proxy: profile.proxy,
        timestamp: now,
    });

    Ok(())
}
