//! Initialize the oracle configuration

use crate::errors::OracleError;
use crate::events::ConfigInitialized;
use crate::state::{OracleConfig, CURRENT_PROTOCOL_VERSION, MIN_SUPPORTED_VERSION};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init,
        payer = authority,
        space = OracleConfig::SIZE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeConfig>,
    min_bond: u64,
    min_bounty: u64,
    max_step_delay: u32,
    default_reveal_window: u32,
) -> Result<()> {
    require!(max_step_delay > 0, OracleError::InvalidParameters);
    require!(default_reveal_window > 0, OracleError::InvalidParameters);

    let config = &mut ctx.accounts.config;
    **config = OracleConfig {
        authority: ctx.accounts.authority.key(),
        min_bond,
        min_bounty,
        max_step_delay,
        default_reveal_window,
        protocol_version: CURRENT_PROTOCOL_VERSION,
        min_supported_version: MIN_SUPPORTED_VERSION,
        bump: ctx.bumps.config,
        ..Default::default()
    };

    emit!(ConfigInitialized {
        authority: config.authority,
        min_bond,
        min_bounty,
        max_step_delay,
        default_reveal_window,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
