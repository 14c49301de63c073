//! Update oracle parameters (config authority only)
//!
//! Questions snapshot `min_bond` when asked; changes apply to new questions.

use crate::errors::OracleError;
use crate::events::ConfigUpdated;
use crate::state::OracleConfig;
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ OracleError::UnauthorizedConfigUpdate
    )]
    pub config: Account<'info, OracleConfig>,

    pub authority: Signer<'info>,
}

pub fn handler(
    ctx: Context<UpdateConfig>,
    min_bond: Option<u64>,
    min_bounty: Option<u64>,
    max_step_delay: Option<u32>,
    default_reveal_window: Option<u32>,
) -> Result<()> {
    let config = &mut ctx.accounts.config;
    check_version_compatible(config)?;

    if let Some(min_bond) = min_bond {
        config.min_bond = min_bond;
    }
    if let Some(min_bounty) = min_bounty {
        config.min_bounty = min_bounty;
    }
    if let Some(max_step_delay) = max_step_delay {
        require!(max_step_delay > 0, OracleError::InvalidParameters);
        config.max_step_delay = max_step_delay;
    }
    if let Some(default_reveal_window) = default_reveal_window {
        require!(default_reveal_window > 0, OracleError::InvalidParameters);
        config.default_reveal_window = default_reveal_window;
    }

    emit!(ConfigUpdated {
        authority: config.authority,
        min_bond: config.min_bond,
        min_bounty: config.min_bounty,
        max_step_delay: config.max_step_delay,
        default_reveal_window: config.default_reveal_window,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
