//! Withdraw credited lamports

use crate::errors::OracleError;
use crate::events::BalanceWithdrawn;
use crate::instructions::lamport_transfer::transfer_lamports;
use crate::instructions::settlement_helpers::debit_balance;
use crate::state::{OracleConfig, UserBalance};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(
        mut,
        seeds = [b"balance", owner.key().as_ref()],
        bump = balance.bump,
        has_one = owner @ OracleError::Unauthorized
    )]
    pub balance: Account<'info, UserBalance>,

    #[account(mut)]
    pub owner: Signer<'info>,
}

/// `amount == 0` withdraws the whole balance. The rent reserve of the
/// balance account is never touched.
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let taken = debit_balance(&mut ctx.accounts.balance, amount)?;
    transfer_lamports(
        &ctx.accounts.balance.to_account_info(),
        &ctx.accounts.owner.to_account_info(),
        taken,
    )?;

    emit!(BalanceWithdrawn {
        owner: ctx.accounts.owner.key(),
        amount: taken,
        remaining: ctx.accounts.balance.amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
