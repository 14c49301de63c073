//! Replay a finalized question's history and credit the winners
//!
//! remaining_accounts carries the `Commitment` records for commitment
//! entries in the chunk and the writable `UserBalance` of every payee.
//! Replayed commitment records are closed into their committer's balance
//! when that balance is passed too.

use crate::errors::OracleError;
use crate::events::WinningsClaimed;
use crate::instructions::claim_helpers::{
    apply_rent_refund, credit_payouts, prepare_claim, rent_refunds, store_balances,
};
use crate::instructions::lamport_transfer::retire_account;
use crate::instructions::settlement_helpers::{settle_chunk, HistoryChunk};
use crate::state::{OracleConfig, Question};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ClaimWinnings<'info> {
    #[account(
        mut,
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

    pub claimant: Signer<'info>,
}

pub fn handler(
    ctx: Context<ClaimWinnings>,
    hash_chain: Vec<[u8; 32]>,
    address_chain: Vec<Pubkey>,
    bond_chain: Vec<u64>,
    answer_chain: Vec<[u8; 32]>,
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let question_key = ctx.accounts.question.key();
    let Some(mut accounts) =
        prepare_claim(&ctx.accounts.question, &question_key, ctx.remaining_accounts)?
    else {
        msg!("Winnings already claimed, nothing to do");
        return Ok(());
    };

    let chunk = HistoryChunk {
        hash_chain: &hash_chain,
        address_chain: &address_chain,
        bond_chain: &bond_chain,
        answer_chain: &answer_chain,
    };
    let now = Clock::get()?.unix_timestamp;
    let settlement = settle_chunk(
        &mut ctx.accounts.question,
        &chunk,
        &accounts.commitments,
        now,
    )?;

    let question_info = ctx.accounts.question.to_account_info();
    credit_payouts(
        &question_info,
        ctx.remaining_accounts,
        &mut accounts,
        &settlement,
    )?;

    let refunds = rent_refunds(ctx.remaining_accounts, &accounts, &settlement);
    for refund in &refunds {
        apply_rent_refund(ctx.remaining_accounts, &mut accounts, refund)?;
        retire_account(&ctx.remaining_accounts[refund.commitment_account])?;
    }
    if !refunds.is_empty() {
        msg!("Closed {} commitment records", refunds.len());
    }
    store_balances(ctx.remaining_accounts, &accounts)?;

    let total = settlement.total()?;
    let config = &mut ctx.accounts.config;
    config.total_claimed = config
        .total_claimed
        .checked_add(total)
        .ok_or(OracleError::ArithmeticOverflow)?;

    emit!(WinningsClaimed {
        question_id: ctx.accounts.question.question_id,
        claimed_by: ctx.accounts.claimant.key(),
        entries: address_chain.len() as u32,
        amount: total,
        settled: settlement.settled,
        timestamp: now,
    });

    Ok(())
}
