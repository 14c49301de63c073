//! Remaining-account handling for `claim_winnings`.
//!
//! A claim passes, in any order, the `Commitment` records for the commitment
//! entries of its chunk and the writable `UserBalance` of every payee.
//! Balances are matched against their PDA seeds before any lamports move.

use std::collections::HashSet;

use crate::errors::OracleError;
use crate::instructions::lamport_transfer::transfer_lamports;
use crate::instructions::settlement_helpers::{credit_balance, ChunkSettlement};
use crate::state::{Commitment, Question, UserBalance};
use anchor_lang::prelude::*;

/// Program accounts passed alongside a claim
#[derive(Debug, Default)]
pub struct ClaimAccounts {
    pub commitments: Vec<Commitment>,
    /// Position of each commitment in remaining_accounts
    pub commitment_indices: Vec<usize>,
    /// (index into remaining_accounts, decoded balance)
    pub balances: Vec<(usize, UserBalance)>,
}

/// A replayed commitment record and the balance its rent goes back to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RentRefund {
    /// Index of the commitment in remaining_accounts
    pub commitment_account: usize,
    /// Index into `ClaimAccounts::balances`
    pub balance_slot: usize,
}

/// Sorts remaining_accounts into commitments and balances.
///
/// # Errors
/// * `DuplicateAccount` if an account appears twice
/// * `InvalidAccountOwner` if an account is not owned by this program
/// * `UnknownCommitment` if a commitment belongs to another question
/// * `InvalidParameters` for a balance away from its PDA, or any other account
pub fn classify_accounts(
    remaining: &[AccountInfo<'_>],
    question_key: &Pubkey,
) -> Result<ClaimAccounts> {
    let mut seen: HashSet<Pubkey> = HashSet::new();
    let mut accounts = ClaimAccounts::default();

    for (index, info) in remaining.iter().enumerate() {
        require!(seen.insert(info.key()), OracleError::DuplicateAccount);
        require!(info.owner == &crate::ID, OracleError::InvalidAccountOwner);

        let data = info.try_borrow_data()?;
        if let Ok(commitment) = Commitment::try_deserialize(&mut &data[..]) {
            require!(
                commitment.question == *question_key,
                OracleError::UnknownCommitment
            );
            accounts.commitments.push(commitment);
            accounts.commitment_indices.push(index);
        } else if let Ok(balance) = UserBalance::try_deserialize(&mut &data[..]) {
            let expected = Pubkey::create_program_address(
                &[b"balance", balance.owner.as_ref(), &[balance.bump]],
                &crate::ID,
            )
            .map_err(|_| OracleError::InvalidParameters)?;
            require_keys_eq!(info.key(), expected, OracleError::InvalidParameters);
            accounts.balances.push((index, balance));
        } else {
            return err!(OracleError::InvalidParameters);
        }
    }

    Ok(accounts)
}

/// Sorts the claim's accounts, or returns `None` when the question is
/// already settled. A settled claim is a no-op and credits nobody.
pub fn prepare_claim(
    question: &Question,
    question_key: &Pubkey,
    remaining: &[AccountInfo<'_>],
) -> Result<Option<ClaimAccounts>> {
    if question.claim.settled {
        return Ok(None);
    }
    classify_accounts(remaining, question_key).map(Some)
}

/// Moves every payout from the question escrow into the payee's balance
/// account and records it on the decoded balance.
///
/// # Errors
/// * `MissingBalanceAccount` if a payee's balance was not supplied
/// * `InvalidParameters` if that balance is not writable
pub fn credit_payouts(
    question_info: &AccountInfo<'_>,
    remaining: &[AccountInfo<'_>],
    accounts: &mut ClaimAccounts,
    settlement: &ChunkSettlement,
) -> Result<()> {
    for payout in &settlement.payouts {
        let (index, balance) = accounts
            .balances
            .iter_mut()
            .find(|(_, b)| b.owner == payout.payee)
            .ok_or(OracleError::MissingBalanceAccount)?;
        let balance_info = &remaining[*index];
        require!(balance_info.is_writable, OracleError::InvalidParameters);

        transfer_lamports(question_info, balance_info, payout.amount)?;
        credit_balance(balance, payout.amount)?;
    }
    Ok(())
}

/// Pairs each commitment the chunk replayed with its committer's balance.
/// Records without a writable committer balance among the accounts stay open.
pub fn rent_refunds(
    remaining: &[AccountInfo<'_>],
    accounts: &ClaimAccounts,
    settlement: &ChunkSettlement,
) -> Vec<RentRefund> {
    settlement
        .consumed_commitments
        .iter()
        .filter_map(|id| {
            let position = accounts
                .commitments
                .iter()
                .position(|c| c.commitment_id == *id)?;
            let commitment_account = accounts.commitment_indices[position];
            let committer = accounts.commitments[position].answerer;
            let balance_slot = accounts
                .balances
                .iter()
                .position(|(i, b)| b.owner == committer && remaining[*i].is_writable)?;
            remaining[commitment_account]
                .is_writable
                .then_some(RentRefund {
                    commitment_account,
                    balance_slot,
                })
        })
        .collect()
}

/// Empties a commitment record into its committer's balance. Returns the
/// lamports refunded.
pub fn apply_rent_refund(
    remaining: &[AccountInfo<'_>],
    accounts: &mut ClaimAccounts,
    refund: &RentRefund,
) -> Result<u64> {
    let commitment_info = &remaining[refund.commitment_account];
    let (index, balance) = &mut accounts.balances[refund.balance_slot];
    let rent = commitment_info.lamports();

    transfer_lamports(commitment_info, &remaining[*index], rent)?;
    credit_balance(balance, rent)?;
    Ok(rent)
}

/// Writes the decoded balances back to their accounts.
pub fn store_balances(remaining: &[AccountInfo<'_>], accounts: &ClaimAccounts) -> Result<()> {
    for (index, balance) in &accounts.balances {
        let info = &remaining[*index];
        if !info.is_writable {
            continue;
        }
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        balance.try_serialize(&mut writer)?;
    }
    Ok(())
}
