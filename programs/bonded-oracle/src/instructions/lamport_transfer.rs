//! Shared lamport transfer helper with checked arithmetic.
//!
//! Used to move lamports out of program-owned accounts (question escrow,
//! user balances), which the system program cannot debit.

use crate::errors::OracleError;
use anchor_lang::prelude::*;

/// Transfer `amount` lamports between two program-visible accounts.
///
/// Returns `Ok(())` immediately if `amount == 0`.
/// Returns `OracleError::ArithmeticOverflow` on underflow or overflow.
pub fn transfer_lamports(from: &AccountInfo<'_>, to: &AccountInfo<'_>, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    debit_lamports(from, amount)?;
    credit_lamports(to, amount)
}

/// Credit `amount` lamports to an account using checked arithmetic.
///
/// Use this when the source account has already been debited separately.
pub fn credit_lamports(to: &AccountInfo<'_>, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    **to.try_borrow_mut_lamports()? = balance;
    Ok(())
}

/// Debit `amount` lamports from an account using checked arithmetic.
///
/// Use this when the destination account will be credited separately.
pub fn debit_lamports(from: &AccountInfo<'_>, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    let balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(OracleError::ArithmeticOverflow)?;
    **from.try_borrow_mut_lamports()? = balance;
    Ok(())
}

/// Hands an emptied program account back to the system program.
///
/// The caller moves the lamports out first. Only valid inside the runtime,
/// which owns the data length header behind `resize`.
pub fn retire_account(info: &AccountInfo<'_>) -> Result<()> {
    require!(info.lamports() == 0, OracleError::InvalidParameters);
    info.assign(&System::id());
    info.resize(0)?;
    Ok(())
}
