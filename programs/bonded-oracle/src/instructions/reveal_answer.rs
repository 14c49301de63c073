//! Reveal a sealed answer

use crate::events::AnswerRevealed;
use crate::instructions::answer_helpers::{apply_reveal, load_commitment, store_commitment};
use crate::state::{OracleConfig, Question};
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(commitment_id: [u8; 32])]
pub struct RevealAnswer<'info> {
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

    /// CHECK: commitment PDA, deserialized by the handler so a missing
    /// record surfaces as `UnknownCommitment`
    #[account(
        mut,
        seeds = [b"commitment", commitment_id.as_ref()],
        bump
    )]
    pub commitment: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<RevealAnswer>,
    commitment_id: [u8; 32],
    answer: [u8; 32],
    nonce: u64,
    bond: u64,
) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;

    let question_key = ctx.accounts.question.key();
    let now = Clock::get()?.unix_timestamp;
    let mut commitment = load_commitment(&ctx.accounts.commitment, &question_key)?;

    let became_best = apply_reveal(
        &mut ctx.accounts.question,
        &mut commitment,
        answer,
        nonce,
        bond,
        now,
    )?;
    store_commitment(&ctx.accounts.commitment, &commitment)?;

    if became_best {
        msg!("Revealed answer is now the best answer");
    }

    emit!(AnswerRevealed {
        question_id: ctx.accounts.question.question_id,
        commitment_id,
        answerer: commitment.answerer,
        answer,
        nonce,
        bond,
        timestamp: now,
    });

    Ok(())
}
