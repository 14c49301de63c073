//! Read a question's final answer, guarded by the consumer's expectations

use crate::instructions::answer_helpers::{final_answer_if_matches, AnswerExpectations};
use crate::state::Question;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FinalAnswer<'info> {
    #[account(
        seeds = [b"question", question.question_id.as_ref()],
        bump = question.bump
    )]
    pub question: Account<'info, Question>,
}

pub fn handler(
    ctx: Context<FinalAnswer>,
    content_hash: [u8; 32],
    arbitrator: Pubkey,
    min_step_delay: u32,
    min_bond: u64,
) -> Result<[u8; 32]> {
    let expected = AnswerExpectations {
        content_hash,
        arbitrator,
        min_step_delay,
        min_bond,
    };
    final_answer_if_matches(
        &ctx.accounts.question,
        &expected,
        Clock::get()?.unix_timestamp,
    )
}
