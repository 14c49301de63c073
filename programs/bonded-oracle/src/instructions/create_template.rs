//! Register a question template

use crate::errors::OracleError;
use crate::events::TemplateCreated;
use crate::instructions::constants::MAX_TEMPLATE_CONTENT_LEN;
use crate::state::{OracleConfig, Template};
use crate::utils::hashing;
use crate::utils::validation::validate_content;
use crate::utils::version::check_version_compatible;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CreateTemplate<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, OracleConfig>,

    #[account(
        init,
        payer = creator,
        space = Template::SIZE,
        seeds = [b"template", config.next_template_id.to_le_bytes().as_ref()],
        bump
    )]
    pub template: Account<'info, Template>,

    #[account(mut)]
    pub creator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateTemplate>, content: String) -> Result<()> {
    check_version_compatible(&ctx.accounts.config)?;
    require!(
        validate_content(&content, MAX_TEMPLATE_CONTENT_LEN),
        OracleError::InvalidParameters
    );

    let clock = Clock::get()?;
    let config = &mut ctx.accounts.config;
    let template_id = config.next_template_id;
    config.next_template_id = template_id
        .checked_add(1)
        .ok_or(OracleError::ArithmeticOverflow)?;

    let template = &mut ctx.accounts.template;
    template.template_id = template_id;
    template.creator = ctx.accounts.creator.key();
    template.content_hash = hashing::template_hash(&content);
    template.created_at = clock.unix_timestamp;
    template.bump = ctx.bumps.template;

    emit!(TemplateCreated {
        template_id,
        creator: template.creator,
        content_hash: template.content_hash,
        content,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
