//! Events emitted by the bonded oracle
//!
//! Off-chain indexers rebuild each question's answer history from these
//! events; `claim_winnings` expects the history in exactly that form.

use anchor_lang::prelude::*;

/// Emitted when the oracle configuration is created
#[event]
pub struct ConfigInitialized {
    pub authority: Pubkey,
    pub min_bond: u64,
    pub min_bounty: u64,
    pub max_step_delay: u32,
    pub default_reveal_window: u32,
    pub timestamp: i64,
}

/// Emitted when the configuration authority changes parameters
#[event]
pub struct ConfigUpdated {
    pub authority: Pubkey,
    pub min_bond: u64,
    pub min_bounty: u64,
    pub max_step_delay: u32,
    pub default_reveal_window: u32,
    pub timestamp: i64,
}

/// Emitted when a template is registered
#[event]
pub struct TemplateCreated {
    pub template_id: u64,
    pub creator: Pubkey,
    pub content: String,
    pub content_hash: [u8; 32],
    pub timestamp: i64,
}

/// Emitted when an arbitrator publishes its fee or proxy
#[event]
pub struct ArbitratorConfigured {
    pub arbitrator: Pubkey,
    pub question_fee: u64,
    pub proxy: Option<Pubkey>,
    pub timestamp: i64,
}

/// Emitted when a question is asked
#[event]
pub struct QuestionAsked {
    pub question_id: [u8; 32],
    pub asker: Pubkey,
    pub template_id: u64,
    pub content: String,
    pub content_hash: [u8; 32],
    pub arbitrator: Pubkey,
    pub step_delay: u32,
    pub opening_ts: i64,
    pub nonce: u64,
    pub bounty: u64,
    pub arbitrator_fee: u64,
    pub timestamp: i64,
}

/// Emitted when a bounty is topped up
#[event]
pub struct BountyFunded {
    pub question_id: [u8; 32],
    pub funder: Pubkey,
    pub amount: u64,
    pub bounty: u64,
    pub timestamp: i64,
}

/// Emitted for every answer or commitment appended to a history.
/// `answer` holds the commitment id when `is_commitment` is set.
#[event]
pub struct AnswerSubmitted {
    pub question_id: [u8; 32],
    pub answer: [u8; 32],
    pub history_hash: [u8; 32],
    pub answerer: Pubkey,
    pub bond: u64,
    pub is_commitment: bool,
    pub timestamp: i64,
}

/// Emitted when a commitment is revealed
#[event]
pub struct AnswerRevealed {
    pub question_id: [u8; 32],
    pub commitment_id: [u8; 32],
    pub answerer: Pubkey,
    pub answer: [u8; 32],
    pub nonce: u64,
    pub bond: u64,
    pub timestamp: i64,
}

/// Emitted when arbitration is requested
#[event]
pub struct ArbitrationRequested {
    pub question_id: [u8; 32],
    pub requested_by: Pubkey,
    pub bond: u64,
    pub timestamp: i64,
}

/// Emitted when a pending arbitration is withdrawn
#[event]
pub struct ArbitrationCancelled {
    pub question_id: [u8; 32],
    pub cancelled_by: Pubkey,
    pub finalization_ts: i64,
    pub timestamp: i64,
}

/// Emitted when the arbitrator's verdict is appended
#[event]
pub struct VerdictReported {
    pub question_id: [u8; 32],
    pub answer: [u8; 32],
    pub history_hash: [u8; 32],
    pub reported_by: Pubkey,
    pub timestamp: i64,
}

/// Emitted for every chunk of a payout replay
#[event]
pub struct WinningsClaimed {
    pub question_id: [u8; 32],
    pub claimed_by: Pubkey,
    pub entries: u32,
    pub amount: u64,
    pub settled: bool,
    pub timestamp: i64,
}

/// Emitted when a participant withdraws lamports from its balance
#[event]
pub struct BalanceWithdrawn {
    pub owner: Pubkey,
    pub amount: u64,
    pub remaining: u64,
    pub timestamp: i64,
}
