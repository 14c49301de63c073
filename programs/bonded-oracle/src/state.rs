//! Account state structures for the bonded oracle

use anchor_lang::prelude::*;

// ============================================================================
// Size Constants
// ============================================================================

/// Size of hashes, question ids, answers and commitment ids
pub const HASH_SIZE: usize = 32;

/// The empty answer. Unrevealed commitments resolve to it.
pub const EMPTY_ANSWER: [u8; HASH_SIZE] = [0u8; HASH_SIZE];

/// Current protocol version
pub const CURRENT_PROTOCOL_VERSION: u8 = 1;

/// Minimum supported protocol version
pub const MIN_SUPPORTED_VERSION: u8 = 1;

/// Kind of an entry in a question's answer history.
///
/// The tag is folded into every history link, so a replay can only
/// reproduce a link with the kind that was actually appended.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EntryKind {
    /// Plaintext answer backed by a bond
    #[default]
    Answer = 0,
    /// Sealed answer (commitment id) backed by a bond
    Commitment = 1,
    /// Zero-bond answer appended by the arbitrator
    Verdict = 2,
}

impl EntryKind {
    /// Every kind, in the order a replay tries them
    pub const ALL: [EntryKind; 3] = [EntryKind::Answer, EntryKind::Commitment, EntryKind::Verdict];

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// Global oracle configuration
/// PDA seeds: ["config"]
#[account]
#[derive(InitSpace, Debug)]
pub struct OracleConfig {
    /// Authority allowed to update the configuration
    pub authority: Pubkey,
    /// Floor applied to the first bond on every new question (lamports)
    pub min_bond: u64,
    /// Minimum bounty left after the arbitrator fee (lamports)
    pub min_bounty: u64,
    /// Longest step delay a question may use (seconds)
    pub max_step_delay: u32,
    /// Reveal window used when a commitment does not pass a hint (seconds)
    pub default_reveal_window: u32,
    /// Id handed to the next registered template
    pub next_template_id: u64,
    /// Total questions asked
    pub total_questions: u64,
    /// Total lamports credited by settlement
    pub total_claimed: u64,
    // === Versioning fields ===
    /// Current protocol version (for upgrades)
    pub protocol_version: u8,
    /// Minimum supported version for backward compatibility
    pub min_supported_version: u8,
    /// Bump seed for PDA
    pub bump: u8,
    /// Reserved for backwards-compatible additions
    pub _reserved: [u8; 32],
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            authority: Pubkey::default(),
            min_bond: OracleConfig::DEFAULT_MIN_BOND,
            min_bounty: OracleConfig::DEFAULT_MIN_BOUNTY,
            max_step_delay: OracleConfig::DEFAULT_MAX_STEP_DELAY,
            default_reveal_window: OracleConfig::DEFAULT_REVEAL_WINDOW,
            next_template_id: 0,
            total_questions: 0,
            total_claimed: 0,
            protocol_version: CURRENT_PROTOCOL_VERSION,
            min_supported_version: MIN_SUPPORTED_VERSION,
            bump: 0,
            _reserved: [0u8; 32],
        }
    }
}

impl OracleConfig {
    pub const DEFAULT_MIN_BOND: u64 = 1;
    pub const DEFAULT_MIN_BOUNTY: u64 = 0;
    pub const DEFAULT_MAX_STEP_DELAY: u32 = 365 * 24 * 60 * 60; // 365 days
    pub const DEFAULT_REVEAL_WINDOW: u32 = 60 * 60; // 1 hour

    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        8 +  // min_bond
        8 +  // min_bounty
        4 +  // max_step_delay
        4 +  // default_reveal_window
        8 +  // next_template_id
        8 +  // total_questions
        8 +  // total_claimed
        1 +  // protocol_version
        1 +  // min_supported_version
        1 +  // bump
        32; // _reserved
}

/// Registered question template
/// PDA seeds: ["template", template_id (u64 LE)]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct Template {
    pub template_id: u64,
    pub creator: Pubkey,
    /// Keccak-256 of the template content
    pub content_hash: [u8; 32],
    pub created_at: i64,
    pub bump: u8,
}

impl Template {
    pub const SIZE: usize = 8 + // discriminator
        8 +  // template_id
        32 + // creator
        32 + // content_hash
        8 +  // created_at
        1; // bump
}

/// Arbitrator settings published by the arbitrator itself
/// PDA seeds: ["arbitrator", arbitrator]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct ArbitratorProfile {
    pub arbitrator: Pubkey,
    /// Taken out of every new bounty naming this arbitrator (lamports)
    pub question_fee: u64,
    /// Key allowed to request arbitration and report verdicts on its behalf
    pub proxy: Option<Pubkey>,
    pub updated_at: i64,
    pub bump: u8,
}

impl ArbitratorProfile {
    pub const SIZE: usize = 8 + // discriminator
        32 + // arbitrator
        8 +  // question_fee
        33 + // proxy (Option<Pubkey>)
        8 +  // updated_at
        1; // bump

    /// Whether `signer` may act as this arbitrator
    pub fn authorizes(&self, signer: &Pubkey) -> bool {
        self.arbitrator == *signer || self.proxy.as_ref() == Some(signer)
    }
}

/// Progress of a (possibly chunked) payout replay
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, Default, InitSpace)]
pub struct ClaimProgress {
    /// At least one claim chunk has been applied
    pub started: bool,
    /// The replay reached genesis; further claims are no-ops
    pub settled: bool,
    /// Hash the next chunk must start from
    pub cursor: [u8; 32],
    /// Newest correct bonded entry seen so far
    pub lineage_tip: Option<Pubkey>,
    /// Wrong bonds waiting for an older correct entry
    pub forfeit_pool: u64,
    /// Submitter of the newest entry, paid when nobody answered correctly
    pub fallback_payee: Option<Pubkey>,
    /// Lamports credited so far
    pub total_paid: u64,
}

/// A question and its answer auction
/// PDA seeds: ["question", question_id]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct Question {
    pub question_id: [u8; 32],
    /// keccak(template_id, opening_ts, content)
    pub content_hash: [u8; 32],
    pub arbitrator: Pubkey,
    pub asker: Pubkey,
    pub template_id: u64,
    /// Answers are rejected before this time
    pub opening_ts: i64,
    /// Seconds an unchallenged best answer needs to become final
    pub step_delay: u32,
    /// 0 while unanswered or pending arbitration
    pub finalization_ts: i64,
    pub is_pending_arbitration: bool,
    /// Lamports paid to the winning lineage tip
    pub bounty: u64,
    /// Best answer, or a commitment id while that commitment is unrevealed
    pub best_answer_id: [u8; 32],
    /// `best_answer_id` is a commitment id
    pub best_is_commitment: bool,
    /// Tip of the answer history chain
    pub history_hash: [u8; 32],
    /// Bond backing the current best answer
    pub bond: u64,
    /// Config `min_bond` captured when the question was asked
    pub min_bond: u64,
    pub claim: ClaimProgress,
    pub bump: u8,
}

impl Question {
    pub const SIZE: usize = 8 + // discriminator
        32 + // question_id
        32 + // content_hash
        32 + // arbitrator
        32 + // asker
        8 +  // template_id
        8 +  // opening_ts
        4 +  // step_delay
        8 +  // finalization_ts
        1 +  // is_pending_arbitration
        8 +  // bounty
        32 + // best_answer_id
        1 +  // best_is_commitment
        32 + // history_hash
        8 +  // bond
        8 +  // min_bond
        116 + // claim (1 + 1 + 32 + 33 + 8 + 33 + 8)
        1; // bump

    /// Whether the question exists (the PDA is created lazily)
    pub fn is_initialized(&self) -> bool {
        self.question_id != [0u8; 32]
    }

    pub fn is_finalized(&self, now: i64) -> bool {
        !self.is_pending_arbitration && self.finalization_ts != 0 && self.finalization_ts <= now
    }

    /// Best answer as it would resolve right now. An unrevealed commitment
    /// at the top resolves to the empty answer.
    pub fn best_answer(&self) -> [u8; 32] {
        if self.best_is_commitment {
            EMPTY_ANSWER
        } else {
            self.best_answer_id
        }
    }
}

/// Sealed answer awaiting reveal
/// PDA seeds: ["commitment", commitment_id]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct Commitment {
    /// keccak(question_id, answer_hash, bond)
    pub commitment_id: [u8; 32],
    /// Question account this commitment was posted on
    pub question: Pubkey,
    /// keccak(answer, nonce)
    pub answer_hash: [u8; 32],
    pub bond: u64,
    pub answerer: Pubkey,
    pub reveal_deadline: i64,
    pub is_revealed: bool,
    pub revealed_answer: [u8; 32],
    pub bump: u8,
}

impl Commitment {
    pub const SIZE: usize = 8 + // discriminator
        32 + // commitment_id
        32 + // question
        32 + // answer_hash
        8 +  // bond
        32 + // answerer
        8 +  // reveal_deadline
        1 +  // is_revealed
        32 + // revealed_answer
        1; // bump

    pub fn is_initialized(&self) -> bool {
        self.commitment_id != [0u8; 32]
    }

    /// Answer this commitment contributes to a replay
    pub fn effective_answer(&self) -> [u8; 32] {
        if self.is_revealed {
            self.revealed_answer
        } else {
            EMPTY_ANSWER
        }
    }
}

/// Claimable lamports of one participant
/// PDA seeds: ["balance", owner]
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct UserBalance {
    pub owner: Pubkey,
    /// Claimable lamports held on top of the rent reserve
    pub amount: u64,
    pub total_credited: u64,
    pub total_withdrawn: u64,
    pub bump: u8,
}

impl UserBalance {
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner
        8 +  // amount
        8 +  // total_credited
        8 +  // total_withdrawn
        1; // bump
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: SIZE should equal INIT_SPACE (borsh serialized) + 8-byte discriminator.
    macro_rules! test_size_constant {
        ($struct:ty) => {
            assert_eq!(
                <$struct>::SIZE,
                <$struct as anchor_lang::Space>::INIT_SPACE + 8,
                concat!(stringify!($struct), "::SIZE mismatch with INIT_SPACE")
            );
        };
    }

    #[test]
    fn test_oracle_config_size() {
        test_size_constant!(OracleConfig);
        assert_eq!(OracleConfig::SIZE, 123);
    }

    #[test]
    fn test_template_size() {
        test_size_constant!(Template);
    }

    #[test]
    fn test_arbitrator_profile_size() {
        test_size_constant!(ArbitratorProfile);
    }

    #[test]
    fn test_question_size() {
        test_size_constant!(Question);
        assert_eq!(ClaimProgress::INIT_SPACE, 116);
    }

    #[test]
    fn test_commitment_size() {
        test_size_constant!(Commitment);
    }

    #[test]
    fn test_user_balance_size() {
        test_size_constant!(UserBalance);
    }

    #[test]
    fn test_entry_kind_tags_are_distinct() {
        let tags: Vec<u8> = EntryKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags, vec![0, 1, 2]);
    }

    #[test]
    fn test_question_finality() {
        let mut q = Question::default();
        assert!(!q.is_finalized(100));

        q.finalization_ts = 100;
        assert!(!q.is_finalized(99));
        assert!(q.is_finalized(100));

        q.is_pending_arbitration = true;
        assert!(!q.is_finalized(200));
    }

    #[test]
    fn test_best_answer_hides_unrevealed_commitment() {
        let q = Question {
            best_answer_id: [7u8; 32],
            best_is_commitment: true,
            ..Default::default()
        };
        assert_eq!(q.best_answer(), EMPTY_ANSWER);
    }

    #[test]
    fn test_arbitrator_proxy_authorization() {
        let arbitrator = Pubkey::new_from_array([1u8; 32]);
        let proxy = Pubkey::new_from_array([2u8; 32]);
        let stranger = Pubkey::new_from_array([3u8; 32]);

        let mut profile = ArbitratorProfile {
            arbitrator,
            ..Default::default()
        };
        assert!(profile.authorizes(&arbitrator));
        assert!(!profile.authorizes(&proxy));

        profile.proxy = Some(proxy);
        assert!(profile.authorizes(&proxy));
        assert!(!profile.authorizes(&stranger));
    }
}
