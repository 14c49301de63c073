//! Shared constants for instruction handlers

// ============================================================================
// Bonding Constants
// ============================================================================

/// Each new answer must post at least this multiple of the current bond
pub const BOND_MULTIPLIER: u64 = 2;

/// Absolute floor for the first bond on a question, whatever the config says
pub const MIN_FIRST_BOND: u64 = 1;

// ============================================================================
// Commit-Reveal Constants
// ============================================================================

/// A reveal window may use at most `step_delay / REVEAL_WINDOW_RATIO`
pub const REVEAL_WINDOW_RATIO: u32 = 8;

// ============================================================================
// Content Constants
// ============================================================================

/// Maximum question content length in bytes
pub const MAX_QUESTION_CONTENT_LEN: usize = 600;

/// Maximum template content length in bytes
pub const MAX_TEMPLATE_CONTENT_LEN: usize = 800;

// ============================================================================
// Settlement Constants
// ============================================================================

/// Maximum history entries replayed by one `claim_winnings` call
pub const MAX_CLAIM_ENTRIES: usize = 32;
