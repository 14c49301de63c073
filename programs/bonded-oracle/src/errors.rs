//! Error codes for the bonded oracle

use anchor_lang::prelude::*;

#[error_code]
pub enum OracleError {
    // Question errors (6000-6099)
    #[msg("Invalid parameters")]
    InvalidParameters,

    #[msg("Account already exists")]
    AlreadyExists,

    #[msg("Template not found")]
    InvalidTemplate,

    #[msg("Question is already finalized")]
    AlreadyFinalized,

    // Answer and bond errors (6100-6199)
    #[msg("Question is not open for answers")]
    NotOpen,

    #[msg("Question is already pending arbitration")]
    AlreadyPending,

    #[msg("Stated previous bond does not match the current bond")]
    StaleBond,

    #[msg("Bond is below the required minimum")]
    InsufficientBond,

    #[msg("Question has no answer yet")]
    NoAnswer,

    // Commitment errors (6200-6299)
    #[msg("Commitment not found")]
    UnknownCommitment,

    #[msg("Commitment already revealed")]
    AlreadyRevealed,

    #[msg("Reveal deadline has passed")]
    DeadlineExpired,

    #[msg("Revealed answer does not match the commitment")]
    HashMismatch,

    // Arbitration errors (6300-6399)
    #[msg("Signer is not the arbitrator or its proxy")]
    Unauthorized,

    #[msg("Question is not pending arbitration")]
    NotPendingArbitration,

    #[msg("Supplied history does not reproduce the stored history hash")]
    HistoryHashMismatch,

    #[msg("Latest commitment can still be revealed")]
    RevealWindowOpen,

    // Settlement errors (6400-6499)
    #[msg("Question is not finalized")]
    NotFinalized,

    #[msg("Winnings already claimed")]
    AlreadyClaimed,

    #[msg("Payee balance account missing from remaining accounts")]
    MissingBalanceAccount,

    #[msg("Insufficient balance")]
    InsufficientBalance,

    // General errors (6500-6599)
    #[msg("Account is not owned by this program")]
    InvalidAccountOwner,

    #[msg("Duplicate account in remaining accounts")]
    DuplicateAccount,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Only the config authority can perform this action")]
    UnauthorizedConfigUpdate,

    // Version errors (6600-6699)
    #[msg("Protocol version mismatch")]
    VersionMismatchProtocol,

    #[msg("Account version too old, migration required")]
    AccountVersionTooOld,

    #[msg("Account version too new, program upgrade required")]
    AccountVersionTooNew,
}
