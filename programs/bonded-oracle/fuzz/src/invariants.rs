//! Oracle invariant checks for fuzz testing

use anchor_lang::prelude::Pubkey;
use bonded_oracle::instructions::settlement_helpers::Payout;
use bonded_oracle::state::{EntryKind, Question};
use bonded_oracle::utils::hashing;

use crate::scenarios::HistoryEntry;

/// History chain invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainInvariantResult {
    Valid,
    /// Folding the recorded entries does not reproduce the stored hash
    TipMismatch { expected: [u8; 32], stored: [u8; 32] },
    /// An entry's `before` hash is not its predecessor's `after` hash
    BrokenLink { index: usize },
    /// A recorded entry reproduces its link under a different kind
    KindAmbiguity { index: usize },
}

/// Bond escalation invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BondInvariantResult {
    Valid,
    NotEscalated { previous: u64, bond: u64 },
    BondDecreased { before: u64, after: u64 },
}

/// Payout invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutInvariantResult {
    Valid,
    /// Paid out something other than the bounty plus every bond
    ConservationViolation { expected: u64, actual: u64 },
    /// Someone outside the history was paid
    UnknownPayee,
    /// A participant received a payout the rule does not owe them
    UnearnedPayout { amount: u64 },
}

/// Finality invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalityInvariantResult {
    Valid,
    FinalWhilePending,
    FinalWithoutAnswer,
}

// ============================================================================
// History Chain
// ============================================================================

/// Folding every entry from the genesis seed must land on the stored hash.
pub fn check_history_chain(question: &Question, entries: &[HistoryEntry]) -> ChainInvariantResult {
    let mut hash = hashing::history_seed(&question.question_id);
    for (index, entry) in entries.iter().enumerate() {
        if entry.before != hash {
            return ChainInvariantResult::BrokenLink { index };
        }
        hash = hashing::history_link(&hash, &entry.id, entry.bond, &entry.answerer, entry.kind);
        if hash != entry.after {
            return ChainInvariantResult::BrokenLink { index };
        }
    }
    if hash != question.history_hash {
        return ChainInvariantResult::TipMismatch {
            expected: hash,
            stored: question.history_hash,
        };
    }
    ChainInvariantResult::Valid
}

/// No entry may verify under a kind other than the one it was appended as.
pub fn check_kind_binding(entries: &[HistoryEntry]) -> ChainInvariantResult {
    for (index, entry) in entries.iter().enumerate() {
        let others = EntryKind::ALL.iter().filter(|k| **k != entry.kind);
        for kind in others {
            let relinked =
                hashing::history_link(&entry.before, &entry.id, entry.bond, &entry.answerer, *kind);
            if relinked == entry.after {
                return ChainInvariantResult::KindAmbiguity { index };
            }
        }
    }
    ChainInvariantResult::Valid
}

// ============================================================================
// Bonds
// ============================================================================

/// An accepted bond is at least double the one it outbids.
pub fn check_bond_escalation(previous: u64, bond: u64, min_bond: u64) -> BondInvariantResult {
    let required = previous.saturating_mul(2).max(min_bond.max(1));
    if bond < required {
        BondInvariantResult::NotEscalated { previous, bond }
    } else {
        BondInvariantResult::Valid
    }
}

/// The question's bond never goes down.
pub fn check_bond_monotonic(before: u64, after: u64) -> BondInvariantResult {
    if after < before {
        BondInvariantResult::BondDecreased { before, after }
    } else {
        BondInvariantResult::Valid
    }
}

// ============================================================================
// Payouts
// ============================================================================

/// A full replay pays out exactly the bounty plus every bond.
pub fn check_payout_conservation(bounty: u64, bonds: &[u64], paid: u64) -> PayoutInvariantResult {
    let expected = bonds.iter().fold(bounty, |acc, b| acc.saturating_add(*b));
    if paid != expected {
        PayoutInvariantResult::ConservationViolation {
            expected,
            actual: paid,
        }
    } else {
        PayoutInvariantResult::Valid
    }
}

/// Only submitters that appear in the history may be paid.
pub fn check_payees_in_history(
    payouts: &[Payout],
    entries: &[HistoryEntry],
) -> PayoutInvariantResult {
    let all_known = payouts
        .iter()
        .all(|p| entries.iter().any(|e| e.answerer == p.payee));
    if all_known {
        PayoutInvariantResult::Valid
    } else {
        PayoutInvariantResult::UnknownPayee
    }
}

/// `who` is owed nothing.
pub fn check_not_paid(payouts: &[Payout], who: &Pubkey) -> PayoutInvariantResult {
    let amount: u64 = payouts
        .iter()
        .filter(|p| p.payee == *who)
        .map(|p| p.amount)
        .sum();
    if amount > 0 {
        PayoutInvariantResult::UnearnedPayout { amount }
    } else {
        PayoutInvariantResult::Valid
    }
}

// ============================================================================
// Finality
// ============================================================================

/// A final question is never frozen for arbitration and always has a bonded answer.
pub fn check_finality(question: &Question, now: i64) -> FinalityInvariantResult {
    if !question.is_finalized(now) {
        return FinalityInvariantResult::Valid;
    }
    if question.is_pending_arbitration {
        return FinalityInvariantResult::FinalWhilePending;
    }
    if question.bond == 0 {
        return FinalityInvariantResult::FinalWithoutAnswer;
    }
    FinalityInvariantResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_escalation() {
        assert_eq!(check_bond_escalation(0, 1, 1), BondInvariantResult::Valid);
        assert_eq!(check_bond_escalation(4, 8, 1), BondInvariantResult::Valid);
        assert_eq!(
            check_bond_escalation(4, 7, 1),
            BondInvariantResult::NotEscalated { previous: 4, bond: 7 }
        );
        assert_eq!(
            check_bond_escalation(0, 4, 5),
            BondInvariantResult::NotEscalated { previous: 0, bond: 4 }
        );
    }

    #[test]
    fn test_bond_monotonic() {
        assert_eq!(check_bond_monotonic(4, 4), BondInvariantResult::Valid);
        assert_eq!(
            check_bond_monotonic(8, 4),
            BondInvariantResult::BondDecreased { before: 8, after: 4 }
        );
    }

    #[test]
    fn test_payout_conservation() {
        assert_eq!(
            check_payout_conservation(1_000, &[4, 8, 16], 1_028),
            PayoutInvariantResult::Valid
        );
        assert_eq!(
            check_payout_conservation(1_000, &[4, 8, 16], 1_044),
            PayoutInvariantResult::ConservationViolation {
                expected: 1_028,
                actual: 1_044
            }
        );
    }

    #[test]
    fn test_empty_question_is_never_final() {
        let q = Question::default();
        assert_eq!(check_finality(&q, i64::MAX), FinalityInvariantResult::Valid);
    }
}
