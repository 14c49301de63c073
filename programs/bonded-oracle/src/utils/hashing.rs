//! Keccak-256 derivations for question ids, commitments and the answer
//! history chain.
//!
//! Integers are encoded big-endian at their native width, keys as their
//! 32 raw bytes. Off-chain clients must use the same layout to derive
//! PDAs and to rebuild history chains for `claim_winnings`.

use anchor_lang::prelude::*;
use sha3::{Digest, Keccak256};

use crate::errors::OracleError;
use crate::state::{EntryKind, HASH_SIZE};

fn keccak(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest);
    out
}

/// Hash of a registered template's content
pub fn template_hash(content: &str) -> [u8; 32] {
    keccak(&[content.as_bytes()])
}

pub fn content_hash(template_id: u64, opening_ts: i64, content: &str) -> [u8; 32] {
    keccak(&[
        &template_id.to_be_bytes()[..],
        &opening_ts.to_be_bytes()[..],
        content.as_bytes(),
    ])
}

pub fn question_id(
    content_hash: &[u8; 32],
    arbitrator: &Pubkey,
    step_delay: u32,
    asker: &Pubkey,
    nonce: u64,
) -> [u8; 32] {
    keccak(&[
        &content_hash[..],
        arbitrator.as_ref(),
        &step_delay.to_be_bytes()[..],
        asker.as_ref(),
        &nonce.to_be_bytes()[..],
    ])
}

/// Genesis value of a question's history chain
pub fn history_seed(question_id: &[u8; 32]) -> [u8; 32] {
    keccak(&[&question_id[..]])
}

pub fn answer_hash(answer: &[u8; 32], nonce: u64) -> [u8; 32] {
    keccak(&[&answer[..], &nonce.to_be_bytes()[..]])
}

pub fn commitment_id(question_id: &[u8; 32], answer_hash: &[u8; 32], bond: u64) -> [u8; 32] {
    keccak(&[
        &question_id[..],
        &answer_hash[..],
        &bond.to_be_bytes()[..],
    ])
}

/// One link of the history chain: the hash after appending an entry to `before`
pub fn history_link(
    before: &[u8; 32],
    answer_or_commitment_id: &[u8; 32],
    bond: u64,
    answerer: &Pubkey,
    kind: EntryKind,
) -> [u8; 32] {
    keccak(&[
        &before[..],
        &answer_or_commitment_id[..],
        &bond.to_be_bytes()[..],
        answerer.as_ref(),
        &[kind.tag()][..],
    ])
}

/// Finds the kind under which `(before, id, bond, answerer)` reproduces `after`.
///
/// # Errors
/// * `HistoryHashMismatch` if no kind in `kinds` reproduces the link
pub fn verify_link(
    after: &[u8; 32],
    before: &[u8; 32],
    answer_or_commitment_id: &[u8; 32],
    bond: u64,
    answerer: &Pubkey,
    kinds: &[EntryKind],
) -> Result<EntryKind> {
    kinds
        .iter()
        .copied()
        .find(|kind| history_link(before, answer_or_commitment_id, bond, answerer, *kind) == *after)
        .ok_or_else(|| OracleError::HistoryHashMismatch.into())
}
