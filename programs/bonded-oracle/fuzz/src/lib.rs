//! Property-based fuzz testing library for the bonded oracle
//!
//! Drives the program's instruction helpers on in-memory accounts and checks
//! the history chain, bond escalation and payout invariants.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/submit_answer.rs"]
mod submit_answer_tests;

#[cfg(test)]
#[path = "../fuzz_targets/commit_reveal.rs"]
mod commit_reveal_tests;

#[cfg(test)]
#[path = "../fuzz_targets/report_verdict.rs"]
mod report_verdict_tests;

#[cfg(test)]
#[path = "../fuzz_targets/claim_winnings.rs"]
mod claim_winnings_tests;
