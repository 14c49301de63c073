//! Instruction handlers for the bonded oracle

pub mod answer_helpers;
pub mod arbitration_helpers;
pub mod claim_helpers;
pub mod constants;
pub mod lamport_transfer;
pub mod question_helpers;
pub mod settlement_helpers;

pub mod ask_question;
pub mod cancel_arbitration;
pub mod claim_winnings;
pub mod configure_arbitrator;
pub mod create_template;
pub mod final_answer;
pub mod fund_bounty;
pub mod initialize_config;
pub mod report_verdict;
pub mod request_arbitration;
pub mod reveal_answer;
pub mod submit_answer;
pub mod submit_commitment;
pub mod update_config;
pub mod withdraw;

#[allow(ambiguous_glob_reexports)]
pub use ask_question::*;
#[allow(ambiguous_glob_reexports)]
pub use cancel_arbitration::*;
#[allow(ambiguous_glob_reexports)]
pub use claim_winnings::*;
#[allow(ambiguous_glob_reexports)]
pub use configure_arbitrator::*;
#[allow(ambiguous_glob_reexports)]
pub use create_template::*;
#[allow(ambiguous_glob_reexports)]
pub use final_answer::*;
#[allow(ambiguous_glob_reexports)]
pub use fund_bounty::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize_config::*;
#[allow(ambiguous_glob_reexports)]
pub use report_verdict::*;
#[allow(ambiguous_glob_reexports)]
pub use request_arbitration::*;
#[allow(ambiguous_glob_reexports)]
pub use reveal_answer::*;
#[allow(ambiguous_glob_reexports)]
pub use submit_answer::*;
#[allow(ambiguous_glob_reexports)]
pub use submit_commitment::*;
#[allow(ambiguous_glob_reexports)]
pub use update_config::*;
#[allow(ambiguous_glob_reexports)]
pub use withdraw::*;
