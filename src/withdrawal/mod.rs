//! Withdrawal lifecycle.
//!
//! # Data Flow
//! ```text
//! Withdrawer::withdraw(source, amount)
//!     → precondition.rs (address, amount, allowance ≥ amount, balance ≥ amount)
//!     → fees.rs (gas price + premium, gas estimate + margin, defaults on failure)
//!     → transaction.rs (fresh nonce, transferFrom build, local signing)
//!     → broadcast.rs (one raw send)
//!     → confirmation.rs (receipt polling with timeout)
//!     → outcome.rs (WithdrawalOutcome / (bool, String))
//! ```

pub mod amount;
pub mod broadcast;
pub mod confirmation;
pub mod fees;
pub mod orchestrator;
pub mod outcome;
pub mod precondition;
pub mod transaction;

pub use amount::{AmountError, TokenAmount};
pub use fees::{FeeEstimator, FeeQuote};
pub use orchestrator::Withdrawer;
pub use outcome::{into_message, WithdrawalError, WithdrawalOutcome, WithdrawalReceipt};
