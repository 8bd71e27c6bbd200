//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → handed to BlockchainClient / Withdrawer at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at process start; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The private key is never part of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AgentConfig;
pub use schema::ChainConfig;
pub use schema::ConfirmationConfig;
pub use schema::FeeConfig;
pub use schema::ObservabilityConfig;
pub use schema::TokenConfig;
