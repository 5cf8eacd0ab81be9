//! Domain types for the range-vault workspace.
//!
//! This crate is the leaf of the workspace:
//! - Opaque identifiers for ledger accounts, tokens and position handles
//! - Value objects for tick ranges, spot prices and token amount pairs
//! - The fixed-point tick/price math library (Q64.96, 512-bit intermediates)
//! - Guard configuration shared by vault and adapter
//! - The error taxonomy and lifecycle event types

pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod math;
pub mod value_objects;

pub use config::GuardConfig;
pub use error::{
    ConfigurationError, MathError, ProtocolError, StateError, ValidationError, VaultError,
};
pub use ids::{AccountId, PositionId, TokenId};
pub use value_objects::{amount::TokenAmounts, price::SpotPrice, tick_range::TickRange};
