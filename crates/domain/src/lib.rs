//! # Courier Domain
//!
//! Value types shared by every Courier client tier.
//!
//! This crate contains:
//! - The [`Outcome`] success/failure type returned by every remote call
//! - The [`ClientError`] failure payload and its [`ErrorCode`] taxonomy
//! - Configuration error types
//! - Request/response shapes for the remote resources
//!
//! ## Architecture
//! - No dependencies on other Courier crates
//! - No I/O; only serialization and value logic

pub mod constants;
pub mod errors;
pub mod macros;
pub mod outcome;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use outcome::{wrap_fallible, Outcome};
pub use types::*;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
