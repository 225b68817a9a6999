#![doc = include_str!("../README.md")]
#![deny(missing_debug_implementations)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod proto;

pub mod agent;
pub mod blocking;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod signer;

// re-export dependencies that are used in the public API of our crate
pub use ssh_encoding;
pub use ssh_key;
