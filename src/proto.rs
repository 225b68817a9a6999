//! SSH agent protocol structures

pub mod code;
pub mod error;
pub mod message;
pub mod wire;

pub use self::code::*;
pub use self::error::{ProtoError as Error, ProtoResult as Result, *};
pub use self::message::*;
