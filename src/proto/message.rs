//! Agent protocol message structures.

mod identity;
mod request;
mod response;
mod sign;

pub use self::{identity::*, request::*, response::*, sign::*};
