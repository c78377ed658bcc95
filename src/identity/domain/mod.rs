//! Domain model for caller identity.

mod actor;
mod error;

pub use actor::{Actor, Credentials};
pub use error::IdentityError;
