//! Caller identity resolution.
//!
//! Turns raw request credentials (a per-project API key or an
//! already-verified user session) into the tagged [`domain::Actor`] value
//! the core operates on. Resolution is an explicit, required step: an
//! absent or unknown credential fails with `AuthenticationRequired` before
//! any core operation runs, and the core never substitutes a default
//! identity.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
