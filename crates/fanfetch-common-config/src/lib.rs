//! Configuration for fanfetch.
//!
//! Everything configurable comes from the process environment, optionally
//! seeded from `.env` files.

pub mod credentials;
pub mod env;

pub use credentials::Credentials;
pub use env::*;
