//! Command implementations.

mod compare;
mod credentials;
mod request;
mod resilience;
mod todo;

pub use compare::{CompareCommand, StrategyChoice};
pub use credentials::CredentialsCommand;
pub use request::{DeleteCommand, GetCommand, PostCommand, PutCommand};
pub use resilience::{BackoffCommand, RateLimitedCommand};
pub use todo::TodoCommand;
