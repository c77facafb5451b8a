pub mod config;
pub mod counters;
pub mod error;
pub mod notify;
pub mod permission;
pub mod processor;
pub mod retry;

pub use config::ExecutorConfig;
pub use counters::GroupCounters;
pub use error::ProcessError;
pub use notify::Notifications;
pub use permission::PermissionHandler;
pub use processor::{ProcessOutcome, ReactionProcessor};
pub use retry::RetryStrategy;
