pub mod error;
pub mod log;
pub mod notifier;
pub mod provider;

pub use error::{FailureClass, ProviderError};
pub use log::LogProvider;
pub use notifier::{DynNotifier, Notifier};
pub use provider::{DynReactionProvider, ReactionProvider};
