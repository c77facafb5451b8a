pub mod builder;
pub mod error;
pub mod gateway;
mod lane;
mod worker;

pub use builder::GatewayBuilder;
pub use error::GatewayError;
pub use gateway::{Admission, ReactionGateway};
