pub mod constants;
pub mod error;
pub mod message;

pub use constants::*;
pub use error::{BridgeError, Result};
pub use message::{ClientEvent, MethodCall, Reply, ReplyError};
