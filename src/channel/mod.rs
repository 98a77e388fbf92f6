// Module declarations
mod binding;
mod kind;
mod policy;
mod registry;

// Public API exports
pub use binding::{BindingKey, BindingTable, Unbound};
pub use kind::ChannelType;
pub use policy::{TriggerDenial, authorize_trigger};
pub use registry::{ChannelRegistry, Subscription};
