mod trigger_binding;
mod trigger_bindings;
mod trigger_identity;

pub use {
    trigger_binding::{TriggerBinding, TriggerRole},
    trigger_bindings::TriggerBindings,
    trigger_identity::TriggerIdentity,
};
