mod backend;
mod event;
mod registry;

pub use {
    backend::HotkeyBackend,
    event::{HotkeyEvent, KeyEdge},
    registry::{HotkeyRegistry, RegistrationReport},
};
