use std::{fmt::Display, rc::Rc};

use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};

/// OS surface for system-wide hotkey registration.
///
/// Implemented for [`GlobalHotKeyManager`]; the `Rc` impl lets the registry
/// and the cancel watch share one manager on the event-loop thread.
pub trait HotkeyBackend {
    /// Error reported when the OS refuses an operation.
    type Error: Display;

    /// Claim a key combination system-wide.
    fn register(&self, hotkey: HotKey) -> Result<(), Self::Error>;

    /// Release a previously claimed key combination.
    fn unregister(&self, hotkey: HotKey) -> Result<(), Self::Error>;
}

impl HotkeyBackend for GlobalHotKeyManager {
    type Error = global_hotkey::Error;

    fn register(&self, hotkey: HotKey) -> Result<(), Self::Error> {
        GlobalHotKeyManager::register(self, hotkey)
    }

    fn unregister(&self, hotkey: HotKey) -> Result<(), Self::Error> {
        GlobalHotKeyManager::unregister(self, hotkey)
    }
}

impl<B: HotkeyBackend + ?Sized> HotkeyBackend for Rc<B> {
    type Error = B::Error;

    fn register(&self, hotkey: HotKey) -> Result<(), Self::Error> {
        (**self).register(hotkey)
    }

    fn unregister(&self, hotkey: HotKey) -> Result<(), Self::Error> {
        (**self).unregister(hotkey)
    }
}
