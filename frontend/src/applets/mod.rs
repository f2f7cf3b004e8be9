//! UI applet providers

pub mod mii_selector;
pub mod swkbd;

pub use mii_selector::DialogMiiSelector;
pub use swkbd::ConsoleKeyboard;

/// Registry key of the dialog-based Mii selector.
pub const DIALOG_MII_SELECTOR: &str = "dialog";
/// Registry key of the terminal software keyboard.
pub const CONSOLE_KEYBOARD: &str = "console";
/// Registry key of the built-in applets that answer without user input.
pub const DEFAULT_APPLET: &str = "default";
