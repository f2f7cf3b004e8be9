//! UI applet contracts (Mii selector, software keyboard)

pub mod mii_selector;
pub mod swkbd;

pub use mii_selector::{DefaultMiiSelector, MiiData, MiiSelector, MiiSelectorConfig, MiiSelectorData};
pub use swkbd::{
    AcceptedInput, ButtonConfig, DefaultKeyboard, Filters, KeyboardConfig, KeyboardData,
    SoftwareKeyboard, ValidationError,
};
