//! Mii selector applet
//!
//! Games launch the Mii selector to let the user pick a Mii. The frontend
//! decides how the choice is presented; [`DefaultMiiSelector`] answers
//! immediately with the standard Mii.

/// Parameters the game passes when launching the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiiSelectorConfig {
    /// Whether the user may cancel
    pub enable_cancel_button: bool,
    /// Title shown above the selection (may be empty)
    pub title: String,
    /// Index of the Mii selected when the applet opens
    pub initially_selected_mii_index: u32,
}

impl Default for MiiSelectorConfig {
    fn default() -> Self {
        Self {
            enable_cancel_button: true,
            title: String::new(),
            initially_selected_mii_index: 0,
        }
    }
}

/// Minimal Mii record returned to the game.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MiiData {
    pub mii_id: u32,
    pub system_id: u64,
    pub name: String,
}

impl MiiData {
    /// The standard Mii every console ships with.
    pub fn standard() -> Self {
        Self {
            mii_id: 0x0300_0000,
            system_id: 0,
            name: "Ferrite".to_string(),
        }
    }
}

/// Result of a selector run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiiSelectorData {
    /// 0 on success, 1 if the user cancelled
    pub return_code: u32,
    pub selected_mii: MiiData,
}

impl MiiSelectorData {
    pub const RETURN_OK: u32 = 0;
    pub const RETURN_CANCELLED: u32 = 1;

    pub fn selected(mii: MiiData) -> Self {
        Self {
            return_code: Self::RETURN_OK,
            selected_mii: mii,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            return_code: Self::RETURN_CANCELLED,
            selected_mii: MiiData::default(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.return_code == Self::RETURN_CANCELLED
    }
}

/// Frontend handler for the Mii selector applet.
pub trait MiiSelector: Send + Sync {
    /// Run the selector and return the user's choice.
    fn setup(&self, config: &MiiSelectorConfig) -> MiiSelectorData;
}

/// Selector that always picks the standard Mii.
#[derive(Debug, Default)]
pub struct DefaultMiiSelector;

impl MiiSelector for DefaultMiiSelector {
    fn setup(&self, _config: &MiiSelectorConfig) -> MiiSelectorData {
        MiiSelectorData::selected(MiiData::standard())
    }
}
