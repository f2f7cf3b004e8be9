//! Mii selector presented as a native message dialog

use ferrite_core::frontend::applets::mii_selector::{
    MiiData, MiiSelector, MiiSelectorConfig, MiiSelectorData,
};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::host::MainWindow;

/// Asks the user to confirm the standard Mii, parented to the main window.
pub struct DialogMiiSelector {
    window: MainWindow,
}

impl DialogMiiSelector {
    pub fn new(window: MainWindow) -> Self {
        Self { window }
    }
}

fn dialog_title(config: &MiiSelectorConfig) -> &str {
    if config.title.is_empty() {
        "Mii Selector"
    } else {
        &config.title
    }
}

fn dialog_buttons(config: &MiiSelectorConfig) -> MessageButtons {
    if config.enable_cancel_button {
        MessageButtons::OkCancel
    } else {
        MessageButtons::Ok
    }
}

/// Map the dialog outcome to the data returned to the game.
///
/// Closing the dialog counts as cancelling, unless the game disabled the
/// cancel button, in which case the Mii is selected anyway.
fn selection_result(
    config: &MiiSelectorConfig,
    mii: MiiData,
    result: MessageDialogResult,
) -> MiiSelectorData {
    let accepted = matches!(result, MessageDialogResult::Ok | MessageDialogResult::Yes);
    if accepted || !config.enable_cancel_button {
        MiiSelectorData::selected(mii)
    } else {
        MiiSelectorData::cancelled()
    }
}

impl MiiSelector for DialogMiiSelector {
    fn setup(&self, config: &MiiSelectorConfig) -> MiiSelectorData {
        let mii = MiiData::standard();
        let mut dialog = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(dialog_title(config))
            .set_description(format!("Continue with Mii \"{}\"?", mii.name))
            .set_buttons(dialog_buttons(config));
        if let Some(native) = self.window.native() {
            dialog = dialog.set_parent(native.as_ref());
        }

        let data = selection_result(config, mii, dialog.show());
        tracing::debug!("Mii selector returned {}", data.return_code);
        data
    }
}
