//! Software keyboard answered from the terminal
//!
//! While the prompt is open the main window title tells the user to look at
//! the terminal.

use dialoguer::{Input, Select};
use ferrite_core::frontend::applets::swkbd::{
    ButtonConfig, DefaultKeyboard, KeyboardConfig, KeyboardData, SoftwareKeyboard, validate_button,
    validate_input,
};
use rfd::{MessageButtons, MessageDialog, MessageLevel};

use crate::host::MainWindow;

const WAITING_TITLE: &str = "Ferrite - waiting for keyboard input in the terminal";

pub struct ConsoleKeyboard {
    window: MainWindow,
}

impl ConsoleKeyboard {
    pub fn new(window: MainWindow) -> Self {
        Self { window }
    }

    fn prompt_text(&self, config: &KeyboardConfig) -> dialoguer::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt(config))
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                validate_input(config, input).map_err(|e| e.to_string())
            })
            .interact_text()
    }

    fn prompt_button(&self, config: &KeyboardConfig) -> dialoguer::Result<u8> {
        let labels = button_labels(config);
        if labels.len() <= 1 {
            return Ok(config.button_config.confirm_button());
        }
        let index = Select::new()
            .with_prompt("Press a button")
            .items(&labels)
            .default(config.button_config.confirm_button() as usize)
            .interact()?;
        Ok(index as u8)
    }
}

/// Prompt line shown before the text field.
fn prompt(config: &KeyboardConfig) -> String {
    let hint = if config.hint_text.is_empty() {
        "Enter text"
    } else {
        config.hint_text.as_str()
    };
    format!("{} (max {} characters)", hint, config.max_text_length)
}

/// Labels of the selectable buttons, left to right.
fn button_labels(config: &KeyboardConfig) -> Vec<String> {
    if config.button_config == ButtonConfig::None {
        return Vec::new();
    }
    (0..config.button_config.button_count())
        .map(|index| config.button_label(index))
        .collect()
}

impl SoftwareKeyboard for ConsoleKeyboard {
    fn execute(&self, config: &KeyboardConfig) -> KeyboardData {
        self.window.set_title(Some(WAITING_TITLE));
        let result = self
            .prompt_text(config)
            .and_then(|text| Ok((text, self.prompt_button(config)?)));
        self.window.set_title(None);

        match result {
            Ok((text, button)) => {
                let button = match validate_button(config, button) {
                    Ok(()) => button,
                    Err(e) => {
                        tracing::warn!("Keyboard button {} rejected: {}", button, e);
                        config.button_config.confirm_button()
                    }
                };
                KeyboardData { text, button }
            }
            Err(e) => {
                tracing::warn!("Terminal keyboard unavailable ({}), using default text", e);
                DefaultKeyboard.execute(config)
            }
        }
    }

    fn show_error(&self, error: &str) {
        tracing::error!("Software keyboard error: {}", error);
        let mut dialog = MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Software Keyboard")
            .set_description(error)
            .set_buttons(MessageButtons::Ok);
        if let Some(native) = self.window.native() {
            dialog = dialog.set_parent(native.as_ref());
        }
        dialog.show();
    }
}
