//! Software keyboard applet
//!
//! The game describes what text it accepts through a [`KeyboardConfig`];
//! frontends collect text from the user and must check it with
//! [`validate_input`] and the pressed button with [`validate_button`]
//! before handing a [`KeyboardData`] back.

use thiserror::Error;

/// Which buttons the keyboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonConfig {
    /// Single OK button
    Single,
    /// Cancel | OK
    #[default]
    Dual,
    /// Cancel | I Forgot | OK
    Triple,
    /// No buttons; text is confirmed implicitly
    None,
}

impl ButtonConfig {
    /// Index of the rightmost (confirming) button.
    pub fn confirm_button(&self) -> u8 {
        match self {
            ButtonConfig::None | ButtonConfig::Single => 0,
            ButtonConfig::Dual => 1,
            ButtonConfig::Triple => 2,
        }
    }

    /// Number of selectable buttons.
    pub fn button_count(&self) -> u8 {
        self.confirm_button() + 1
    }
}

/// Constraint on what text is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptedInput {
    #[default]
    Anything,
    NotEmpty,
    NotEmptyAndNotBlank,
    NotBlank,
    /// Exactly `max_text_length` characters
    FixedLength,
}

/// Character filters requested by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filters {
    /// Limit digits to `KeyboardConfig::max_digits`
    pub prevent_digit: bool,
    pub prevent_at: bool,
    pub prevent_percent: bool,
    pub prevent_backslash: bool,
    /// Carried through for the game; no input is rejected on this basis
    pub prevent_profanity: bool,
}

/// Keyboard parameters provided by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardConfig {
    pub button_config: ButtonConfig,
    pub accept_mode: AcceptedInput,
    pub multiline_mode: bool,
    pub max_text_length: u16,
    pub max_digits: u16,
    pub hint_text: String,
    /// Custom button labels, left to right; empty entries use the defaults
    pub button_text: Vec<String>,
    pub filters: Filters,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            button_config: ButtonConfig::default(),
            accept_mode: AcceptedInput::default(),
            multiline_mode: false,
            max_text_length: 255,
            max_digits: 0,
            hint_text: String::new(),
            button_text: Vec::new(),
            filters: Filters::default(),
        }
    }
}

impl KeyboardConfig {
    /// Label for button `index`, falling back to the system defaults.
    pub fn button_label(&self, index: u8) -> String {
        if let Some(text) = self.button_text.get(index as usize)
            && !text.is_empty()
        {
            return text.clone();
        }
        let defaults: &[&str] = match self.button_config {
            ButtonConfig::None | ButtonConfig::Single => &["Ok"],
            ButtonConfig::Dual => &["Cancel", "Ok"],
            ButtonConfig::Triple => &["Cancel", "I Forgot", "Ok"],
        };
        defaults
            .get(index as usize)
            .copied()
            .unwrap_or("Ok")
            .to_string()
    }
}

/// Text and button returned to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardData {
    pub text: String,
    pub button: u8,
}

/// Reasons user input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("button index out of range")]
    ButtonOutOfRange,
    #[error("too many digits")]
    MaxDigitsExceeded,
    #[error("'@' is not allowed")]
    AtSignNotAllowed,
    #[error("'%' is not allowed")]
    PercentNotAllowed,
    #[error("'\\' is not allowed")]
    BackslashNotAllowed,
    #[error("text must be exactly the maximum length")]
    FixedLengthRequired,
    #[error("text is too long")]
    MaxLengthExceeded,
    #[error("text must not be blank")]
    BlankInputNotAllowed,
    #[error("text must not be empty")]
    EmptyInputNotAllowed,
}

/// Check `input` against the configured character filters.
pub fn validate_filters(config: &KeyboardConfig, input: &str) -> Result<(), ValidationError> {
    let filters = &config.filters;
    if filters.prevent_at && input.contains('@') {
        return Err(ValidationError::AtSignNotAllowed);
    }
    if filters.prevent_percent && input.contains('%') {
        return Err(ValidationError::PercentNotAllowed);
    }
    if filters.prevent_backslash && input.contains('\\') {
        return Err(ValidationError::BackslashNotAllowed);
    }
    if filters.prevent_digit {
        let digits = input.chars().filter(|c| c.is_ascii_digit()).count();
        if digits > config.max_digits as usize {
            return Err(ValidationError::MaxDigitsExceeded);
        }
    }
    Ok(())
}

/// Check `input` against filters, length limits and the accept mode.
pub fn validate_input(config: &KeyboardConfig, input: &str) -> Result<(), ValidationError> {
    validate_filters(config, input)?;

    let length = input.chars().count();
    if length > config.max_text_length as usize {
        return Err(ValidationError::MaxLengthExceeded);
    }

    let is_blank = !input.is_empty() && input.chars().all(char::is_whitespace);
    match config.accept_mode {
        AcceptedInput::Anything => {}
        AcceptedInput::NotEmpty => {
            if input.is_empty() {
                return Err(ValidationError::EmptyInputNotAllowed);
            }
        }
        AcceptedInput::NotBlank => {
            if is_blank {
                return Err(ValidationError::BlankInputNotAllowed);
            }
        }
        AcceptedInput::NotEmptyAndNotBlank => {
            if input.is_empty() {
                return Err(ValidationError::EmptyInputNotAllowed);
            }
            if is_blank {
                return Err(ValidationError::BlankInputNotAllowed);
            }
        }
        AcceptedInput::FixedLength => {
            if length != config.max_text_length as usize {
                return Err(ValidationError::FixedLengthRequired);
            }
        }
    }
    Ok(())
}

/// Check that `button` exists for the configured button layout.
pub fn validate_button(config: &KeyboardConfig, button: u8) -> Result<(), ValidationError> {
    if button >= config.button_config.button_count() {
        return Err(ValidationError::ButtonOutOfRange);
    }
    Ok(())
}

/// Frontend handler for the software keyboard applet.
pub trait SoftwareKeyboard: Send + Sync {
    /// Collect text from the user.
    fn execute(&self, config: &KeyboardConfig) -> KeyboardData;

    /// Show an error raised by the game's own input callback.
    fn show_error(&self, error: &str);
}

/// Keyboard that answers immediately with fixed text and the confirm button.
#[derive(Debug, Default)]
pub struct DefaultKeyboard;

impl DefaultKeyboard {
    pub const TEXT: &'static str = "ferrite";
}

impl SoftwareKeyboard for DefaultKeyboard {
    fn execute(&self, config: &KeyboardConfig) -> KeyboardData {
        KeyboardData {
            text: Self::TEXT.to_string(),
            button: config.button_config.confirm_button(),
        }
    }

    fn show_error(&self, error: &str) {
        tracing::error!("Software keyboard error: {}", error);
    }
}
