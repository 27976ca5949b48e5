//! Login gate and top-level screen state.
//!
//! Credentials are only checked for shape; nothing leaves the process.

use std::sync::LazyLock;

use log::info;
use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ValidationError::PasswordTooShort)
    }
}

pub fn attempt_login(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_password(password)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginStep {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub step: LoginStep,
    pub email: String,
    pub password: String,
    pub error: Option<ValidationError>,
}

impl LoginForm {
    fn active_field(&mut self) -> &mut String {
        match self.step {
            LoginStep::Email => &mut self.email,
            LoginStep::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    LoggedOut(LoginForm),
    Main,
}

/// Session context: which screen is up and the login form in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    screen: Screen,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            screen: Screen::LoggedOut(LoginForm::default()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.screen == Screen::Main
    }

    pub fn form(&self) -> Option<&LoginForm> {
        match &self.screen {
            Screen::LoggedOut(form) => Some(form),
            Screen::Main => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut LoginForm> {
        match &mut self.screen {
            Screen::LoggedOut(form) => Some(form),
            Screen::Main => None,
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(form) = self.form_mut() {
            form.error = None;
            form.active_field().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(form) = self.form_mut() {
            form.error = None;
            form.active_field().pop();
        }
    }

    /// Enter on the login form: validates the active step and moves on.
    pub fn submit(&mut self) -> Result<(), ValidationError> {
        let Some(form) = self.form_mut() else {
            return Ok(());
        };

        let result = match form.step {
            LoginStep::Email => validate_email(&form.email).map(|()| {
                form.step = LoginStep::Password;
                form.password.clear();
                false
            }),
            LoginStep::Password => attempt_login(&form.email, &form.password).map(|()| true),
        };

        match result {
            Ok(true) => {
                info!("logged in as {}", form.email.trim());
                self.screen = Screen::Main;
                Ok(())
            }
            Ok(false) => {
                form.error = None;
                Ok(())
            }
            Err(e) => {
                form.error = Some(e);
                Err(e)
            }
        }
    }

    /// Escape on the login form: back from password, or clear the email.
    pub fn back(&mut self) {
        if let Some(form) = self.form_mut() {
            match form.step {
                LoginStep::Password => {
                    form.step = LoginStep::Email;
                    form.password.clear();
                }
                LoginStep::Email => form.email.clear(),
            }
            form.error = None;
        }
    }

    pub fn logout(&mut self) {
        info!("logged out");
        self.screen = Screen::LoggedOut(LoginForm::default());
    }
}
