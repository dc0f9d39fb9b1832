//! Login form state.
//!
//! Sign-in is simulated: the form checks that both fields are filled, then
//! the shell waits a fixed delay and moves to the home screen. Nothing is
//! sent anywhere.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Sign-in already in progress")]
    AlreadySubmitting,
}

/// Which input receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Email,
    Password,
}

#[derive(Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    focus: Field,
    error: Option<LoginError>,
    submitting: bool,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("focus", &self.focus)
            .field("error", &self.error)
            .field("submitting", &self.submitting)
            .finish()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Number of password characters, for the masked display.
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn error(&self) -> Option<LoginError> {
        self.error
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn switch_field(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    /// Append a character to the focused field. Ignored while submitting.
    pub fn insert_char(&mut self, c: char) {
        if self.submitting || c.is_control() {
            return;
        }
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        if self.submitting {
            return;
        }
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    /// Validate and start the simulated sign-in.
    ///
    /// On `Ok` the caller starts the delay; on `Err(MissingFields)` the inline
    /// error is set and nothing else happens. Fields are checked for presence
    /// only, so whitespace counts as filled.
    pub fn submit(&mut self) -> Result<(), LoginError> {
        if self.submitting {
            return Err(LoginError::AlreadySubmitting);
        }
        self.error = None;
        if self.email.is_empty() || self.password.is_empty() {
            self.error = Some(LoginError::MissingFields);
            return Err(LoginError::MissingFields);
        }
        self.submitting = true;
        tracing::debug!(email_len = self.email.len(), "Login submitted");
        Ok(())
    }

    /// Finish a pending sign-in. Returns false if none was pending
    /// (the form was abandoned or cleared in the meantime).
    pub fn complete(&mut self) -> bool {
        if !self.submitting {
            return false;
        }
        self.clear();
        true
    }

    /// Drop everything typed and any pending submission.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> LoginForm {
        let mut form = LoginForm::new();
        "a@b.c".chars().for_each(|c| form.insert_char(c));
        form.switch_field();
        "hunter2".chars().for_each(|c| form.insert_char(c));
        form
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let form = filled();
        assert_eq!(form.email(), "a@b.c");
        assert_eq!(form.password_len(), 7);
        assert_eq!(form.focus(), Field::Password);
    }

    #[test]
    fn backspace_edits_focused_field() {
        let mut form = filled();
        form.backspace();
        assert_eq!(form.password_len(), 6);
        form.switch_field();
        form.backspace();
        assert_eq!(form.email(), "a@b.");
    }

    #[test]
    fn empty_fields_rejected_with_message() {
        for (email, password) in [("", ""), ("x", ""), ("", "y")] {
            let mut form = LoginForm::new();
            email.chars().for_each(|c| form.insert_char(c));
            form.switch_field();
            password.chars().for_each(|c| form.insert_char(c));

            assert_eq!(form.submit(), Err(LoginError::MissingFields));
            assert!(!form.is_submitting());
            assert_eq!(
                form.error().map(|e| e.to_string()).as_deref(),
                Some("Please fill in all fields")
            );
        }
    }

    #[test]
    fn whitespace_counts_as_filled() {
        let mut form = LoginForm::new();
        form.insert_char(' ');
        form.switch_field();
        form.insert_char(' ');
        assert_eq!(form.submit(), Ok(()));
    }

    #[test]
    fn successful_submit_clears_previous_error() {
        let mut form = LoginForm::new();
        assert!(form.submit().is_err());
        let mut form = LoginForm {
            error: form.error(),
            ..filled()
        };
        assert_eq!(form.submit(), Ok(()));
        assert_eq!(form.error(), None);
        assert!(form.is_submitting());
    }

    #[test]
    fn input_frozen_while_submitting() {
        let mut form = filled();
        form.submit().unwrap();
        form.insert_char('x');
        form.backspace();
        assert_eq!(form.password_len(), 7);
        assert_eq!(form.submit(), Err(LoginError::AlreadySubmitting));
    }

    #[test]
    fn complete_only_applies_to_pending_submission() {
        let mut form = filled();
        assert!(!form.complete());

        form.submit().unwrap();
        assert!(form.complete());
        assert_eq!(form.email(), "");
        assert!(!form.is_submitting());
    }

    #[test]
    fn abandoned_submission_is_not_completed() {
        let mut form = filled();
        form.submit().unwrap();
        form.clear();
        assert!(!form.complete());
    }

    #[test]
    fn debug_redacts_password() {
        let out = format!("{:?}", filled());
        assert!(!out.contains("hunter2"));
        assert!(out.contains("[REDACTED]"));
        assert!(out.contains("a@b.c"));
    }

    #[test]
    fn control_chars_not_inserted() {
        let mut form = LoginForm::new();
        form.insert_char('\u{1b}');
        form.insert_char('\n');
        assert_eq!(form.email(), "");
    }
}
